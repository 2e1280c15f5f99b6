extern crate clap;
extern crate dirs;
extern crate env_logger;
extern crate fnv;
extern crate generics;
extern crate hostvm;
extern crate itertools;
extern crate log;
extern crate rustyline;
extern crate thiserror;

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process;

use clap::{App, Arg, ArgMatches};
use log::info;

use rustyline::error::ReadlineError;
use rustyline::Editor;

mod error;
mod repl;
mod signatures;

use hostvm::memory::{HeapConfig, Memory};

use crate::error::ShellError;
use crate::repl::Inspector;
use crate::signatures::Signatures;

/// Read a file into a String
fn load_file(filename: &str) -> Result<String, io::Error> {
    let mut contents = String::new();

    File::open(filename)?.read_to_string(&mut contents)?;

    Ok(contents)
}

/// Check every line of a file
fn read_file(filename: &str, config: HeapConfig) -> Result<(), ShellError> {
    let contents = load_file(filename)?;

    let mem = Memory::with_config(config);
    let inspector = Inspector::new(Signatures::default());

    for line in contents.lines() {
        mem.mutate(&inspector, String::from(line))?;
    }

    Ok(())
}

/// Read a line at a time, checking each against the signature table
fn read_print_loop(config: HeapConfig) -> Result<(), ShellError> {
    // establish a repl input history file path
    let history_file: Option<PathBuf> = dirs::home_dir().map(|mut path| {
        path.push(".inspect_history");
        path
    });

    // () means no completion support
    let mut reader = Editor::<()>::new();

    // Try to load the repl history file
    if let Some(ref path) = history_file {
        if let Err(err) = reader.load_history(path) {
            eprintln!("Could not read history: {}", err);
        }
    }

    let mem = Memory::with_config(config);
    let inspector = Inspector::new(Signatures::default());

    // repl
    loop {
        let readline = reader.readline("> ");

        match readline {
            // valid input
            Ok(line) => {
                reader.add_history_entry(&line);
                mem.mutate(&inspector, line)?;
            }

            // some kind of program termination condition
            Err(e) => {
                if let Some(ref path) = history_file {
                    reader.save_history(path).unwrap_or_else(|err| {
                        eprintln!(
                            "could not save input history in {}: {}",
                            path.display(),
                            err
                        );
                    });
                }

                // EOF is fine
                if let ReadlineError::Eof = e {
                    return Ok(());
                } else {
                    return Err(ShellError::from(e));
                }
            }
        }
    }
}

/// Build the heap configuration from the command line
fn heap_config(matches: &ArgMatches) -> Result<HeapConfig, ShellError> {
    let mut config = HeapConfig::default();

    if let Some(max) = matches.value_of("max-length") {
        config.max_array_length = max.parse().map_err(|_| {
            ShellError::Config(format!("--max-length expects a count, got '{}'", max))
        })?;
    }

    Ok(config)
}

fn main() {
    env_logger::init();

    // parse command line arguments, an optional filename and the heap limit
    let matches = App::new("inspect")
        .about("Check literals against typed container signatures")
        .arg(
            Arg::with_name("filename")
                .help("Optional filename to read in")
                .index(1),
        )
        .arg(
            Arg::with_name("max-length")
                .long("max-length")
                .value_name("N")
                .help("Maximum number of items any one container may hold")
                .takes_value(true),
        )
        .get_matches();

    let result = heap_config(&matches).and_then(|config| {
        info!("heap limit: {} items per container", config.max_array_length);

        if let Some(filename) = matches.value_of("filename") {
            // if a filename was specified, check each of its lines
            read_file(filename, config)
        } else {
            // otherwise begin a repl
            read_print_loop(config)
        }
    });

    result.unwrap_or_else(|err| {
        eprintln!("Terminated: {}", err);
        process::exit(1);
    });
}
