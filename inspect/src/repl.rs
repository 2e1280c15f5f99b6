use itertools::Itertools;
use log::debug;

use hostvm::error::{err_parser, ErrorCategory, RuntimeError};
use hostvm::memory::{Mutator, MutatorView};
use hostvm::parser::parse;

use crate::signatures::{Report, Signatures};

/// Split a `<descriptor> <literal>` line at the first whitespace outside of brackets
pub fn split_line(line: &str) -> Result<(&str, &str), RuntimeError> {
    let mut depth = 0;

    for (index, c) in line.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if c.is_whitespace() && depth <= 0 => {
                let literal = line[index..].trim();
                if literal.is_empty() {
                    break;
                }
                return Ok((&line[..index], literal));
            }
            _ => (),
        }
    }

    Err(err_parser("Expected a type descriptor followed by a literal"))
}

/// Mutator that checks one line of input against the signature table
pub struct Inspector {
    signatures: Signatures,
}

impl Inspector {
    pub fn new(signatures: Signatures) -> Inspector {
        Inspector { signatures }
    }

    pub fn inspect(
        &self,
        mem: &MutatorView,
        descriptor: &str,
        literal: &str,
        debug: bool,
    ) -> Result<Report, RuntimeError> {
        let checker = self.signatures.lookup(descriptor)?;
        let value = parse(mem, literal)?;

        if debug {
            println!("# Parsed:\n{:?}", value);
        }

        checker(mem, &value)
    }

    fn show_types(&self) {
        println!("{}", self.signatures.descriptors().iter().join("\n"));
    }
}

// Input errors are reported against the text that caused them; anything else ends the session
fn report_input_error(error: RuntimeError, source: &str) -> Result<(), RuntimeError> {
    match error.category() {
        ErrorCategory::Input => {
            eprintln!("{}", error.format_with_source(source));
            Ok(())
        }
        _ => Err(error),
    }
}

impl Mutator for Inspector {
    type Input = String;
    type Output = ();

    fn run(&self, mem: &MutatorView, line: String) -> Result<(), RuntimeError> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if line == ":types" {
            self.show_types();
            return Ok(());
        }

        // If the line starts with ":d", the user has also requested a debug representation
        let (line, debug) = match line.strip_prefix(":d ") {
            Some(rest) => (rest.trim_start(), true),
            None => (line, false),
        };

        let (descriptor, literal) = match split_line(line) {
            Ok(parts) => parts,
            Err(e) => return report_input_error(e, line),
        };
        debug!("checking '{}' against {}", literal, descriptor);

        match self.inspect(mem, descriptor, literal, debug) {
            Ok(report) => println!("{}", report),
            Err(e) => report_input_error(e, literal)?,
        }

        Ok(())
    }
}
