use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use hostvm::error::RuntimeError;

/// Errors that end a shell session
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("IO Error: {0}")]
    IO(#[from] io::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Configuration error: {0}")]
    Config(String),
}
