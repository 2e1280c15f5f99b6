use std::fmt;
use std::io;

use thiserror::Error;

/// Source code position
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    fn new(line: u32, column: u32) -> SourcePos {
        SourcePos { line, column }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErrorKind {
    #[error("IO Error: {0}")]
    IOError(String),
    #[error("Parse error: {0}")]
    LexerError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Out of memory!")]
    OutOfMemory,
    #[error("Index out of range")]
    IndexError,
    #[error("Key does not exist in Dict")]
    KeyError,
    #[error("Attempt to access Dict with unhashable key")]
    UnhashableError,
    #[error("Attempt to modify a container that is already mutably borrowed")]
    MutableBorrowError,
}

/// Coarse grouping of error kinds by which layer raised them
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ErrorCategory {
    /// Positional access outside the bounds of a container
    IndexAccess,
    /// A value could not be converted to or from a native type
    TypeConversion,
    /// The runtime's own container primitive failed, independent of typing
    RuntimeOperation,
    /// Keyed access failed
    Lookup,
    /// Reading or interpreting input text
    Input,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::IndexError => ErrorCategory::IndexAccess,
            ErrorKind::TypeError(_) => ErrorCategory::TypeConversion,
            ErrorKind::OutOfMemory | ErrorKind::MutableBorrowError => {
                ErrorCategory::RuntimeOperation
            }
            ErrorKind::KeyError | ErrorKind::UnhashableError => ErrorCategory::Lookup,
            ErrorKind::IOError(_)
            | ErrorKind::LexerError(_)
            | ErrorKind::ParseError(_)
            | ErrorKind::UnknownType(_) => ErrorCategory::Input,
        }
    }
}

/// A host runtime error
#[derive(Debug, PartialEq)]
pub struct RuntimeError {
    kind: ErrorKind,
    pos: Option<SourcePos>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> RuntimeError {
        RuntimeError { kind, pos: None }
    }

    pub fn with_pos(kind: ErrorKind, pos: SourcePos) -> RuntimeError {
        RuntimeError {
            kind,
            pos: Some(pos),
        }
    }

    pub fn error_kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn error_pos(&self) -> Option<SourcePos> {
        self.pos
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Given the relevant source code string, render the error in context
    pub fn format_with_source(&self, source: &str) -> String {
        if let Some(ref pos) = self.pos {
            // line numbers start at 1
            if let Some(line) = source.lines().nth((pos.line as usize).saturating_sub(1)) {
                return format!(
                    "error: {}\n{:5}|{}\n{:5}|{:width$}^\n{:5}|",
                    self,
                    pos.line,
                    line,
                    " ",
                    "",
                    " ",
                    width = pos.column as usize
                );
            }
        }

        format!("error: {}", self)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for RuntimeError {}

/// Convert from io::Error
impl From<io::Error> for RuntimeError {
    fn from(other: io::Error) -> RuntimeError {
        RuntimeError::new(ErrorKind::IOError(format!("{}", other)))
    }
}

/// Convert _to_ std::fmt::Error
impl From<RuntimeError> for fmt::Error {
    fn from(_other: RuntimeError) -> fmt::Error {
        fmt::Error
    }
}

/// Convenience shorthand function for building a SourcePos
pub fn spos(line: u32, column: u32) -> SourcePos {
    SourcePos::new(line, column)
}

/// Convenience shorthand function for building a lexer error
pub fn err_lexer(pos: SourcePos, reason: &str) -> RuntimeError {
    RuntimeError::with_pos(ErrorKind::LexerError(String::from(reason)), pos)
}

/// Convenience shorthand function for building a parser error
pub fn err_parser(reason: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::ParseError(String::from(reason)))
}

/// Convenience shorthand function for building a parser error including a source position
pub fn err_parser_wpos(pos: SourcePos, reason: &str) -> RuntimeError {
    RuntimeError::with_pos(ErrorKind::ParseError(String::from(reason)), pos)
}

/// Convenience shorthand function for building a conversion error
pub fn err_type(expected: &str, found: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::TypeError(format!(
        "expected {}, found {}",
        expected, found
    )))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_categories() {
        assert_eq!(ErrorKind::IndexError.category(), ErrorCategory::IndexAccess);
        assert_eq!(
            err_type("int", "str").category(),
            ErrorCategory::TypeConversion
        );
        assert_eq!(
            ErrorKind::OutOfMemory.category(),
            ErrorCategory::RuntimeOperation
        );
        assert_eq!(
            ErrorKind::MutableBorrowError.category(),
            ErrorCategory::RuntimeOperation
        );
        assert_eq!(ErrorKind::KeyError.category(), ErrorCategory::Lookup);
        assert_eq!(err_parser("x").category(), ErrorCategory::Input);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            format!("{}", err_type("int", "str")),
            "Type error: expected int, found str"
        );
        assert_eq!(
            format!("{}", RuntimeError::new(ErrorKind::IndexError)),
            "Index out of range"
        );
    }

    #[test]
    fn error_in_source_context() {
        let err = err_parser_wpos(spos(2, 3), "Unexpected ']'");
        let shown = err.format_with_source("[1,\n 2 ]]");
        assert_eq!(
            shown,
            "error: Parse error: Unexpected ']'\n    2| 2 ]]\n     |   ^\n     |"
        );
    }
}
