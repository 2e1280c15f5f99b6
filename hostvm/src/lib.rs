//! A small dynamic object runtime.
//!
//! Objects are reached through `Value` handles; containers are shared through `Rc` and every
//! operation on them takes a mutator scope obtained from `Memory::mutate`.

pub mod array;
pub mod cast;
pub mod containers;
pub mod dict;
pub mod error;
pub mod lexer;
pub mod list;
pub mod memory;
pub mod parser;
pub mod printer;
pub mod text;
pub mod typename;
pub mod value;

pub use crate::cast::{cast, CastIter, CheckValue, FromValue, IntoValue};
pub use crate::error::{ErrorCategory, ErrorKind, RuntimeError, SourcePos};
pub use crate::memory::{HeapConfig, Memory, Mutator, MutatorScope, MutatorView};
pub use crate::typename::TypeName;
pub use crate::value::Value;
