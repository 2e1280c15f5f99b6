//! Typed views over the runtime's dynamic containers.
//!
//! `TypedList<T>` and `TypedDict<K, V>` wrap shared container handles and convert elements at
//! the point of access, so a function can state in its signature what it expects a list or dict
//! to hold while the runtime keeps storing untyped values.

pub mod dict;
pub mod list;

pub use crate::dict::TypedDict;
pub use crate::list::TypedList;
