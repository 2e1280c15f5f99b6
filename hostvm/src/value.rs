/// Defines the `Value` type, the runtime's handle to any object.
///
/// Scalars are stored inline. Containers and text live behind `Rc`, so cloning a `Value` shares
/// the object rather than copying it, and the object is released with its last handle.
use std::fmt;
use std::rc::Rc;

use crate::array::ArraySize;
use crate::containers::{Container, StackContainer};
use crate::dict::Dict;
use crate::error::{err_type, RuntimeError};
use crate::list::List;
use crate::memory::{MutatorScope, MutatorView};
use crate::printer::Print;
use crate::text::Text;

/// A handle to a runtime object.
/// This should represent every type native to the runtime.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(Rc<Text>),
    List(Rc<List>),
    Dict(Rc<Dict>),
}

impl Value {
    /// The runtime's own name for the dynamic type of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "NoneType",
            Value::Bool(_) => "bool",
            Value::Number(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Return true if both handles refer to the same object. Inline scalars are compared by value.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(p), Value::Text(q)) => Rc::ptr_eq(p, q),
            (Value::List(p), Value::List(q)) => Rc::ptr_eq(p, q),
            (Value::Dict(p), Value::Dict(q)) => Rc::ptr_eq(p, q),
            _ => self == other,
        }
    }

    /// Item count of a container or character count of a text
    pub fn length(&self) -> Result<ArraySize, RuntimeError> {
        match self {
            Value::Text(t) => Ok(t.as_str().chars().count() as ArraySize),
            Value::List(l) => Ok(l.length()),
            Value::Dict(d) => Ok(d.length()),
            other => Err(err_type("a sized object", other.type_name())),
        }
    }

    /// Dynamically dispatched append: checks that this handle refers to a list before pushing
    pub fn append(&self, mem: &MutatorView, item: Value) -> Result<(), RuntimeError> {
        match self {
            Value::List(list) => list.push(mem, item),
            other => Err(err_type("list", other.type_name())),
        }
    }
}

impl MutatorScope for Value {}

/// Scalars and text compare by value, containers by identity
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(i), Value::Number(j)) => i == j,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Text(p), Value::Text(q)) => p.as_str() == q.as_str(),
            (Value::List(p), Value::List(q)) => Rc::ptr_eq(p, q),
            (Value::Dict(p), Value::Dict(q)) => Rc::ptr_eq(p, q),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<Rc<List>> for Value {
    fn from(list: Rc<List>) -> Value {
        Value::List(list)
    }
}

impl From<Rc<Dict>> for Value {
    fn from(dict: Rc<Dict>) -> Value {
        Value::Dict(dict)
    }
}

/// `Value` renders itself as a literal that the parser accepts
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(t) => t.print(self, f),
            Value::List(l) => l.print(self, f),
            Value::Dict(d) => d.print(self, f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Text(t) => t.debug(self, f),
            Value::List(l) => l.debug(self, f),
            Value::Dict(d) => d.debug(self, f),
            _ => fmt::Display::fmt(self, f),
        }
    }
}
