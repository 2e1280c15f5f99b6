/// Conversions between native Rust values and runtime handles.
///
/// `FromValue` and `IntoValue` are the only places where a dynamic type is checked against a
/// static one. `CheckValue` answers the shallower question of whether a handle has the right
/// outer shape at all.
use std::marker::PhantomData;

use num_traits::{NumCast, ToPrimitive};

use crate::error::{err_type, ErrorKind, RuntimeError};
use crate::memory::{MutatorScope, MutatorView};
use crate::value::Value;

/// Convert a borrowed runtime handle into a native value
pub trait FromValue: Sized {
    fn from_value(guard: &dyn MutatorScope, value: &Value) -> Result<Self, RuntimeError>;
}

/// Convert a native value into a runtime handle, consuming it
pub trait IntoValue {
    fn into_value(self, mem: &MutatorView) -> Result<Value, RuntimeError>;
}

/// Shape check: does the handle refer to the right kind of object
pub trait CheckValue {
    fn check(value: &Value) -> bool;
}

impl FromValue for Value {
    fn from_value(_guard: &dyn MutatorScope, value: &Value) -> Result<Value, RuntimeError> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(self)
    }
}

impl CheckValue for Value {
    fn check(_value: &Value) -> bool {
        true
    }
}

macro_rules! integer_cast {
    ($($T:ty),*) => {
        $(
            impl FromValue for $T {
                fn from_value(
                    _guard: &dyn MutatorScope,
                    value: &Value,
                ) -> Result<$T, RuntimeError> {
                    match value {
                        Value::Number(n) => <$T as NumCast>::from(*n).ok_or_else(|| {
                            RuntimeError::new(ErrorKind::TypeError(format!(
                                "int {} out of range for {}",
                                n,
                                stringify!($T)
                            )))
                        }),
                        other => Err(err_type("int", other.type_name())),
                    }
                }
            }

            impl IntoValue for $T {
                fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
                    self.to_i64().map(Value::from).ok_or_else(|| {
                        RuntimeError::new(ErrorKind::TypeError(format!(
                            "{} {} out of range for int",
                            stringify!($T),
                            self
                        )))
                    })
                }
            }

            impl CheckValue for $T {
                fn check(value: &Value) -> bool {
                    matches!(value, Value::Number(_))
                }
            }
        )*
    };
}

integer_cast!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_cast {
    ($($T:ty),*) => {
        $(
            impl FromValue for $T {
                fn from_value(
                    _guard: &dyn MutatorScope,
                    value: &Value,
                ) -> Result<$T, RuntimeError> {
                    let converted = match value {
                        Value::Float(x) => <$T as NumCast>::from(*x),
                        Value::Number(n) => <$T as NumCast>::from(*n),
                        other => return Err(err_type("float", other.type_name())),
                    };

                    converted.ok_or_else(|| {
                        RuntimeError::new(ErrorKind::TypeError(format!(
                            "{} out of range for {}",
                            value,
                            stringify!($T)
                        )))
                    })
                }
            }

            impl IntoValue for $T {
                fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
                    Ok(Value::from(self as f64))
                }
            }

            impl CheckValue for $T {
                fn check(value: &Value) -> bool {
                    matches!(value, Value::Float(_) | Value::Number(_))
                }
            }
        )*
    };
}

float_cast!(f32, f64);

impl FromValue for bool {
    fn from_value(_guard: &dyn MutatorScope, value: &Value) -> Result<bool, RuntimeError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(err_type("bool", other.type_name())),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(Value::from(self))
    }
}

impl CheckValue for bool {
    fn check(value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }
}

impl FromValue for String {
    fn from_value(_guard: &dyn MutatorScope, value: &Value) -> Result<String, RuntimeError> {
        match value {
            Value::Text(t) => Ok(String::from(t.as_str())),
            other => Err(err_type("str", other.type_name())),
        }
    }
}

impl IntoValue for String {
    fn into_value(self, mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(mem.alloc_text(&self))
    }
}

impl IntoValue for &str {
    fn into_value(self, mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(mem.alloc_text(self))
    }
}

impl CheckValue for String {
    fn check(value: &Value) -> bool {
        matches!(value, Value::Text(_))
    }
}

impl FromValue for () {
    fn from_value(_guard: &dyn MutatorScope, value: &Value) -> Result<(), RuntimeError> {
        match value {
            Value::Nil => Ok(()),
            other => Err(err_type("None", other.type_name())),
        }
    }
}

impl IntoValue for () {
    fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(Value::Nil)
    }
}

impl CheckValue for () {
    fn check(value: &Value) -> bool {
        value.is_nil()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(guard: &dyn MutatorScope, value: &Value) -> Result<Option<T>, RuntimeError> {
        match value {
            Value::Nil => Ok(None),
            other => Ok(Some(T::from_value(guard, other)?)),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self, mem: &MutatorView) -> Result<Value, RuntimeError> {
        match self {
            Some(inner) => inner.into_value(mem),
            None => Ok(Value::Nil),
        }
    }
}

impl<T: CheckValue> CheckValue for Option<T> {
    fn check(value: &Value) -> bool {
        value.is_nil() || T::check(value)
    }
}

/// Convert a borrowed handle; shorthand for `T::from_value`
pub fn cast<T: FromValue>(guard: &dyn MutatorScope, value: &Value) -> Result<T, RuntimeError> {
    T::from_value(guard, value)
}

/// Wraps a raw iterator of handles and converts each item as it is reached. Conversion failures
/// are yielded in place; after the first error the iterator is exhausted.
pub struct CastIter<'guard, T, I> {
    raw: I,
    guard: &'guard dyn MutatorScope,
    failed: bool,
    _target: PhantomData<fn() -> T>,
}

impl<'guard, T, I> CastIter<'guard, T, I>
where
    T: FromValue,
    I: Iterator<Item = Result<Value, RuntimeError>>,
{
    pub fn new(guard: &'guard dyn MutatorScope, raw: I) -> CastIter<'guard, T, I> {
        CastIter {
            raw,
            guard,
            failed: false,
            _target: PhantomData,
        }
    }
}

impl<'guard, T, I> Iterator for CastIter<'guard, T, I>
where
    T: FromValue,
    I: Iterator<Item = Result<Value, RuntimeError>>,
{
    type Item = Result<T, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let item = self
            .raw
            .next()?
            .and_then(|value| T::from_value(self.guard, &value));

        if item.is_err() {
            self.failed = true;
        }

        Some(item)
    }
}
