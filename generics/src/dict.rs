/// Statically typed view over a runtime Dict
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use hostvm::array::ArraySize;
use hostvm::cast::{CheckValue, FromValue, IntoValue};
use hostvm::containers::{Container, HashIndexedAnyContainer};
use hostvm::dict::{Dict, DictIter};
use hostvm::error::{err_type, RuntimeError};
use hostvm::memory::{MutatorScope, MutatorView};
use hostvm::typename::TypeName;
use hostvm::value::Value;

/// A view of a shared Dict as a mapping from `K` to `V`. Keys and values are converted at each
/// access; the dict itself may hold anything.
pub struct TypedDict<K, V> {
    dict: Rc<Dict>,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<K, V> TypedDict<K, V> {
    pub fn new(mem: &MutatorView) -> TypedDict<K, V> {
        TypedDict::wrap(mem.alloc_dict())
    }

    pub fn wrap(dict: Rc<Dict>) -> TypedDict<K, V> {
        TypedDict {
            dict,
            _entry: PhantomData,
        }
    }

    /// Shape check: true for any dict handle
    pub fn matches(value: &Value) -> bool {
        matches!(value, Value::Dict(_))
    }

    pub fn len(&self) -> ArraySize {
        self.dict.length()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dict(&self) -> &Rc<Dict> {
        &self.dict
    }

    pub fn as_value(&self) -> Value {
        Value::Dict(Rc::clone(&self.dict))
    }
}

impl<K, V> TypedDict<K, V>
where
    K: IntoValue + Clone,
{
    /// Returns true if an entry exists for `key`
    pub fn contains_key(&self, mem: &MutatorView, key: &K) -> Result<bool, RuntimeError> {
        let key = key.clone().into_value(mem)?;
        self.dict.exists(mem, &key)
    }
}

impl<K, V> TypedDict<K, V>
where
    K: IntoValue + Clone,
    V: FromValue,
{
    /// Look up `key` and convert the entry's value to `V`. A missing key is a `KeyError`.
    pub fn get(&self, mem: &MutatorView, key: &K) -> Result<V, RuntimeError> {
        let key = key.clone().into_value(mem)?;
        let value = self.dict.lookup(mem, &key)?;
        V::from_value(mem, &value)
    }
}

impl<K, V> TypedDict<K, V>
where
    K: IntoValue,
    V: IntoValue,
{
    /// Convert both sides and store the entry, replacing any previous value for the key
    pub fn insert(&self, mem: &MutatorView, key: K, value: V) -> Result<(), RuntimeError> {
        let key = key.into_value(mem)?;
        let value = value.into_value(mem)?;
        self.dict.assoc(mem, key, value)
    }
}

impl<K, V> TypedDict<K, V>
where
    K: FromValue,
    V: FromValue,
{
    /// Iterate over the entries in insertion order, converting each as it is reached
    pub fn iter<'guard>(&'guard self, guard: &'guard dyn MutatorScope) -> ItemIter<'guard, K, V> {
        ItemIter {
            raw: self.dict.iter(guard),
            guard,
            failed: false,
            _entry: PhantomData,
        }
    }
}

/// Converting iterator over dict entries. Exhausted after the first failure.
pub struct ItemIter<'guard, K, V> {
    raw: DictIter<'guard>,
    guard: &'guard dyn MutatorScope,
    failed: bool,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<'guard, K, V> Iterator for ItemIter<'guard, K, V>
where
    K: FromValue,
    V: FromValue,
{
    type Item = Result<(K, V), RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let guard = self.guard;
        let item = self.raw.next()?.and_then(|(key, value)| {
            Ok((K::from_value(guard, &key)?, V::from_value(guard, &value)?))
        });

        if item.is_err() {
            self.failed = true;
        }

        Some(item)
    }
}

impl<K, V> Clone for TypedDict<K, V> {
    fn clone(&self) -> TypedDict<K, V> {
        TypedDict::wrap(Rc::clone(&self.dict))
    }
}

impl<K: TypeName, V: TypeName> TypeName for TypedDict<K, V> {
    fn type_name() -> String {
        format!("Dict[{}, {}]", K::type_name(), V::type_name())
    }
}

impl<K, V> FromValue for TypedDict<K, V> {
    fn from_value(
        _guard: &dyn MutatorScope,
        value: &Value,
    ) -> Result<TypedDict<K, V>, RuntimeError> {
        match value {
            Value::Dict(dict) => Ok(TypedDict::wrap(Rc::clone(dict))),
            other => Err(err_type("dict", other.type_name())),
        }
    }
}

impl<K, V> IntoValue for TypedDict<K, V> {
    fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(Value::from(self.dict))
    }
}

impl<K, V> CheckValue for TypedDict<K, V> {
    fn check(value: &Value) -> bool {
        TypedDict::<K, V>::matches(value)
    }
}

impl<K, V> fmt::Debug for TypedDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.as_value(), f)
    }
}
