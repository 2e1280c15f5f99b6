/// Basic mutable dict type
///
/// Entries are kept in insertion order; a side table maps each hashable key to its entry slot.
use std::cell::RefCell;

use fnv::FnvHashMap;

use crate::array::ArraySize;
use crate::containers::{Container, HashIndexedAnyContainer};
use crate::error::{ErrorKind, RuntimeError};
use crate::memory::{MutatorScope, MutatorView};
use crate::value::Value;

/// Internal entry representation
#[derive(Clone)]
pub struct DictItem {
    pub key: Value,
    pub value: Value,
}

/// The hashable projection of a key value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum HashKey {
    Nil,
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Generate the hash table key for a value. Floats and containers are unhashable.
fn hash_key(key: &Value) -> Result<HashKey, RuntimeError> {
    match key {
        Value::Nil => Ok(HashKey::Nil),
        Value::Bool(b) => Ok(HashKey::Bool(*b)),
        Value::Number(n) => Ok(HashKey::Number(*n)),
        Value::Text(t) => Ok(HashKey::Text(String::from(t.as_str()))),
        _ => Err(RuntimeError::new(ErrorKind::UnhashableError)),
    }
}

/// A mutable Dict key/value associative data structure.
pub struct Dict {
    entries: RefCell<Vec<DictItem>>,
    slots: RefCell<FnvHashMap<HashKey, usize>>,
}

impl Dict {
    /// Copy the entries out, in insertion order
    pub fn items(&self, _guard: &dyn MutatorScope) -> Vec<DictItem> {
        self.entries.borrow().clone()
    }

    /// Iterate over entries in insertion order
    pub fn iter<'guard>(&'guard self, guard: &'guard dyn MutatorScope) -> DictIter<'guard> {
        DictIter {
            dict: self,
            _guard: guard,
            index: 0,
        }
    }

    fn item_at(&self, index: usize) -> Option<DictItem> {
        self.entries.borrow().get(index).cloned()
    }
}

impl Container<DictItem> for Dict {
    fn new() -> Dict {
        Dict {
            entries: RefCell::new(Vec::new()),
            slots: RefCell::new(FnvHashMap::default()),
        }
    }

    fn with_capacity(mem: &MutatorView, capacity: ArraySize) -> Result<Dict, RuntimeError> {
        mem.reserve(capacity as usize)?;

        let mut slots = FnvHashMap::default();
        slots.reserve(capacity as usize);

        Ok(Dict {
            entries: RefCell::new(Vec::with_capacity(capacity as usize)),
            slots: RefCell::new(slots),
        })
    }

    fn clear(&self, _guard: &dyn MutatorScope) -> Result<(), RuntimeError> {
        self.entries.borrow_mut().clear();
        self.slots.borrow_mut().clear();
        Ok(())
    }

    fn length(&self) -> ArraySize {
        self.entries.borrow().len() as ArraySize
    }
}

impl HashIndexedAnyContainer for Dict {
    fn lookup(&self, _guard: &dyn MutatorScope, key: &Value) -> Result<Value, RuntimeError> {
        let hash = hash_key(key)?;

        match self.slots.borrow().get(&hash) {
            Some(&slot) => Ok(self.entries.borrow()[slot].value.clone()),
            None => Err(RuntimeError::new(ErrorKind::KeyError)),
        }
    }

    fn assoc(&self, mem: &MutatorView, key: Value, value: Value) -> Result<(), RuntimeError> {
        let hash = hash_key(&key)?;
        let mut slots = self.slots.borrow_mut();
        let mut entries = self.entries.borrow_mut();

        if let Some(&slot) = slots.get(&hash) {
            entries[slot].value = value;
        } else {
            mem.reserve(entries.len() + 1)?;
            slots.insert(hash, entries.len());
            entries.push(DictItem { key, value });
        }

        Ok(())
    }

    fn dissoc(&self, _guard: &dyn MutatorScope, key: &Value) -> Result<Value, RuntimeError> {
        let hash = hash_key(key)?;
        let mut slots = self.slots.borrow_mut();
        let mut entries = self.entries.borrow_mut();

        let slot = slots
            .remove(&hash)
            .ok_or_else(|| RuntimeError::new(ErrorKind::KeyError))?;
        let removed = entries.remove(slot);

        // entries after the removed one have shifted down by one
        for index in slots.values_mut() {
            if *index > slot {
                *index -= 1;
            }
        }

        Ok(removed.value)
    }

    fn exists(&self, _guard: &dyn MutatorScope, key: &Value) -> Result<bool, RuntimeError> {
        let hash = hash_key(key)?;
        Ok(self.slots.borrow().contains_key(&hash))
    }
}

/// Raw iterator over a Dict's entries in insertion order
pub struct DictIter<'guard> {
    dict: &'guard Dict,
    _guard: &'guard dyn MutatorScope,
    index: usize,
}

impl<'guard> Iterator for DictIter<'guard> {
    type Item = Result<(Value, Value), RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.dict.item_at(self.index)?;
        self.index += 1;
        Some(Ok((item.key, item.value)))
    }
}

#[cfg(test)]
mod test {
    use super::{Container, Dict, HashIndexedAnyContainer};
    use crate::error::{ErrorKind, RuntimeError};
    use crate::memory::{HeapConfig, Memory, Mutator, MutatorView};
    use crate::value::Value;

    #[test]
    fn dict_assoc_lookup() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let dict = Dict::new();
                let key = view.alloc_text("foo");

                dict.assoc(view, key.clone(), Value::Number(1))?;
                dict.assoc(view, Value::Number(2), Value::Bool(true))?;
                assert_eq!(dict.lookup(view, &key)?, Value::Number(1));

                // an equal but distinct text object finds the same entry
                let same_key = view.alloc_text("foo");
                assert!(!same_key.is(&key));
                dict.assoc(view, same_key, Value::Number(10))?;
                assert_eq!(dict.lookup(view, &key)?, Value::Number(10));
                assert_eq!(dict.length(), 2);

                assert!(dict.exists(view, &Value::Number(2))?);
                assert!(!dict.exists(view, &Value::Number(3))?);

                match dict.lookup(view, &Value::Nil) {
                    Err(e) => assert_eq!(*e.error_kind(), ErrorKind::KeyError),
                    Ok(_) => panic!("missing key should not be found"),
                }

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn dict_dissoc_keeps_order() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let dict = Dict::new();
                for n in 0..5 {
                    dict.assoc(view, Value::Number(n), Value::Number(n * 10))?;
                }

                assert_eq!(dict.dissoc(view, &Value::Number(1))?, Value::Number(10));
                assert!(dict.dissoc(view, &Value::Number(1)).is_err());

                let keys = dict
                    .iter(view)
                    .map(|item| item.map(|(k, _)| k))
                    .collect::<Result<Vec<Value>, RuntimeError>>()?;
                assert_eq!(
                    keys,
                    vec![
                        Value::Number(0),
                        Value::Number(2),
                        Value::Number(3),
                        Value::Number(4)
                    ]
                );

                // slots were renumbered after the removal
                assert_eq!(dict.lookup(view, &Value::Number(4))?, Value::Number(40));

                dict.clear(view)?;
                assert_eq!(dict.length(), 0);
                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn dict_unhashable_and_limits() {
        let mem = Memory::with_config(HeapConfig {
            max_array_length: 1,
        });

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let dict = Dict::new();

                match dict.assoc(view, Value::Float(1.5), Value::Nil) {
                    Err(e) => assert_eq!(*e.error_kind(), ErrorKind::UnhashableError),
                    Ok(_) => panic!("float keys are unhashable"),
                }

                match dict.assoc(view, Value::List(view.alloc_list()), Value::Nil) {
                    Err(e) => assert_eq!(*e.error_kind(), ErrorKind::UnhashableError),
                    Ok(_) => panic!("list keys are unhashable"),
                }

                dict.assoc(view, Value::Number(1), Value::Nil)?;
                // replacing an existing key does not grow the dict
                dict.assoc(view, Value::Number(1), Value::Bool(true))?;

                match dict.assoc(view, Value::Number(2), Value::Nil) {
                    Err(e) => assert_eq!(*e.error_kind(), ErrorKind::OutOfMemory),
                    Ok(_) => panic!("growth past the heap limit should fail"),
                }

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }
}
