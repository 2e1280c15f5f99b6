/// Statically typed view over a runtime List
///
/// A `TypedList<T>` shares its list with every other holder of the same `Rc<List>`. The element
/// type is a compile-time tag only: elements are converted to `T` when they are read, and
/// converted from `T` when they are appended, never when the view is created.
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use hostvm::array::ArraySize;
use hostvm::cast::{CastIter, CheckValue, FromValue, IntoValue};
use hostvm::containers::{Container, StackContainer};
use hostvm::error::{err_type, RuntimeError};
use hostvm::list::{List, ListIter};
use hostvm::memory::{MutatorScope, MutatorView};
use hostvm::typename::TypeName;
use hostvm::value::Value;

pub struct TypedList<T> {
    list: Rc<List>,
    _element: PhantomData<fn() -> T>,
}

impl<T> TypedList<T> {
    /// Allocate a new, empty list and view it as a list of `T`
    pub fn new(mem: &MutatorView) -> TypedList<T> {
        TypedList::wrap(mem.alloc_list())
    }

    /// View an existing list as a list of `T`. The list's contents are not inspected.
    pub fn wrap(list: Rc<List>) -> TypedList<T> {
        TypedList {
            list,
            _element: PhantomData,
        }
    }

    /// Shape check: true for any list handle, whatever its elements
    pub fn matches(value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    pub fn len(&self) -> ArraySize {
        self.list.length()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying shared list
    pub fn list(&self) -> &Rc<List> {
        &self.list
    }

    /// A new runtime handle to the underlying list
    pub fn as_value(&self) -> Value {
        Value::List(Rc::clone(&self.list))
    }
}

impl<T: FromValue> TypedList<T> {
    /// Read the element at `index` as a `T`.
    ///
    /// An index past the end is an `IndexError` and an element of the wrong dynamic type is a
    /// `TypeError`; both come back exactly as the runtime raised them.
    pub fn get(&self, guard: &dyn MutatorScope, index: ArraySize) -> Result<T, RuntimeError> {
        let item = self.list.read_ref(guard, index)?;
        T::from_value(guard, &item)
    }

    /// Iterate over the elements, converting each one as it is reached
    pub fn iter<'guard>(
        &'guard self,
        guard: &'guard dyn MutatorScope,
    ) -> CastIter<'guard, T, ListIter<'guard>> {
        CastIter::new(guard, self.list.iter(guard))
    }
}

impl<T: IntoValue> TypedList<T> {
    /// Build a new list from native items
    pub fn from_items<I>(mem: &MutatorView, items: I) -> Result<TypedList<T>, RuntimeError>
    where
        I: IntoIterator<Item = T>,
    {
        let typed = TypedList::new(mem);
        for item in items {
            typed.append(mem, item)?;
        }
        Ok(typed)
    }

    /// Convert `value` and push it onto the end of the list
    pub fn append(&self, mem: &MutatorView, value: T) -> Result<(), RuntimeError> {
        let item = value.into_value(mem)?;
        // the receiver is known to be a list, so push directly
        self.list.push(mem, item)
    }
}

impl<T> Clone for TypedList<T> {
    fn clone(&self) -> TypedList<T> {
        TypedList::wrap(Rc::clone(&self.list))
    }
}

impl<T: TypeName> TypeName for TypedList<T> {
    fn type_name() -> String {
        format!("List[{}]", T::type_name())
    }
}

impl<T> FromValue for TypedList<T> {
    fn from_value(_guard: &dyn MutatorScope, value: &Value) -> Result<TypedList<T>, RuntimeError> {
        match value {
            Value::List(list) => Ok(TypedList::wrap(Rc::clone(list))),
            other => Err(err_type("list", other.type_name())),
        }
    }
}

impl<T> IntoValue for TypedList<T> {
    fn into_value(self, _mem: &MutatorView) -> Result<Value, RuntimeError> {
        Ok(Value::from(self.list))
    }
}

impl<T> CheckValue for TypedList<T> {
    fn check(value: &Value) -> bool {
        TypedList::<T>::matches(value)
    }
}

impl<T> fmt::Debug for TypedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.as_value(), f)
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use hostvm::containers::{SliceableContainer, StackContainer};
    use hostvm::error::{ErrorCategory, ErrorKind, RuntimeError};
    use hostvm::memory::{HeapConfig, Memory, Mutator, MutatorView};
    use hostvm::parser::{parse, parse_list_literal};
    use hostvm::typename::TypeName;
    use hostvm::value::Value;
    use hostvm::{cast, CheckValue};

    use super::TypedList;

    fn kind_of<T>(result: Result<T, RuntimeError>) -> ErrorKind {
        match result {
            Err(e) => e.error_kind().clone(),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn typed_list_index_and_append() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let numbers: TypedList<i64> =
                    TypedList::wrap(parse_list_literal(view, "[1, 2, 3]")?);

                assert_eq!(numbers.get(view, 1)?, 2);

                numbers.append(view, 4)?;
                assert_eq!(numbers.len(), 4);
                assert_eq!(numbers.get(view, 3)?, 4);

                let err = numbers.get(view, 10).unwrap_err();
                assert_eq!(*err.error_kind(), ErrorKind::IndexError);
                assert_eq!(err.category(), ErrorCategory::IndexAccess);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_mixed_elements() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let numbers: TypedList<i64> =
                    TypedList::wrap(parse_list_literal(view, "[1, \"x\", 3]")?);

                assert_eq!(numbers.get(view, 0)?, 1);
                assert_eq!(
                    kind_of(numbers.get(view, 1)),
                    ErrorKind::TypeError(String::from("expected int, found str"))
                );
                // later elements are still readable one at a time
                assert_eq!(numbers.get(view, 2)?, 3);

                let mut iter = numbers.iter(view);
                assert_eq!(iter.next(), Some(Ok(1)));
                match iter.next() {
                    Some(Err(e)) => assert_eq!(e.category(), ErrorCategory::TypeConversion),
                    other => panic!("expected a conversion failure, got {:?}", other),
                }
                assert_eq!(iter.next(), None);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_iterates_in_order() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let words = TypedList::from_items(view, vec!["a", "b", "c"])?;
                let words: TypedList<String> = TypedList::wrap(Rc::clone(words.list()));

                let collected = words.iter(view).collect::<Result<Vec<String>, _>>()?;
                assert_eq!(collected, vec!["a", "b", "c"]);
                assert_eq!(words.iter(view).count(), words.len() as usize);

                let empty: TypedList<f64> = TypedList::new(view);
                assert!(empty.is_empty());
                assert_eq!(empty.iter(view).next(), None);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_views_share_storage() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let first: TypedList<i64> = TypedList::new(view);
                let second = first.clone();
                let untyped: TypedList<Value> = TypedList::wrap(Rc::clone(first.list()));

                second.append(view, 5)?;
                assert_eq!(first.get(view, 0)?, 5);

                // a holder without the static type can place anything in the list
                untyped.append(view, Value::Bool(true))?;
                assert_eq!(first.len(), 2);
                assert!(first.get(view, 1).is_err());

                assert!(first.as_value().is(&second.as_value()));
                assert_eq!(Rc::strong_count(first.list()), 3);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_nested() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let rows: TypedList<TypedList<i64>> =
                    TypedList::wrap(parse_list_literal(view, "[[1, 2], [], 3]")?);

                let row = rows.get(view, 0)?;
                assert_eq!(row.get(view, 1)?, 2);
                assert!(rows.get(view, 1)?.is_empty());
                assert_eq!(
                    kind_of(rows.get(view, 2)),
                    ErrorKind::TypeError(String::from("expected list, found int"))
                );

                let inner = TypedList::from_items(view, vec![7i64])?;
                rows.append(view, inner)?;
                assert_eq!(rows.get(view, 3)?.get(view, 0)?, 7);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_optional_elements() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let maybe: TypedList<Option<i64>> =
                    TypedList::wrap(parse_list_literal(view, "[1, None]")?);

                assert_eq!(
                    maybe.iter(view).collect::<Result<Vec<_>, _>>()?,
                    vec![Some(1), None]
                );

                maybe.append(view, None)?;
                assert_eq!(maybe.get(view, 2)?, None);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_holding_itself_still_prints() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let any: TypedList<Value> = TypedList::new(view);
                any.append(view, any.as_value())?;

                assert_eq!(format!("{:?}", any), "List(1)[[...]]");
                assert_eq!(format!("{}", any.as_value()), "[[...]]");
                assert!(any.get(view, 0)?.is(&any.as_value()));

                any.list().pop(view)?;
                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_descriptors() {
        assert_eq!(TypedList::<i64>::type_name(), "List[int]");
        assert_eq!(TypedList::<String>::type_name(), "List[str]");
        assert_eq!(TypedList::<TypedList<i64>>::type_name(), "List[List[int]]");
        assert_eq!(
            TypedList::<Option<f64>>::type_name(),
            "List[Optional[float]]"
        );
        assert_eq!(TypedList::<Value>::type_name(), "List[object]");
    }

    #[test]
    fn typed_list_matches_shape_only() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                assert!(TypedList::<i64>::matches(&parse(view, "[]")?));
                assert!(TypedList::<i64>::matches(&parse(view, "[\"a\", 2.5]")?));
                assert!(TypedList::<String>::check(&parse(view, "[[1]]")?));

                assert!(!TypedList::<i64>::matches(&parse(view, "1")?));
                assert!(!TypedList::<i64>::matches(&parse(view, "\"[1]\"")?));
                assert!(!TypedList::<i64>::matches(&parse(view, "{}")?));
                assert!(!TypedList::<i64>::matches(&Value::Nil));

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_crosses_value_boundary() {
        let mem = Memory::new();

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let value = parse(view, "[1.5, 2]")?;
                let floats = cast::<TypedList<f64>>(view, &value)?;
                assert_eq!(floats.get(view, 1)?, 2.0);

                assert!(cast::<TypedList<f64>>(view, &Value::Number(1)).is_err());

                let back = hostvm::IntoValue::into_value(floats, view)?;
                assert!(back.is(&value));

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }

    #[test]
    fn typed_list_append_failures() {
        let mem = Memory::with_config(HeapConfig {
            max_array_length: 2,
        });

        struct Test {}
        impl Mutator for Test {
            type Input = ();
            type Output = ();

            fn run(&self, view: &MutatorView, _input: ()) -> Result<(), RuntimeError> {
                let small: TypedList<u64> = TypedList::from_items(view, vec![1, 2])?;

                let err = small.append(view, 3).unwrap_err();
                assert_eq!(*err.error_kind(), ErrorKind::OutOfMemory);
                assert_eq!(err.category(), ErrorCategory::RuntimeOperation);
                assert_eq!(small.len(), 2);

                // a value that cannot become a runtime int is rejected before the push
                let wide: TypedList<u64> = TypedList::new(view);
                let err = wide.append(view, u64::MAX).unwrap_err();
                assert_eq!(err.category(), ErrorCategory::TypeConversion);
                assert!(wide.is_empty());

                // pushing while the storage is borrowed fails instead of panicking
                let blocked = small.list().access_slice(view, |_items| {
                    small.list().push(view, Value::Nil)
                })?;
                assert_eq!(
                    *blocked.unwrap_err().error_kind(),
                    ErrorKind::MutableBorrowError
                );

                // reads during the borrow keep the runtime's error rather than an index error
                let err = small
                    .list()
                    .access_slice(view, |_items| small.get(view, 0))?
                    .unwrap_err();
                assert_eq!(*err.error_kind(), ErrorKind::MutableBorrowError);
                assert_eq!(err.category(), ErrorCategory::RuntimeOperation);

                Ok(())
            }
        }

        mem.mutate(&Test {}, ()).unwrap();
    }
}
