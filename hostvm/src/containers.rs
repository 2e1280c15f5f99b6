/// Container traits
///
/// These are the raw, untyped primitives of the runtime's containers. Typed views are built on
/// top of them and never reach inside a container any other way.
use crate::array::ArraySize;
use crate::error::RuntimeError;
use crate::memory::{MutatorScope, MutatorView};
use crate::value::Value;

/// Base container-type trait. All container types are subtypes of `Container`.
///
/// All container operations _must_ follow interior mutability only rules: containers are shared
/// through `Rc` handles and are only ever reached through `&self`.
pub trait Container<T: Sized + Clone>: Sized {
    /// Create a new, empty container instance.
    fn new() -> Self;

    /// Create a new container instance with the given capacity.
    fn with_capacity(mem: &MutatorView, capacity: ArraySize) -> Result<Self, RuntimeError>;

    /// Reset the size of the container to zero - empty
    fn clear(&self, guard: &dyn MutatorScope) -> Result<(), RuntimeError>;

    /// Count of items in the container
    fn length(&self) -> ArraySize;
}

/// Generic stack trait. If implemented, the container can function as a stack
pub trait StackContainer<T: Sized + Clone>: Container<T> {
    /// Push may grow the container past a heap limit, hence it requires the full mutator view
    fn push(&self, mem: &MutatorView, item: T) -> Result<(), RuntimeError>;

    /// Pop returns an index error if the container is empty, otherwise moves the last item of
    /// the array out to the caller.
    fn pop(&self, guard: &dyn MutatorScope) -> Result<T, RuntimeError>;

    /// Return the value at the top of the stack without removing it
    fn top(&self, guard: &dyn MutatorScope) -> Result<T, RuntimeError>;
}

/// Generic indexed-access trait. If implemented, the container can function as an indexable vector
pub trait IndexedContainer<T: Sized + Clone>: Container<T> {
    /// Return a copy of the object at the given index. Bounds-checked.
    fn get(&self, guard: &dyn MutatorScope, index: ArraySize) -> Result<T, RuntimeError>;

    /// Move an object into the array at the given index. Bounds-checked.
    fn set(&self, guard: &dyn MutatorScope, index: ArraySize, item: T)
        -> Result<(), RuntimeError>;
}

/// A trait that is implemented for containers that can represent their contents as a slice.
pub trait SliceableContainer<T: Sized + Clone>: IndexedContainer<T> {
    /// Give a closure direct access to the container's items. While the closure runs, any other
    /// attempt to modify the container fails with a `MutableBorrowError`.
    fn access_slice<F, R>(&self, guard: &dyn MutatorScope, f: F) -> Result<R, RuntimeError>
    where
        F: FnOnce(&mut [T]) -> R;
}

/// Hashable-indexed interface. Objects used as keys must be hashable runtime values.
pub trait HashIndexedAnyContainer {
    /// Return the value associated with the given key.
    /// Absence of an association is a `KeyError`.
    fn lookup(&self, guard: &dyn MutatorScope, key: &Value) -> Result<Value, RuntimeError>;

    /// Associate a key with a value.
    fn assoc(&self, mem: &MutatorView, key: Value, value: Value) -> Result<(), RuntimeError>;

    /// Remove an association by its key.
    fn dissoc(&self, guard: &dyn MutatorScope, key: &Value) -> Result<Value, RuntimeError>;

    /// Returns true if the key exists in the container.
    fn exists(&self, guard: &dyn MutatorScope, key: &Value) -> Result<bool, RuntimeError>;
}

/// Build a container from the values in the slice
pub trait ContainerFromSlice<T: Sized + Clone>: Container<T> {
    fn from_slice(mem: &MutatorView, data: &[T]) -> Result<Self, RuntimeError>;
}
