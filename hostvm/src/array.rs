/// Basic mutable array type:
///
///  Array<T>
///  List = Array<Value>
use std::cell::{Cell, Ref, RefCell};

use log::trace;

use crate::containers::{
    Container, ContainerFromSlice, IndexedContainer, SliceableContainer, StackContainer,
};
use crate::error::{ErrorKind, RuntimeError};
use crate::memory::{MutatorScope, MutatorView};

/// Container length and index type
pub type ArraySize = u32;

/// An array, like Vec, but applying an interior mutability pattern.
///
/// Implements Container traits, including SliceableContainer.
/// Since SliceableContainer allows mutable access to the interior
/// of the array, RefCell-style runtime semantics are employed to
/// prevent the array being modified outside of the slice borrow.
pub struct Array<T: Sized + Clone> {
    length: Cell<ArraySize>,
    data: RefCell<Vec<T>>,
}

/// Internal implementation
impl<T: Sized + Clone> Array<T> {
    fn check_bounds(&self, index: ArraySize) -> Result<usize, RuntimeError> {
        if index >= self.length.get() {
            Err(RuntimeError::new(ErrorKind::IndexError))
        } else {
            Ok(index as usize)
        }
    }

    /// Bounds-checked reference-read. No copy of the item is made; the returned borrow must be
    /// released before the array can be modified again.
    pub fn read_ref(
        &self,
        _guard: &dyn MutatorScope,
        index: ArraySize,
    ) -> Result<Ref<'_, T>, RuntimeError> {
        let index = self.check_bounds(index)?;
        let data = self
            .data
            .try_borrow()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        Ok(Ref::map(data, |items| &items[index]))
    }

    /// Copy the array contents out into a Vec
    pub fn to_vec(&self, _guard: &dyn MutatorScope) -> Result<Vec<T>, RuntimeError> {
        let data = self
            .data
            .try_borrow()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        Ok(data.clone())
    }

    /// Current backing storage capacity
    pub fn capacity(&self) -> usize {
        self.data.try_borrow().map(|data| data.capacity()).unwrap_or(0)
    }
}

impl<T: Sized + Clone> Container<T> for Array<T> {
    fn new() -> Array<T> {
        Array {
            length: Cell::new(0),
            data: RefCell::new(Vec::new()),
        }
    }

    fn with_capacity(mem: &MutatorView, capacity: ArraySize) -> Result<Array<T>, RuntimeError> {
        mem.reserve(capacity as usize)?;

        Ok(Array {
            length: Cell::new(0),
            data: RefCell::new(Vec::with_capacity(capacity as usize)),
        })
    }

    fn clear(&self, _guard: &dyn MutatorScope) -> Result<(), RuntimeError> {
        let mut data = self
            .data
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        data.clear();
        self.length.set(0);
        Ok(())
    }

    fn length(&self) -> ArraySize {
        self.length.get()
    }
}

impl<T: Sized + Clone> StackContainer<T> for Array<T> {
    fn push(&self, mem: &MutatorView, item: T) -> Result<(), RuntimeError> {
        let mut data = self
            .data
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        let length = self.length.get();
        mem.reserve(length as usize + 1)?;

        if data.len() == data.capacity() {
            trace!("array storage full at {} items, growing", data.len());
        }

        data.push(item);
        self.length.set(length + 1);
        Ok(())
    }

    fn pop(&self, _guard: &dyn MutatorScope) -> Result<T, RuntimeError> {
        let mut data = self
            .data
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        match data.pop() {
            Some(item) => {
                self.length.set(self.length.get() - 1);
                Ok(item)
            }
            None => Err(RuntimeError::new(ErrorKind::IndexError)),
        }
    }

    fn top(&self, guard: &dyn MutatorScope) -> Result<T, RuntimeError> {
        let length = self.length.get();

        if length == 0 {
            Err(RuntimeError::new(ErrorKind::IndexError))
        } else {
            Ok(self.read_ref(guard, length - 1)?.clone())
        }
    }
}

impl<T: Sized + Clone> IndexedContainer<T> for Array<T> {
    fn get(&self, guard: &dyn MutatorScope, index: ArraySize) -> Result<T, RuntimeError> {
        Ok(self.read_ref(guard, index)?.clone())
    }

    fn set(
        &self,
        _guard: &dyn MutatorScope,
        index: ArraySize,
        item: T,
    ) -> Result<(), RuntimeError> {
        let index = self.check_bounds(index)?;
        let mut data = self
            .data
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        data[index] = item;
        Ok(())
    }
}

impl<T: Sized + Clone> SliceableContainer<T> for Array<T> {
    fn access_slice<F, R>(&self, _guard: &dyn MutatorScope, f: F) -> Result<R, RuntimeError>
    where
        F: FnOnce(&mut [T]) -> R,
    {
        let mut data = self
            .data
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))?;

        Ok(f(data.as_mut_slice()))
    }
}

impl<T: Sized + Clone> ContainerFromSlice<T> for Array<T> {
    fn from_slice(mem: &MutatorView, data: &[T]) -> Result<Array<T>, RuntimeError> {
        let array = Array::with_capacity(mem, data.len() as ArraySize)?;
        array.data.borrow_mut().extend_from_slice(data);
        array.length.set(data.len() as ArraySize);
        Ok(array)
    }
}
