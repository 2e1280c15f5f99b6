/// List is an Array type that can contain any other object
use crate::array::{Array, ArraySize};
use crate::containers::{Container, IndexedContainer};
use crate::error::RuntimeError;
use crate::memory::MutatorScope;
use crate::value::Value;

/// A List can contain a mixed sequence of any type of value
pub type List = Array<Value>;

impl List {
    /// Iterate over the list by index. Each step re-reads the current length, so items pushed
    /// during iteration are visited and a shrinking list ends the iteration early.
    pub fn iter<'guard>(&'guard self, guard: &'guard dyn MutatorScope) -> ListIter<'guard> {
        ListIter {
            list: self,
            guard,
            index: 0,
        }
    }
}

/// Raw iterator over a List, yielding untyped handles
pub struct ListIter<'guard> {
    list: &'guard List,
    guard: &'guard dyn MutatorScope,
    index: ArraySize,
}

impl<'guard> Iterator for ListIter<'guard> {
    type Item = Result<Value, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.list.length() {
            return None;
        }

        let item = self.list.get(self.guard, self.index);
        self.index += 1;
        Some(item)
    }
}
