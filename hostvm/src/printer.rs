use std::cell::RefCell;
use std::fmt;

use fnv::FnvHashSet;
use itertools::Itertools;

use crate::dict::Dict;
use crate::list::List;
use crate::memory::MutatorScope;
use crate::value::Value;

/// Trait for rendering runtime objects through the `Display` and `Debug` traits of `Value`
pub trait Print {
    fn print(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result;

    fn debug(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        self.print(guard, f)
    }
}

thread_local! {
    // addresses of the containers currently being rendered on this thread
    static IN_PROGRESS: RefCell<FnvHashSet<usize>> = RefCell::new(FnvHashSet::default());
}

/// Marks a container as being rendered until dropped. A container that is reached again while
/// it is already being rendered contains itself and is shown abbreviated.
struct Visit {
    addr: usize,
}

impl Visit {
    fn enter<T>(object: &T) -> Option<Visit> {
        let addr = object as *const T as usize;

        if IN_PROGRESS.with(|visiting| visiting.borrow_mut().insert(addr)) {
            Some(Visit { addr })
        } else {
            None
        }
    }
}

impl Drop for Visit {
    fn drop(&mut self) {
        IN_PROGRESS.with(|visiting| visiting.borrow_mut().remove(&self.addr));
    }
}

impl Print for List {
    fn print(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        let _visit = match Visit::enter(self) {
            Some(visit) => visit,
            None => return write!(f, "[...]"),
        };

        match self.to_vec(guard) {
            Ok(items) => write!(f, "[{}]", items.iter().join(", ")),
            Err(_) => write!(f, "[...]"),
        }
    }

    fn debug(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        let _visit = match Visit::enter(self) {
            Some(visit) => visit,
            None => return write!(f, "[...]"),
        };

        match self.to_vec(guard) {
            Ok(items) => write!(
                f,
                "List({})[{}]",
                items.len(),
                items.iter().map(|item| format!("{:?}", item)).join(", ")
            ),
            Err(_) => write!(f, "List[...]"),
        }
    }
}

impl Print for Dict {
    fn print(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        let _visit = match Visit::enter(self) {
            Some(visit) => visit,
            None => return write!(f, "{{...}}"),
        };

        let items = self.items(guard);
        write!(
            f,
            "{{{}}}",
            items
                .iter()
                .map(|item| format!("{}: {}", item.key, item.value))
                .join(", ")
        )
    }

    fn debug(&self, guard: &dyn MutatorScope, f: &mut fmt::Formatter) -> fmt::Result {
        let _visit = match Visit::enter(self) {
            Some(visit) => visit,
            None => return write!(f, "{{...}}"),
        };

        let items = self.items(guard);
        write!(
            f,
            "Dict({}){{{}}}",
            items.len(),
            items
                .iter()
                .map(|item| format!("{:?}: {:?}", item.key, item.value))
                .join(", ")
        )
    }
}

pub fn print(value: &Value) -> String {
    format!("{}", value)
}

pub fn debug(value: &Value) -> String {
    format!("{:?}", value)
}
