/// Runtime-level memory abstraction
///
/// Defines Heap and Memory types, and a MutatorView type that gives a mutator scoped access
/// to object allocation. Holding a `MutatorView` is what entitles code to touch runtime objects:
/// every container operation asks for one (or any other `MutatorScope`) as proof.
use std::rc::Rc;

use log::debug;

use crate::array::ArraySize;
use crate::containers::Container;
use crate::dict::Dict;
use crate::error::{ErrorKind, RuntimeError};
use crate::list::List;
use crate::text::Text;
use crate::value::Value;

/// Type that provides a generic anchor for mutator timeslice lifetimes
pub trait MutatorScope {}

/// Heap limits. The default configuration is unbounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeapConfig {
    /// Maximum number of items any single array-backed container may hold
    pub max_array_length: ArraySize,
}

impl Default for HeapConfig {
    fn default() -> HeapConfig {
        HeapConfig {
            max_array_length: ArraySize::MAX,
        }
    }
}

/// This type describes the mutator's view into memory.
///
/// It implements `MutatorScope` such that any scoped access to runtime objects must be
/// lifetime-limited to the lifetime of this instance using `&'scope dyn MutatorScope`.
pub struct MutatorView<'memory> {
    heap: &'memory Heap,
}

impl<'memory> MutatorView<'memory> {
    fn new(mem: &'memory Memory) -> MutatorView<'memory> {
        MutatorView { heap: &mem.heap }
    }

    /// Allocate a new, empty, shared List
    pub fn alloc_list(&self) -> Rc<List> {
        Rc::new(List::new())
    }

    /// Allocate a new, empty, shared Dict
    pub fn alloc_dict(&self) -> Rc<Dict> {
        Rc::new(Dict::new())
    }

    /// Allocate a Text object from a &str and return a handle to it
    pub fn alloc_text(&self, from_str: &str) -> Value {
        Value::Text(Rc::new(Text::new_from_str(from_str)))
    }

    /// Return a nil handle
    pub fn nil(&self) -> Value {
        Value::Nil
    }

    pub fn config(&self) -> &HeapConfig {
        &self.heap.config
    }

    /// Check that a container may grow to `length` items
    pub fn reserve(&self, length: usize) -> Result<(), RuntimeError> {
        let max = self.heap.config.max_array_length as usize;
        if length > max {
            debug!("refusing container growth to {} items, limit is {}", length, max);
            Err(RuntimeError::new(ErrorKind::OutOfMemory))
        } else {
            Ok(())
        }
    }
}

impl<'memory> MutatorScope for MutatorView<'memory> {}

// Heap state shared by all mutator views of one Memory.
struct Heap {
    config: HeapConfig,
}

/// Wraps a heap and provides scope-limited access to the heap
pub struct Memory {
    heap: Heap,
}

impl Memory {
    /// Instantiate a new memory environment with default limits
    pub fn new() -> Memory {
        Memory::with_config(HeapConfig::default())
    }

    /// Instantiate a new memory environment with the given limits
    pub fn with_config(config: HeapConfig) -> Memory {
        Memory {
            heap: Heap { config },
        }
    }

    /// Run a mutator process
    pub fn mutate<M: Mutator>(&self, m: &M, input: M::Input) -> Result<M::Output, RuntimeError> {
        let guard = MutatorView::new(self);
        m.run(&guard, input)
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}

/// Defines the interface a heap-mutating type must use to be allowed access to the heap
pub trait Mutator: Sized {
    type Input;
    type Output;

    fn run(&self, mem: &MutatorView, input: Self::Input) -> Result<Self::Output, RuntimeError>;
}
