//! Store adapters.

pub mod memory;

pub use memory::{builtin_stacks, InMemoryStackStore, InMemoryWorkflowStore};
