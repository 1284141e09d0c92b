//! Workspace adapters.

pub mod local;

pub use local::LocalWorkspace;
