//! Ports: interfaces the engine consumes from its collaborators.

pub mod completion;
pub mod stores;
pub mod workspace;

pub use completion::{CompletionProvider, CompletionRequest, CompletionResponse};
pub use stores::{StackStore, WorkflowStore};
pub use workspace::{FileContent, FileEntry, SearchMatch, Workspace};
