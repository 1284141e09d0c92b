//! Service layer: the workflow execution engine.

pub mod compiler;
pub mod extractor;
pub mod orchestrator;
pub mod registry;
pub mod router;
pub mod yaml;

pub use compiler::WorkflowCompiler;
pub use orchestrator::{apply_file_operations, Orchestrator, OrchestratorConfig};
