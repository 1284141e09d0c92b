//! Redstone - Multi-agent workflow engine
//!
//! Redstone executes coding requests through teams of role-specialized AI
//! agents, either as a flat stack (one role chosen by keyword routing) or as
//! a workflow graph compiled to a deterministic execution order.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models, ports, and errors
//! - **Service Layer** (`services`): Compiler, router, extractor, orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Providers, workspaces, stores
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use redstone::services::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Build stores and a provider, then execute a ChatRequest
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{SwarmError, SwarmResult};
pub use domain::models::{
    AgentNode, AgentSelector, AgentType, ChatRequest, ChatResponse, Config, Edge, ExecutionPlan,
    FileOperation, StackConfig, StackRole, StreamEvent, WorkflowDefinition,
};
pub use domain::ports::{CompletionProvider, StackStore, WorkflowStore, Workspace};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Orchestrator, OrchestratorConfig, WorkflowCompiler};
