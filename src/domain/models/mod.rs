//! Domain models for the Redstone swarm engine.

pub mod agent;
pub mod chat;
pub mod config;
pub mod stack;
pub mod workflow;

pub use agent::{AgentNode, AgentTurn, AgentType, StackRole};
pub use chat::{
    AgentSelector, ChatRequest, ChatResponse, FileApplyResult, FileOperation, StreamEvent,
};
pub use config::{Config, LoggingConfig, ProvidersConfig, WorkspacesConfig};
pub use stack::{StackAgentConfig, StackConfig};
pub use workflow::{Edge, ExecutionPlan, GlobalSettings, WorkflowDefinition};
