//! Store ports - persistence collaborators consumed at the boundary.
//!
//! The engine only reads definitions; CRUD mechanics live with the
//! collaborator behind these traits.

use async_trait::async_trait;

use crate::domain::errors::SwarmResult;
use crate::domain::models::{StackConfig, WorkflowDefinition};

/// Read access to stored workflow definitions.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn get(&self, id: &str) -> SwarmResult<Option<WorkflowDefinition>>;
}

/// Read access to stack configs (built-ins plus user-stored).
#[async_trait]
pub trait StackStore: Send + Sync {
    async fn get(&self, slug: &str) -> SwarmResult<Option<StackConfig>>;

    /// All known stacks, built-ins first.
    async fn list(&self) -> SwarmResult<Vec<StackConfig>>;
}
