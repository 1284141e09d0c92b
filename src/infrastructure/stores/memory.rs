//! In-memory workflow and stack stores.
//!
//! The stack store is seeded with the built-in rosters; user-registered
//! stacks layer on top and may shadow a built-in slug.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::errors::SwarmResult;
use crate::domain::models::{StackAgentConfig, StackConfig, StackRole, WorkflowDefinition};
use crate::domain::ports::{StackStore, WorkflowStore};

/// Workflow store backed by a map.
#[derive(Default)]
pub struct InMemoryWorkflowStore {
    workflows: RwLock<HashMap<String, WorkflowDefinition>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, workflow: WorkflowDefinition) {
        self.workflows
            .write()
            .await
            .insert(workflow.id.clone(), workflow);
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn get(&self, id: &str) -> SwarmResult<Option<WorkflowDefinition>> {
        Ok(self.workflows.read().await.get(id).cloned())
    }
}

/// Stack store seeded with the built-in rosters.
pub struct InMemoryStackStore {
    builtins: Vec<StackConfig>,
    user_stacks: RwLock<HashMap<String, StackConfig>>,
}

impl InMemoryStackStore {
    pub fn new() -> Self {
        Self {
            builtins: builtin_stacks(),
            user_stacks: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, stack: StackConfig) {
        self.user_stacks
            .write()
            .await
            .insert(stack.slug.clone(), stack);
    }
}

impl Default for InMemoryStackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StackStore for InMemoryStackStore {
    async fn get(&self, slug: &str) -> SwarmResult<Option<StackConfig>> {
        if let Some(stack) = self.user_stacks.read().await.get(slug) {
            return Ok(Some(stack.clone()));
        }
        Ok(self.builtins.iter().find(|s| s.slug == slug).cloned())
    }

    async fn list(&self) -> SwarmResult<Vec<StackConfig>> {
        let user_stacks = self.user_stacks.read().await;
        let mut stacks: Vec<StackConfig> = self
            .builtins
            .iter()
            .map(|b| user_stacks.get(&b.slug).unwrap_or(b).clone())
            .collect();
        let mut extra: Vec<StackConfig> = user_stacks
            .values()
            .filter(|s| !self.builtins.iter().any(|b| b.slug == s.slug))
            .cloned()
            .collect();
        extra.sort_by(|a, b| a.slug.cmp(&b.slug));
        stacks.extend(extra);
        Ok(stacks)
    }
}

fn role_entry(role: StackRole, model: &str, temperature: f64) -> (StackRole, StackAgentConfig) {
    (
        role,
        StackAgentConfig {
            model: model.to_string(),
            temperature,
            system_prompt: None,
        },
    )
}

/// The built-in stack rosters, in catalog order.
pub fn builtin_stacks() -> Vec<StackConfig> {
    vec![
        StackConfig {
            name: "Architect Pro".to_string(),
            slug: "architect-pro".to_string(),
            description: "Best for system design and large codebases. Deep architectural reasoning."
                .to_string(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            agents: HashMap::from([
                role_entry(StackRole::Architect, "claude-3-5-sonnet-20241022", 0.5),
                role_entry(StackRole::Product, "claude-3-5-sonnet-20241022", 0.7),
                role_entry(StackRole::Implementation, "claude-3-5-sonnet-20241022", 0.3),
            ]),
        },
        StackConfig {
            name: "Speed Demon".to_string(),
            slug: "speed-demon".to_string(),
            description: "Optimized for fast iteration and prototyping with small models."
                .to_string(),
            default_model: "gpt-4o-mini".to_string(),
            agents: HashMap::from([
                role_entry(StackRole::Architect, "gpt-4o-mini", 0.7),
                role_entry(StackRole::Product, "gpt-4o-mini", 0.8),
                role_entry(StackRole::Implementation, "gpt-4o-mini", 0.5),
            ]),
        },
        StackConfig {
            name: "Full Stack".to_string(),
            slug: "full-stack".to_string(),
            description: "Balanced stack for production applications.".to_string(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            agents: HashMap::from([
                role_entry(StackRole::Architect, "claude-3-5-sonnet-20241022", 0.5),
                role_entry(StackRole::Product, "gpt-4o", 0.7),
                role_entry(StackRole::Implementation, "gpt-4o", 0.3),
                role_entry(StackRole::Reviewer, "claude-3-5-sonnet-20241022", 0.3),
            ]),
        },
        StackConfig {
            name: "Budget Builder".to_string(),
            slug: "budget-builder".to_string(),
            description: "Cost-effective development. Great for learning and small projects."
                .to_string(),
            default_model: "gpt-4o-mini".to_string(),
            agents: HashMap::from([
                role_entry(StackRole::Architect, "gpt-4o-mini", 0.6),
                role_entry(StackRole::Product, "gpt-4o-mini", 0.7),
                role_entry(StackRole::Implementation, "gpt-4o-mini", 0.4),
            ]),
        },
        StackConfig {
            name: "Security First".to_string(),
            slug: "security-first".to_string(),
            description: "Security-focused stack with enhanced review.".to_string(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            agents: HashMap::from([
                role_entry(StackRole::Architect, "claude-3-5-sonnet-20241022", 0.3),
                role_entry(StackRole::Reviewer, "claude-3-5-sonnet-20241022", 0.2),
                role_entry(StackRole::BuildTest, "claude-3-5-sonnet-20241022", 0.3),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtins_present_and_ordered() {
        let store = InMemoryStackStore::new();
        let stacks = store.list().await.unwrap();
        let slugs: Vec<&str> = stacks.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "architect-pro",
                "speed-demon",
                "full-stack",
                "budget-builder",
                "security-first"
            ]
        );
    }

    #[tokio::test]
    async fn user_stack_shadows_builtin() {
        let store = InMemoryStackStore::new();
        store
            .insert(StackConfig {
                name: "My Speed".to_string(),
                slug: "speed-demon".to_string(),
                description: String::new(),
                default_model: "gpt-4o".to_string(),
                agents: HashMap::new(),
            })
            .await;

        let stack = store.get("speed-demon").await.unwrap().unwrap();
        assert_eq!(stack.name, "My Speed");

        // Shadowed slugs are not duplicated in the listing.
        let stacks = store.list().await.unwrap();
        assert_eq!(
            stacks.iter().filter(|s| s.slug == "speed-demon").count(),
            1
        );
    }

    #[tokio::test]
    async fn unknown_workflow_is_none() {
        let store = InMemoryWorkflowStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
