//! Stack configs: the flat, edge-less roster alternative to a workflow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::agent::StackRole;

/// Per-role settings within a stack roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackAgentConfig {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Optional persona override for this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

const fn default_temperature() -> f64 {
    0.7
}

/// A named stack: a fixed roster of agent roles with model settings and a
/// default model for roles not in the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub default_model: String,
    pub agents: HashMap<StackRole, StackAgentConfig>,
}

impl StackConfig {
    /// Settings for a role, falling back to the stack default model when the
    /// role is not in the roster.
    pub fn agent_config(&self, role: StackRole) -> StackAgentConfig {
        self.agents.get(&role).cloned().unwrap_or(StackAgentConfig {
            model: self.default_model.clone(),
            temperature: default_temperature(),
            system_prompt: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_miss_uses_default_model() {
        let stack = StackConfig {
            name: "Test".into(),
            slug: "test".into(),
            description: String::new(),
            default_model: "gpt-4o-mini".into(),
            agents: HashMap::from([(
                StackRole::Architect,
                StackAgentConfig {
                    model: "claude-3-5-sonnet-20241022".into(),
                    temperature: 0.5,
                    system_prompt: None,
                },
            )]),
        };

        assert_eq!(
            stack.agent_config(StackRole::Architect).model,
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(stack.agent_config(StackRole::Infra).model, "gpt-4o-mini");
    }
}
