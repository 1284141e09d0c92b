//! Agent domain models: workflow node types and the flat stack roster roles.

use serde::{Deserialize, Serialize};

/// The type of an agent node in a workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Orchestrator,
    Architect,
    Implementation,
    Reviewer,
    Tester,
    Debugger,
    Optimizer,
    Documenter,
    Custom,
}

impl AgentType {
    /// Parse an agent type from its wire string. Unknown values degrade to
    /// `Custom` so malformed workflow imports remain executable.
    pub fn parse(s: &str) -> Self {
        match s {
            "orchestrator" => AgentType::Orchestrator,
            "architect" => AgentType::Architect,
            "implementation" => AgentType::Implementation,
            "reviewer" => AgentType::Reviewer,
            "tester" => AgentType::Tester,
            "debugger" => AgentType::Debugger,
            "optimizer" => AgentType::Optimizer,
            "documenter" => AgentType::Documenter,
            _ => AgentType::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::Architect => "architect",
            AgentType::Implementation => "implementation",
            AgentType::Reviewer => "reviewer",
            AgentType::Tester => "tester",
            AgentType::Debugger => "debugger",
            AgentType::Optimizer => "optimizer",
            AgentType::Documenter => "documenter",
            AgentType::Custom => "custom",
        }
    }

    /// Map a workflow agent type onto the flat stack roster role that holds
    /// its persona. Debuggers run with the implementation persona, optimizers
    /// with the reviewer persona, documenters with the product persona.
    pub fn stack_role(&self) -> StackRole {
        match self {
            AgentType::Orchestrator => StackRole::Orchestrator,
            AgentType::Architect => StackRole::Architect,
            AgentType::Implementation | AgentType::Debugger => StackRole::Implementation,
            AgentType::Reviewer | AgentType::Optimizer => StackRole::Reviewer,
            AgentType::Tester => StackRole::BuildTest,
            AgentType::Documenter => StackRole::Product,
            AgentType::Custom => StackRole::Custom,
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role names of the flat, edge-less agent roster ("stack").
///
/// These are the keys of the legacy stack configs and the targets of
/// keyword routing in stack mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackRole {
    Orchestrator,
    Architect,
    Product,
    Implementation,
    Reviewer,
    BuildTest,
    Infra,
    Custom,
}

impl StackRole {
    /// The agent name used in stack config rosters and response payloads.
    pub fn agent_name(&self) -> &'static str {
        match self {
            StackRole::Orchestrator => "OrchestratorAgent",
            StackRole::Architect => "ArchitectAgent",
            StackRole::Product => "ProductAgent",
            StackRole::Implementation => "ImplementationAgent",
            StackRole::Reviewer => "ReviewerAgent",
            StackRole::BuildTest => "BuildTestAgent",
            StackRole::Infra => "InfraAgent",
            StackRole::Custom => "CustomAgent",
        }
    }
}

impl std::fmt::Display for StackRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.agent_name())
    }
}

/// One agent node of a workflow definition.
///
/// Immutable once execution starts; owned by the `WorkflowDefinition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentNode {
    /// Unique id within the workflow.
    pub id: String,
    pub agent_type: AgentType,
    /// Display label shown in transcripts and stream events.
    pub label: String,
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Sampling temperature, 0.0–2.0.
    pub temperature: Option<f64>,
    /// Optional persona override, prepended to the registry persona.
    pub system_prompt: Option<String>,
}

impl AgentNode {
    pub fn new(id: impl Into<String>, agent_type: AgentType) -> Self {
        let id = id.into();
        Self {
            label: format!("Agent {id}"),
            id,
            agent_type,
            provider: None,
            model: None,
            temperature: None,
            system_prompt: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Per-step record of one agent execution within a run.
///
/// Consumed immediately to build the next step's input and the final
/// transcript; not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AgentTurn {
    pub agent_id: String,
    pub agent_label: String,
    pub persona_prompt: String,
    pub input_text: String,
    pub output_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_degrades_to_custom() {
        assert_eq!(AgentType::parse("architect"), AgentType::Architect);
        assert_eq!(AgentType::parse("warlock"), AgentType::Custom);
        assert_eq!(AgentType::parse(""), AgentType::Custom);
    }

    #[test]
    fn type_string_round_trip() {
        for t in [
            AgentType::Orchestrator,
            AgentType::Architect,
            AgentType::Implementation,
            AgentType::Reviewer,
            AgentType::Tester,
            AgentType::Debugger,
            AgentType::Optimizer,
            AgentType::Documenter,
            AgentType::Custom,
        ] {
            assert_eq!(AgentType::parse(t.as_str()), t);
        }
    }

    #[test]
    fn stack_role_remaps() {
        assert_eq!(AgentType::Debugger.stack_role(), StackRole::Implementation);
        assert_eq!(AgentType::Optimizer.stack_role(), StackRole::Reviewer);
        assert_eq!(AgentType::Documenter.stack_role(), StackRole::Product);
    }
}
