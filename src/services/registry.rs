//! Agent registry: static persona prompts, display names, and the agent-type
//! catalog.
//!
//! Pure lookup with no failure modes: unknown or custom types degrade to the
//! generic assistant persona so malformed workflow imports stay executable.

use crate::domain::models::{AgentType, StackRole};

/// Fallback persona for custom and unknown agents.
pub const GENERIC_PERSONA: &str = "You are a helpful AI assistant.";

/// Persona prompt for a stack roster role.
pub fn persona_prompt(role: StackRole) -> &'static str {
    match role {
        StackRole::Orchestrator => {
            "You are an orchestrator. Coordinate the work of specialized agents, \
             break the request into clear sub-goals, and summarize the overall plan."
        }
        StackRole::Architect => {
            "You are an expert software architect. Design systems with scalability, \
             maintainability, and best practices in mind."
        }
        StackRole::Product => {
            "You are a product manager. Define clear requirements, user stories, \
             and acceptance criteria."
        }
        StackRole::Implementation => {
            "You are an expert software developer. Write clean, efficient, and \
             well-documented code."
        }
        StackRole::Reviewer => {
            "You are a code reviewer. Check for bugs, security issues, and \
             adherence to best practices."
        }
        StackRole::BuildTest => {
            "You are a build and test engineer. Ensure code is tested and builds \
             successfully."
        }
        StackRole::Infra => {
            "You are a DevOps engineer. Design robust infrastructure and \
             deployment pipelines."
        }
        StackRole::Custom => GENERIC_PERSONA,
    }
}

/// Display name for a stack roster role.
pub fn display_name(role: StackRole) -> &'static str {
    match role {
        StackRole::Orchestrator => "Orchestrator",
        StackRole::Architect => "Architect",
        StackRole::Product => "Product",
        StackRole::Implementation => "Implementation",
        StackRole::Reviewer => "Reviewer",
        StackRole::BuildTest => "Build & Test",
        StackRole::Infra => "Infrastructure",
        StackRole::Custom => "Custom Agent",
    }
}

/// One entry of the agent-type catalog served to clients.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct AgentTypeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The catalog of workflow agent types.
pub const AGENT_TYPE_CATALOG: &[AgentTypeInfo] = &[
    AgentTypeInfo {
        id: "orchestrator",
        name: "Orchestrator",
        description: "Coordinates other agents",
    },
    AgentTypeInfo {
        id: "architect",
        name: "Architect",
        description: "System design and architecture",
    },
    AgentTypeInfo {
        id: "implementation",
        name: "Implementation",
        description: "Writes code",
    },
    AgentTypeInfo {
        id: "reviewer",
        name: "Reviewer",
        description: "Code review and quality",
    },
    AgentTypeInfo {
        id: "tester",
        name: "Tester",
        description: "Testing and validation",
    },
    AgentTypeInfo {
        id: "debugger",
        name: "Debugger",
        description: "Bug fixing and debugging",
    },
    AgentTypeInfo {
        id: "optimizer",
        name: "Optimizer",
        description: "Performance optimization",
    },
    AgentTypeInfo {
        id: "documenter",
        name: "Documenter",
        description: "Documentation generation",
    },
    AgentTypeInfo {
        id: "custom",
        name: "Custom Agent",
        description: "User-defined agent",
    },
];

/// Persona prompt for a workflow agent type, via its roster role.
pub fn persona_for_type(agent_type: AgentType) -> &'static str {
    persona_prompt(agent_type.stack_role())
}
