//! Workflow graph domain models.
//!
//! A workflow is a named, directed graph of agent nodes. Compilation into an
//! [`ExecutionPlan`] lives in `services::compiler`; this module holds the
//! aggregate and its structural validation.

use serde::{Deserialize, Serialize};

use super::agent::AgentNode;
use crate::domain::errors::{SwarmError, SwarmResult};

/// A directed connection: output of `from` feeds input of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Workflow-wide generation defaults, applied when a node leaves a field
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GlobalSettings {
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> u32 {
    4096
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A named, versioned aggregate of agent nodes and directed edges.
///
/// Node order is meaningful: it breaks ties deterministically during
/// topological sorting and fixes the export order of the YAML form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    pub nodes: Vec<AgentNode>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub global: GlobalSettings,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            global: GlobalSettings::default(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&AgentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Structural validation: at least one node, unique node ids, every edge
    /// endpoint present in the node set. Cycle detection is the compiler's
    /// job.
    pub fn validate(&self) -> SwarmResult<()> {
        if self.nodes.is_empty() {
            return Err(SwarmError::EmptyWorkflow);
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(SwarmError::DuplicateNodeId(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(SwarmError::UnknownEdgeEndpoint {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// One valid topological order of a workflow graph.
///
/// Derived, ephemeral: recomputed per execution, owned by a single
/// orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<String>,
}

impl ExecutionPlan {
    pub(crate) fn new(order: Vec<String>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a node in the plan, if present.
    pub fn position(&self, node_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == node_id)
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::agent::AgentType;

    fn two_node_workflow() -> WorkflowDefinition {
        let mut wf = WorkflowDefinition::new("wf-1", "Test");
        wf.nodes.push(AgentNode::new("1", AgentType::Architect));
        wf.nodes.push(AgentNode::new("2", AgentType::Implementation));
        wf.edges.push(Edge::new("1", "2"));
        wf
    }

    #[test]
    fn valid_workflow_passes() {
        assert!(two_node_workflow().validate().is_ok());
    }

    #[test]
    fn empty_workflow_rejected() {
        let wf = WorkflowDefinition::new("wf-1", "Empty");
        assert!(matches!(wf.validate(), Err(SwarmError::EmptyWorkflow)));
    }

    #[test]
    fn duplicate_node_id_rejected() {
        let mut wf = two_node_workflow();
        wf.nodes.push(AgentNode::new("1", AgentType::Reviewer));
        assert!(matches!(
            wf.validate(),
            Err(SwarmError::DuplicateNodeId(id)) if id == "1"
        ));
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut wf = two_node_workflow();
        wf.edges.push(Edge::new("2", "ghost"));
        assert!(matches!(
            wf.validate(),
            Err(SwarmError::UnknownEdgeEndpoint { missing, .. }) if missing == "ghost"
        ));
    }
}
