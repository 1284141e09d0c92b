//! Workflow YAML import/export.
//!
//! Document shape:
//!
//! ```yaml
//! version: "1.0"
//! elastic_swarm:
//!   global:
//!     default_provider: anthropic
//!     default_model: claude-3-5-sonnet-20241022
//!     temperature: 0.7
//!     max_tokens: 4096
//!   agents:
//!     "1": { type: architect, label: Architect, provider: anthropic,
//!            model: claude-3-5-sonnet-20241022, temperature: 0.7,
//!            system_prompt: "" }
//!   connections:
//!     - { from: "1", to: "2" }
//! ```
//!
//! Agent order follows node definition order on export and document order on
//! import, so export → import → export is byte-stable.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{AgentNode, AgentType, Edge, GlobalSettings, WorkflowDefinition};

/// Format version written on export.
pub const FORMAT_VERSION: &str = "1.0";

const SWARM_KEY: &str = "elastic_swarm";

/// Per-agent entry of the YAML `agents` mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgentSpec {
    #[serde(rename = "type")]
    agent_type: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConnectionSpec {
    from: String,
    to: String,
}

/// Export a workflow definition to its YAML document form.
pub fn to_yaml(workflow: &WorkflowDefinition) -> SwarmResult<String> {
    let mut agents = Mapping::new();
    for node in &workflow.nodes {
        let spec = AgentSpec {
            agent_type: node.agent_type.as_str().to_string(),
            label: node.label.clone(),
            provider: node.provider.clone(),
            model: node.model.clone(),
            temperature: node.temperature,
            system_prompt: node.system_prompt.clone(),
        };
        agents.insert(
            Value::String(node.id.clone()),
            serde_yaml::to_value(spec)?,
        );
    }

    let connections: Vec<ConnectionSpec> = workflow
        .edges
        .iter()
        .map(|e| ConnectionSpec {
            from: e.from.clone(),
            to: e.to.clone(),
        })
        .collect();

    let mut swarm = Mapping::new();
    swarm.insert(
        Value::String("global".into()),
        serde_yaml::to_value(&workflow.global)?,
    );
    swarm.insert(Value::String("agents".into()), Value::Mapping(agents));
    swarm.insert(
        Value::String("connections".into()),
        serde_yaml::to_value(connections)?,
    );

    let mut doc = Mapping::new();
    doc.insert(
        Value::String("version".into()),
        Value::String(FORMAT_VERSION.into()),
    );
    doc.insert(Value::String(SWARM_KEY.into()), Value::Mapping(swarm));

    Ok(serde_yaml::to_string(&Value::Mapping(doc))?)
}

/// Import a workflow definition from its YAML document form.
///
/// `id` and `name` identify the resulting definition; the document itself
/// carries neither. Unknown agent types degrade to `custom`, matching the
/// registry's fallback behavior.
pub fn from_yaml(yaml: &str, id: &str, name: &str) -> SwarmResult<WorkflowDefinition> {
    let doc: Value = serde_yaml::from_str(yaml)?;

    let swarm = doc
        .get(SWARM_KEY)
        .ok_or_else(|| SwarmError::InvalidYaml(format!("missing top-level '{SWARM_KEY}' key")))?;

    let global: GlobalSettings = match swarm.get("global") {
        Some(value) => serde_yaml::from_value(value.clone())?,
        None => GlobalSettings::default(),
    };

    let mut workflow = WorkflowDefinition::new(id, name);
    workflow.global = global;

    if let Some(Value::Mapping(agents)) = swarm.get("agents") {
        for (key, value) in agents {
            let agent_id = scalar_to_string(key).ok_or_else(|| {
                SwarmError::InvalidYaml("agent ids must be scalar values".to_string())
            })?;
            let spec: AgentSpec = serde_yaml::from_value(value.clone())?;

            let mut node = AgentNode::new(agent_id.clone(), AgentType::parse(&spec.agent_type));
            node.label = if spec.label.is_empty() {
                format!("Agent {agent_id}")
            } else {
                spec.label
            };
            node.provider = spec.provider;
            node.model = spec.model;
            node.temperature = spec.temperature;
            node.system_prompt = spec.system_prompt.filter(|p| !p.is_empty());
            workflow.nodes.push(node);
        }
    }

    if let Some(connections) = swarm.get("connections") {
        let specs: Vec<ConnectionSpec> = serde_yaml::from_value(connections.clone())?;
        workflow.edges = specs
            .into_iter()
            .map(|c| Edge::new(c.from, c.to))
            .collect();
    }

    workflow.validate()?;
    Ok(workflow)
}

/// YAML allows bare numeric keys for agent ids; normalize them to strings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workflow() -> WorkflowDefinition {
        let mut wf = WorkflowDefinition::new("wf-1", "Full-Stack Builder");
        wf.nodes.push(
            AgentNode::new("1", AgentType::Orchestrator)
                .with_label("Orchestrator")
                .with_model("claude-3-5-sonnet-20241022"),
        );
        wf.nodes.push(
            AgentNode::new("2", AgentType::Architect)
                .with_label("Architect")
                .with_model("claude-3-5-sonnet-20241022"),
        );
        wf.nodes.push(
            AgentNode::new("3", AgentType::Implementation)
                .with_label("Coder")
                .with_model("gpt-4o"),
        );
        wf.edges.push(Edge::new("1", "2"));
        wf.edges.push(Edge::new("1", "3"));
        wf
    }

    #[test]
    fn round_trip_preserves_nodes_and_edges() {
        let wf = sample_workflow();
        let yaml = to_yaml(&wf).unwrap();
        let imported = from_yaml(&yaml, "wf-1", "Full-Stack Builder").unwrap();

        assert_eq!(imported.nodes, wf.nodes);
        assert_eq!(imported.edges, wf.edges);
        assert_eq!(imported.global, wf.global);
    }

    #[test]
    fn export_is_deterministic() {
        let wf = sample_workflow();
        let first = to_yaml(&wf).unwrap();
        let second = to_yaml(&from_yaml(&first, "wf-1", "x").unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn numeric_agent_ids_are_normalized() {
        let yaml = "\
version: \"1.0\"
elastic_swarm:
  agents:
    1:
      type: implementation
      label: Coder
  connections: []
";
        let wf = from_yaml(yaml, "wf", "numeric").unwrap();
        assert_eq!(wf.nodes[0].id, "1");
    }

    #[test]
    fn unknown_agent_type_degrades_to_custom() {
        let yaml = "\
version: \"1.0\"
elastic_swarm:
  agents:
    a:
      type: wizard
  connections: []
";
        let wf = from_yaml(yaml, "wf", "odd").unwrap();
        assert_eq!(wf.nodes[0].agent_type, AgentType::Custom);
    }

    #[test]
    fn missing_swarm_key_rejected() {
        let err = from_yaml("version: \"1.0\"\n", "wf", "bad").unwrap_err();
        assert!(matches!(err, SwarmError::InvalidYaml(_)));
    }

    #[test]
    fn dangling_connection_rejected() {
        let yaml = "\
version: \"1.0\"
elastic_swarm:
  agents:
    a:
      type: implementation
  connections:
    - from: a
      to: ghost
";
        assert!(matches!(
            from_yaml(yaml, "wf", "bad"),
            Err(SwarmError::UnknownEdgeEndpoint { .. })
        ));
    }
}
