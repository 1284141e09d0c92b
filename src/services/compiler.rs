//! Workflow graph compiler: directed graph validation and deterministic
//! topological ordering via Kahn's algorithm.

use std::collections::HashMap;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::{ExecutionPlan, WorkflowDefinition};

/// Compiles a workflow definition into a linear execution plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCompiler;

impl WorkflowCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile the workflow's node/edge set into one valid topological order.
    ///
    /// Determinism: ties are broken by node definition order. The ready
    /// queue is seeded in definition order and consumed FIFO, so two
    /// compilations of the same definition always yield the same plan.
    ///
    /// Fails with [`SwarmError::CycleDetected`] when the graph contains a
    /// cycle; a short plan is never returned silently.
    pub fn compile(&self, workflow: &WorkflowDefinition) -> SwarmResult<ExecutionPlan> {
        workflow.validate()?;

        let node_ids: Vec<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();

        let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut in_degree: HashMap<&str, usize> =
            node_ids.iter().map(|&id| (id, 0)).collect();

        for edge in &workflow.edges {
            successors
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
            // Endpoints are known to exist after validate().
            if let Some(degree) = in_degree.get_mut(edge.to.as_str()) {
                *degree += 1;
            }
        }

        // Seed with zero-in-degree nodes in definition order.
        let mut queue: std::collections::VecDeque<&str> = node_ids
            .iter()
            .filter(|&&id| in_degree[id] == 0)
            .copied()
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(node_ids.len());

        while let Some(node) = queue.pop_front() {
            order.push(node.to_string());
            if let Some(next) = successors.get(node) {
                for &succ in next {
                    if let Some(degree) = in_degree.get_mut(succ) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            queue.push_back(succ);
                        }
                    }
                }
            }
        }

        if order.len() < node_ids.len() {
            let unreached: Vec<String> = node_ids
                .iter()
                .filter(|&&id| !order.iter().any(|o| o == id))
                .map(|&id| id.to_string())
                .collect();
            return Err(SwarmError::CycleDetected { unreached });
        }

        Ok(ExecutionPlan::new(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AgentNode, AgentType, Edge};

    fn workflow(nodes: &[&str], edges: &[(&str, &str)]) -> WorkflowDefinition {
        let mut wf = WorkflowDefinition::new("wf", "test");
        for &id in nodes {
            wf.nodes.push(AgentNode::new(id, AgentType::Implementation));
        }
        for &(from, to) in edges {
            wf.edges.push(Edge::new(from, to));
        }
        wf
    }

    #[test]
    fn linear_chain_preserves_order() {
        let wf = workflow(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let plan = WorkflowCompiler::new().compile(&wf).unwrap();
        assert_eq!(plan.order(), ["a", "b", "c"]);
    }

    #[test]
    fn diamond_starts_and_ends_correctly() {
        // 1 -> {2, 3} -> 4
        let wf = workflow(
            &["1", "2", "3", "4"],
            &[("1", "2"), ("1", "3"), ("2", "4"), ("3", "4")],
        );
        let plan = WorkflowCompiler::new().compile(&wf).unwrap();
        assert_eq!(plan.order().first().map(String::as_str), Some("1"));
        assert_eq!(plan.order().last().map(String::as_str), Some("4"));
        assert!(plan.position("2").unwrap() < plan.position("4").unwrap());
        assert!(plan.position("3").unwrap() < plan.position("4").unwrap());
    }

    #[test]
    fn ties_follow_definition_order() {
        // No edges at all: plan is exactly definition order.
        let wf = workflow(&["z", "a", "m"], &[]);
        let plan = WorkflowCompiler::new().compile(&wf).unwrap();
        assert_eq!(plan.order(), ["z", "a", "m"]);
    }

    #[test]
    fn cycle_is_rejected_not_truncated() {
        let wf = workflow(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        );
        let err = WorkflowCompiler::new().compile(&wf).unwrap_err();
        match err {
            SwarmError::CycleDetected { unreached } => {
                assert_eq!(unreached.len(), 3);
            }
            other => panic!("expected CycleDetected, got {other}"),
        }
    }

    #[test]
    fn partial_cycle_reports_only_cyclic_nodes() {
        // a runs; b <-> c never become ready.
        let wf = workflow(&["a", "b", "c"], &[("b", "c"), ("c", "b")]);
        let err = WorkflowCompiler::new().compile(&wf).unwrap_err();
        match err {
            SwarmError::CycleDetected { unreached } => {
                assert_eq!(unreached, vec!["b".to_string(), "c".to_string()]);
            }
            other => panic!("expected CycleDetected, got {other}"),
        }
    }

    #[test]
    fn dangling_edge_rejected_before_sorting() {
        let wf = workflow(&["a"], &[("a", "ghost")]);
        assert!(matches!(
            WorkflowCompiler::new().compile(&wf),
            Err(SwarmError::UnknownEdgeEndpoint { .. })
        ));
    }

    #[test]
    fn empty_workflow_rejected() {
        let wf = workflow(&[], &[]);
        assert!(matches!(
            WorkflowCompiler::new().compile(&wf),
            Err(SwarmError::EmptyWorkflow)
        ));
    }

    #[test]
    fn plan_contains_each_node_once() {
        let wf = workflow(
            &["1", "2", "3", "4", "5"],
            &[("1", "3"), ("2", "3"), ("3", "4"), ("3", "5")],
        );
        let plan = WorkflowCompiler::new().compile(&wf).unwrap();
        assert_eq!(plan.len(), 5);
        let mut sorted: Vec<&str> = plan.order().iter().map(String::as_str).collect();
        sorted.sort_unstable();
        assert_eq!(sorted, ["1", "2", "3", "4", "5"]);
    }
}
