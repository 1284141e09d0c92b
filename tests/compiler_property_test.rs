//! Property tests for the workflow compiler.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use redstone::domain::models::{AgentNode, AgentType, Edge, WorkflowDefinition};
use redstone::services::WorkflowCompiler;
use redstone::SwarmError;

/// Build a workflow with `size` nodes and forward-only edges derived from
/// the raw pairs (guaranteeing acyclicity).
fn forward_workflow(size: usize, raw_edges: &[(usize, usize)]) -> WorkflowDefinition {
    let mut workflow = WorkflowDefinition::new("wf-prop", "Property");
    workflow.nodes = (0..size)
        .map(|i| AgentNode::new(format!("n{i}"), AgentType::Custom))
        .collect();

    let mut seen = std::collections::HashSet::new();
    for &(a, b) in raw_edges {
        let (from, to) = (a % size, b % size);
        if from < to && seen.insert((from, to)) {
            workflow
                .edges
                .push(Edge::new(format!("n{from}"), format!("n{to}")));
        }
    }
    workflow
}

proptest! {
    /// Property: every acyclic graph compiles, the plan contains each node
    /// exactly once, and every edge's source precedes its target.
    #[test]
    fn prop_plan_is_a_valid_topological_order(
        size in 1usize..20,
        raw_edges in proptest::collection::vec((any::<usize>(), any::<usize>()), 0..40)
    ) {
        let workflow = forward_workflow(size, &raw_edges);
        let plan = WorkflowCompiler::new()
            .compile(&workflow)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(plan.len(), size);

        let positions: std::collections::HashMap<&str, usize> = plan
            .order()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        prop_assert_eq!(positions.len(), size);

        for edge in &workflow.edges {
            prop_assert!(positions[edge.from.as_str()] < positions[edge.to.as_str()]);
        }
    }

    /// Property: compilation is deterministic.
    #[test]
    fn prop_compilation_is_deterministic(
        size in 1usize..20,
        raw_edges in proptest::collection::vec((any::<usize>(), any::<usize>()), 0..40)
    ) {
        let workflow = forward_workflow(size, &raw_edges);
        let compiler = WorkflowCompiler::new();
        let first = compiler
            .compile(&workflow)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = compiler
            .compile(&workflow)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first.order(), second.order());
    }

    /// Property: with no edges, the plan follows node definition order.
    #[test]
    fn prop_edgeless_plan_follows_definition_order(size in 1usize..20) {
        let workflow = forward_workflow(size, &[]);
        let plan = WorkflowCompiler::new()
            .compile(&workflow)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let expected: Vec<String> = (0..size).map(|i| format!("n{i}")).collect();
        prop_assert_eq!(plan.order(), &expected[..]);
    }

    /// Property: appending a back edge to any chain of length >= 2 produces
    /// a cycle error naming the trapped nodes.
    #[test]
    fn prop_back_edge_is_detected_as_cycle(size in 2usize..20) {
        let mut workflow = forward_workflow(size, &[]);
        for i in 0..size - 1 {
            workflow.edges.push(Edge::new(format!("n{i}"), format!("n{}", i + 1)));
        }
        workflow.edges.push(Edge::new(format!("n{}", size - 1), "n0"));

        let err = WorkflowCompiler::new().compile(&workflow).unwrap_err();
        match err {
            SwarmError::CycleDetected { unreached } => {
                prop_assert_eq!(unreached.len(), size);
            }
            other => return Err(TestCaseError::fail(format!("expected cycle, got {other}"))),
        }
    }
}
