use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::agents::{AgentDescriptor, AgentKind};
use crate::fixtures::{EdgeSpec, WorkflowScript};
use super::sanitize::sanitize_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: AgentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Static node/edge structure the visual mapper projects state onto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDefinition {
    /// One node per agent. Declared edges are used as-is; a workflow
    /// without edges is drawn as a chain in agent order.
    pub fn from_workflow(script: &WorkflowScript) -> Self {
        Self::from_agents(&script.agents, &script.edges)
    }

    pub fn from_agents(agents: &[AgentDescriptor], declared: &[EdgeSpec]) -> Self {
        let nodes = agents
            .iter()
            .map(|a| GraphNode {
                id: sanitize_id(&a.id),
                label: a.display_name().to_string(),
                kind: a.kind,
            })
            .collect();

        let edges = if declared.is_empty() {
            agents
                .windows(2)
                .map(|pair| GraphEdge::new(&sanitize_id(&pair[0].id), &sanitize_id(&pair[1].id)))
                .collect()
        } else {
            declared
                .iter()
                .map(|e| GraphEdge::new(&sanitize_id(&e.source), &sanitize_id(&e.target)))
                .collect()
        };

        Self { nodes, edges }
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Edges whose endpoints are both nodes of this graph.
    pub fn valid_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        let ids = self.node_ids();
        self.edges
            .iter()
            .filter(move |e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(edges: Vec<EdgeSpec>) -> WorkflowScript {
        WorkflowScript {
            agents: vec![
                AgentDescriptor::new("a", "A", AgentKind::System, 1.0),
                AgentDescriptor::new("b", "B", AgentKind::Retrieval, 1.0),
                AgentDescriptor::new("c", "C", AgentKind::Generation, 1.0),
            ],
            edges,
            ..WorkflowScript::default()
        }
    }

    #[test]
    fn test_chain_when_no_edges_declared() {
        let graph = GraphDefinition::from_workflow(&script(vec![]));
        let pairs: Vec<(&str, &str)> = graph.edges.iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c")]);
        assert_eq!(graph.edges[0].id, "a-b");
    }

    #[test]
    fn test_declared_edges_used() {
        let graph = GraphDefinition::from_workflow(&script(vec![EdgeSpec::new("a", "c")]));
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].target, "c");
        assert_eq!(graph.nodes[1].kind, AgentKind::Retrieval);
    }

    #[test]
    fn test_hand_built_ids_canonicalized() {
        let mut agent = AgentDescriptor::new("x", "", AgentKind::System, 1.0);
        agent.id = "SQL Generator".into();
        let edge = EdgeSpec { source: "SQL Generator".into(), target: "x".into() };
        let graph = GraphDefinition::from_agents(&[agent], &[edge]);
        assert_eq!(graph.nodes[0].id, "SQL_Generator");
        assert_eq!(graph.edges[0].id, "SQL_Generator-x");
    }

    #[test]
    fn test_valid_edges_skip_dangling() {
        let graph = GraphDefinition::from_workflow(&script(vec![EdgeSpec::new("a", "b"), EdgeSpec::new("a", "ghost")]));
        assert_eq!(graph.valid_edges().count(), 1);
    }
}
