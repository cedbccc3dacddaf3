use std::collections::HashSet;

use super::model::GraphDefinition;

/// Hover overlay: the hovered node, its direct neighbours and the edges
/// between them. Independent of execution status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    pub hovered: Option<String>,
    pub nodes: HashSet<String>,
    pub edges: HashSet<String>,
}

impl Lineage {
    pub fn none() -> Self {
        Self::default()
    }

    /// Overlay for `hovered`. An id that is not a node of the graph yields
    /// no overlay.
    pub fn around(graph: &GraphDefinition, hovered: &str) -> Self {
        if !graph.contains_node(hovered) {
            return Self::none();
        }

        let mut nodes = HashSet::from([hovered.to_string()]);
        let mut edges = HashSet::new();
        for edge in graph.valid_edges().filter(|e| e.touches(hovered)) {
            edges.insert(edge.id.clone());
            nodes.insert(edge.source.clone());
            nodes.insert(edge.target.clone());
        }

        Self {
            hovered: Some(hovered.to_string()),
            nodes,
            edges,
        }
    }

    pub fn is_active(&self) -> bool {
        self.hovered.is_some()
    }

    pub fn node_highlighted(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn edge_highlighted(&self, id: &str) -> bool {
        self.edges.contains(id)
    }

    pub fn node_dimmed(&self, id: &str) -> bool {
        self.is_active() && !self.node_highlighted(id)
    }

    pub fn edge_dimmed(&self, id: &str) -> bool {
        self.is_active() && !self.edge_highlighted(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{GraphEdge, GraphNode};
    use crate::agents::AgentKind;

    fn graph() -> GraphDefinition {
        let node = |id: &str| GraphNode { id: id.into(), label: id.into(), kind: AgentKind::System };
        GraphDefinition {
            nodes: vec![node("a"), node("b"), node("c"), node("d")],
            edges: vec![GraphEdge::new("a", "b"), GraphEdge::new("b", "c"), GraphEdge::new("c", "d")],
        }
    }

    #[test]
    fn test_neighbours_highlighted() {
        let lineage = Lineage::around(&graph(), "b");
        assert!(lineage.node_highlighted("a"));
        assert!(lineage.node_highlighted("b"));
        assert!(lineage.node_highlighted("c"));
        assert!(lineage.node_dimmed("d"));
        assert!(lineage.edge_highlighted("a-b"));
        assert!(lineage.edge_dimmed("c-d"));
    }

    #[test]
    fn test_unknown_hover_is_no_overlay() {
        let lineage = Lineage::around(&graph(), "zzz");
        assert!(!lineage.is_active());
        assert!(!lineage.node_dimmed("a"));
    }

    #[test]
    fn test_isolated_node_highlights_only_itself() {
        let mut g = graph();
        g.nodes.push(GraphNode { id: "e".into(), label: "e".into(), kind: AgentKind::System });
        let lineage = Lineage::around(&g, "e");
        assert_eq!(lineage.nodes.len(), 1);
        assert!(lineage.edges.is_empty());
    }
}
