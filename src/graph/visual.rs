use serde::Serialize;
use tracing::debug;

use crate::agents::AgentKind;
use crate::execution::{AgentStatus, ExecutionState};
use super::lineage::Lineage;
use super::model::GraphDefinition;
use super::sanitize::sanitize_id;

pub mod palette {
    pub const IDLE: &str = "#94a3b8";
    pub const EXECUTING: &str = "#00D4FF";
    pub const COMPLETED: &str = "#66BB6A";
    pub const FAILED: &str = "#FF4444";
}

const DIMMED_NODE_OPACITY: f32 = 0.3;
const DIMMED_EDGE_OPACITY: f32 = 0.15;
const RESTING_EDGE_OPACITY: f32 = 0.6;

pub fn status_color(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Idle => palette::IDLE,
        AgentStatus::Executing => palette::EXECUTING,
        AgentStatus::Completed => palette::COMPLETED,
        AgentStatus::Failed => palette::FAILED,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Idle,
    /// Both endpoints executing: drawn as a travelling pulse.
    Active,
    /// Both endpoints completed.
    Completed,
    /// Either endpoint failed and the edge is not active.
    Failed,
}

impl EdgeStatus {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Idle => palette::IDLE,
            Self::Active => palette::EXECUTING,
            Self::Completed => palette::COMPLETED,
            Self::Failed => palette::FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub kind: AgentKind,
    pub status: AgentStatus,
    pub color: &'static str,
    pub animated: bool,
    pub opacity: f32,
    pub highlighted: bool,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub status: EdgeStatus,
    pub color: &'static str,
    pub animated: bool,
    pub stroke_width: u8,
    pub opacity: f32,
    pub packet_count: u8,
    pub highlighted: bool,
    pub dimmed: bool,
}

impl VisualEdge {
    pub fn is_active(&self) -> bool {
        self.status == EdgeStatus::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl VisualGraph {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// Project execution state (and an optional hovered node) onto the graph.
/// Edges with an endpoint outside the graph are skipped.
pub fn map_to_visual(state: &ExecutionState, graph: &GraphDefinition, hover: Option<&str>) -> VisualGraph {
    let lineage = hover
        .map(|id| Lineage::around(graph, &sanitize_id(id)))
        .unwrap_or_default();
    let status = |id: &str| state.status_of(&sanitize_id(id));

    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let node_status = status(&node.id);
            let dimmed = lineage.node_dimmed(&node.id);
            VisualNode {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind,
                status: node_status,
                color: status_color(node_status),
                animated: node_status == AgentStatus::Executing,
                opacity: if dimmed { DIMMED_NODE_OPACITY } else { 1.0 },
                highlighted: lineage.node_highlighted(&node.id),
                dimmed,
            }
        })
        .collect();

    let skipped = graph.edges.len() - graph.valid_edges().count();
    if skipped > 0 {
        debug!(skipped, "Skipping edges with unknown endpoints");
    }

    let edges = graph
        .valid_edges()
        .map(|edge| {
            let source = status(&edge.source);
            let target = status(&edge.target);
            let edge_status = edge_status(source, target);
            let active = edge_status == EdgeStatus::Active;
            let highlighted = lineage.edge_highlighted(&edge.id);
            let dimmed = lineage.edge_dimmed(&edge.id);

            let color = if dimmed {
                palette::IDLE
            } else if highlighted {
                palette::EXECUTING
            } else {
                edge_status.color()
            };
            let opacity = if dimmed {
                DIMMED_EDGE_OPACITY
            } else if highlighted || active {
                1.0
            } else {
                RESTING_EDGE_OPACITY
            };

            VisualEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                status: edge_status,
                color,
                animated: active,
                stroke_width: if active { 3 } else { 2 },
                opacity,
                packet_count: if active { 2 } else { 1 },
                highlighted,
                dimmed,
            }
        })
        .collect();

    VisualGraph { nodes, edges }
}

/// Both-endpoints rule: an edge is active only while both ends execute.
pub fn edge_status(source: AgentStatus, target: AgentStatus) -> EdgeStatus {
    use AgentStatus::*;
    match (source, target) {
        (Executing, Executing) => EdgeStatus::Active,
        (Completed, Completed) => EdgeStatus::Completed,
        (Failed, _) | (_, Failed) => EdgeStatus::Failed,
        _ => EdgeStatus::Idle,
    }
}
