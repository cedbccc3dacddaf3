pub mod lineage;
pub mod model;
pub mod sanitize;
pub mod visual;

pub use lineage::Lineage;
pub use model::{GraphDefinition, GraphEdge, GraphNode};
pub use sanitize::{deserialize_id, display_label, sanitize_id};
pub use visual::{map_to_visual, EdgeStatus, VisualEdge, VisualGraph, VisualNode};
