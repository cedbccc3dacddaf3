pub mod descriptor;
pub mod registry;

pub use descriptor::{AgentDescriptor, AgentKind};
pub use registry::{PipelineAgent, DEFAULT_PIPELINE};
