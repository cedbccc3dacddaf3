pub mod events;
pub mod state;
pub mod tracker;

pub use events::ExecutionEvent;
pub use state::{AgentStatus, ExecutionState};
pub use tracker::{ExecutionStep, ExecutionTracker, SharedTracker, StepStatus};
