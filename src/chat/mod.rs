pub mod chart;
pub mod engine;
pub mod session;
pub mod trace;

pub use chart::select_chart;
pub use engine::{AgentReply, ChatEngine};
pub use session::{session_title, ChatMessage, ChatSession};
pub use trace::pipeline_for;
