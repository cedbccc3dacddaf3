use serde::{Deserialize, Serialize};

/// A single transition applied to the execution state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionEvent {
    AgentStarted { agent_id: String },
    AgentCompleted { agent_id: String },
    AgentFailed { agent_id: String },
    Reset,
}

impl ExecutionEvent {
    pub fn started(agent_id: impl Into<String>) -> Self {
        Self::AgentStarted { agent_id: agent_id.into() }
    }

    pub fn completed(agent_id: impl Into<String>) -> Self {
        Self::AgentCompleted { agent_id: agent_id.into() }
    }

    pub fn failed(agent_id: impl Into<String>) -> Self {
        Self::AgentFailed { agent_id: agent_id.into() }
    }

    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Self::AgentStarted { agent_id }
            | Self::AgentCompleted { agent_id }
            | Self::AgentFailed { agent_id } => Some(agent_id),
            Self::Reset => None,
        }
    }
}

impl std::fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgentStarted { agent_id } => write!(f, "agent_start({})", agent_id),
            Self::AgentCompleted { agent_id } => write!(f, "agent_complete({})", agent_id),
            Self::AgentFailed { agent_id } => write!(f, "agent_failed({})", agent_id),
            Self::Reset => write!(f, "reset"),
        }
    }
}
