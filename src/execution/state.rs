use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::events::ExecutionEvent;

/// Display status of a single agent, derived from [`ExecutionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Executing,
    Completed,
    Failed,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three disjoint agent sets plus the "anything running" flag.
///
/// Every mutation goes through [`ExecutionState::apply`], which keeps two
/// invariants: an agent id is in at most one set, and `is_executing` is true
/// exactly when `active` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub is_executing: bool,
    pub active: BTreeSet<String>,
    pub completed: BTreeSet<String>,
    pub failed: BTreeSet<String>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition function. Unknown agent ids are accepted as-is.
    pub fn apply(mut self, event: &ExecutionEvent) -> Self {
        match event {
            ExecutionEvent::AgentStarted { agent_id } => {
                self.completed.remove(agent_id);
                self.failed.remove(agent_id);
                self.active.insert(agent_id.clone());
            }
            ExecutionEvent::AgentCompleted { agent_id } => {
                self.active.remove(agent_id);
                self.failed.remove(agent_id);
                self.completed.insert(agent_id.clone());
            }
            ExecutionEvent::AgentFailed { agent_id } => {
                self.active.remove(agent_id);
                self.completed.remove(agent_id);
                self.failed.insert(agent_id.clone());
            }
            ExecutionEvent::Reset => return Self::default(),
        }
        self.is_executing = !self.active.is_empty();
        self
    }

    /// Status lookup in the order active, completed, failed.
    pub fn status_of(&self, agent_id: &str) -> AgentStatus {
        if self.active.contains(agent_id) {
            AgentStatus::Executing
        } else if self.completed.contains(agent_id) {
            AgentStatus::Completed
        } else if self.failed.contains(agent_id) {
            AgentStatus::Failed
        } else {
            AgentStatus::Idle
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty() && self.failed.is_empty()
    }
}
