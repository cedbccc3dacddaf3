use serde::{Deserialize, Serialize};

use crate::agents::AgentDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingStatus {
    Pending,
    Active,
    Completed,
}

/// Display record paired 1:1 with an agent of a playback plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingStep {
    pub id: String,
    pub label: String,
    pub detail: Option<String>,
    pub status: ThinkingStatus,
    pub duration_ms: Option<u64>,
}

impl ThinkingStep {
    pub fn pending(agent: &AgentDescriptor) -> Self {
        Self {
            id: agent.id.clone(),
            label: agent.display_name().to_string(),
            detail: None,
            status: ThinkingStatus::Pending,
            duration_ms: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ThinkingStatus::Completed
    }
}

/// Agents to play back together with the thinking steps they drive.
#[derive(Debug, Clone, Default)]
pub struct PlaybackPlan {
    pub agents: Vec<AgentDescriptor>,
    pub steps: Vec<ThinkingStep>,
}

impl PlaybackPlan {
    pub fn from_agents(agents: Vec<AgentDescriptor>) -> Self {
        let steps = agents.iter().map(ThinkingStep::pending).collect();
        Self { agents, steps }
    }

    /// Attach progress text to the step of `agent_id`, if present.
    pub fn with_detail(mut self, agent_id: &str, detail: impl Into<String>) -> Self {
        if let Some(step) = self.steps.iter_mut().find(|s| s.id == agent_id) {
            step.detail = Some(detail.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
