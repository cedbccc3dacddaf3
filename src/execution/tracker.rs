use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

use super::events::ExecutionEvent;
use super::state::{AgentStatus, ExecutionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Completed,
    Failed,
}

/// One entry of the tracker's execution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub agent_id: String,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub message: String,
}

/// Execution state store: the pure [`ExecutionState`] plus the bookkeeping
/// the progress views read (current agent, step log, reset epoch).
#[derive(Debug, Clone, Default)]
pub struct ExecutionTracker {
    state: ExecutionState,
    current_agent: Option<String>,
    steps: Vec<ExecutionStep>,
    epoch: u64,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &ExecutionEvent) {
        if matches!(event, ExecutionEvent::Reset) {
            self.reset();
            return;
        }

        self.state = std::mem::take(&mut self.state).apply(event);
        let now = Utc::now();

        match event {
            ExecutionEvent::AgentStarted { agent_id } => {
                self.current_agent = Some(agent_id.clone());
                self.steps.push(ExecutionStep {
                    agent_id: agent_id.clone(),
                    status: StepStatus::Running,
                    started_at: now,
                    ended_at: None,
                    message: format!("Processing with {}...", agent_id),
                });
            }
            ExecutionEvent::AgentCompleted { agent_id } => {
                self.close_steps(agent_id, StepStatus::Completed, now);
            }
            ExecutionEvent::AgentFailed { agent_id } => {
                self.close_steps(agent_id, StepStatus::Failed, now);
            }
            ExecutionEvent::Reset => unreachable!("handled above"),
        }

        let still_active = self
            .current_agent
            .as_ref()
            .is_some_and(|id| self.state.active.contains(id));
        if !still_active {
            // Most recently started agent that is still running.
            self.current_agent = self
                .steps
                .iter()
                .rev()
                .find(|s| s.status == StepStatus::Running && self.state.active.contains(&s.agent_id))
                .map(|s| s.agent_id.clone());
        }
    }

    fn close_steps(&mut self, agent_id: &str, status: StepStatus, now: DateTime<Utc>) {
        for step in self
            .steps
            .iter_mut()
            .filter(|s| s.agent_id == agent_id && s.status == StepStatus::Running)
        {
            step.status = status;
            step.ended_at = Some(now);
        }
    }

    /// Clear all sets and the log, and start a new epoch.
    pub fn reset(&mut self) {
        self.state = ExecutionState::default();
        self.current_agent = None;
        self.steps.clear();
        self.epoch += 1;
    }

    pub fn snapshot(&self) -> ExecutionState {
        self.state.clone()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn status_of(&self, agent_id: &str) -> AgentStatus {
        self.state.status_of(agent_id)
    }

    pub fn current_agent(&self) -> Option<&str> {
        self.current_agent.as_deref()
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Cloneable handle to a tracker shared between a view and the sequencer
/// task that feeds it.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<RwLock<ExecutionTracker>>,
}

impl SharedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply(&self, event: &ExecutionEvent) {
        self.inner.write().await.apply(event);
    }

    /// Apply `event` only if no reset happened since `epoch` was read.
    /// Returns false when the event was dropped as stale.
    pub async fn apply_in_epoch(&self, epoch: u64, event: &ExecutionEvent) -> bool {
        let mut tracker = self.inner.write().await;
        if tracker.epoch() != epoch {
            debug!(
                event = %event,
                event_epoch = epoch,
                current_epoch = tracker.epoch(),
                "Dropping stale execution event"
            );
            return false;
        }
        tracker.apply(event);
        true
    }

    /// Reset the store and return the new epoch.
    pub async fn reset(&self) -> u64 {
        let mut tracker = self.inner.write().await;
        tracker.reset();
        tracker.epoch()
    }

    pub async fn snapshot(&self) -> ExecutionState {
        self.inner.read().await.snapshot()
    }

    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ExecutionTracker> {
        self.inner.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tracks_start_and_complete() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("refiner"));
        assert_eq!(tracker.current_agent(), Some("refiner"));
        assert_eq!(tracker.steps().len(), 1);
        assert_eq!(tracker.steps()[0].status, StepStatus::Running);
        assert_eq!(tracker.steps()[0].message, "Processing with refiner...");

        tracker.apply(&ExecutionEvent::completed("refiner"));
        assert_eq!(tracker.steps()[0].status, StepStatus::Completed);
        assert!(tracker.steps()[0].ended_at.is_some());
        assert_eq!(tracker.current_agent(), None);
    }

    #[test]
    fn test_current_agent_kept_while_others_active() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("a"));
        tracker.apply(&ExecutionEvent::started("b"));
        tracker.apply(&ExecutionEvent::completed("a"));
        assert_eq!(tracker.current_agent(), Some("b"));
    }

    #[test]
    fn test_current_agent_falls_back_to_latest_active() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("a"));
        tracker.apply(&ExecutionEvent::started("b"));
        tracker.apply(&ExecutionEvent::completed("b"));
        assert_eq!(tracker.current_agent(), Some("a"));
        tracker.apply(&ExecutionEvent::failed("a"));
        assert_eq!(tracker.current_agent(), None);
    }

    #[test]
    fn test_failure_closes_running_step() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("sandbox"));
        tracker.apply(&ExecutionEvent::failed("sandbox"));
        assert_eq!(tracker.steps()[0].status, StepStatus::Failed);
        assert_eq!(tracker.status_of("sandbox"), AgentStatus::Failed);
    }

    #[test]
    fn test_reset_event_bumps_epoch() {
        let mut tracker = ExecutionTracker::new();
        tracker.apply(&ExecutionEvent::started("a"));
        tracker.apply(&ExecutionEvent::Reset);
        assert_eq!(tracker.epoch(), 1);
        assert!(tracker.steps().is_empty());
        assert!(tracker.state().is_empty());
    }

    #[tokio::test]
    async fn test_stale_epoch_is_dropped() {
        let shared = SharedTracker::new();
        let epoch = shared.epoch().await;
        assert!(shared.apply_in_epoch(epoch, &ExecutionEvent::started("a")).await);

        let new_epoch = shared.reset().await;
        assert_ne!(epoch, new_epoch);
        assert!(!shared.apply_in_epoch(epoch, &ExecutionEvent::completed("a")).await);
        assert!(shared.snapshot().await.is_empty());
    }
}
