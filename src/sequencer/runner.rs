use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::NablonError;
use super::events::PlaybackEvent;
use super::sink::EventSink;
use super::thinking::{PlaybackPlan, ThinkingStatus, ThinkingStep};
use super::timeline::{CueKind, SequencerSettings, Timeline};

/// How a playback run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceOutcome {
    Completed { steps: Vec<ThinkingStep>, total_ms: u64 },
    Cancelled { steps: Vec<ThinkingStep> },
}

impl SequenceOutcome {
    pub fn steps(&self) -> &[ThinkingStep] {
        match self {
            Self::Completed { steps, .. } | Self::Cancelled { steps } => steps,
        }
    }

    pub fn into_steps(self) -> Vec<ThinkingStep> {
        match self {
            Self::Completed { steps, .. } | Self::Cancelled { steps } => steps,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Plays an ordered agent list against a duration floor, emitting
/// start/complete events into a sink.
#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    settings: SequencerSettings,
    parent_token: Option<CancellationToken>,
    event_tx: Option<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl StepSequencer {
    pub fn new(settings: SequencerSettings) -> Self {
        Self {
            settings,
            parent_token: None,
            event_tx: None,
        }
    }

    /// Runs started by this sequencer are cancelled when `token` is.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.parent_token = Some(token);
        self
    }

    /// Attach a channel for streaming playback progress to a display.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    /// Spawn a playback run. The sink's epoch is captured before this
    /// returns, so a reset issued afterwards invalidates the run.
    pub async fn start<S: EventSink>(&self, plan: PlaybackPlan, sink: S) -> SequenceHandle {
        let run_id = Uuid::new_v4();
        let token = match &self.parent_token {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let epoch = sink.epoch().await;
        let timeline = Timeline::plan(&plan.agents, &self.settings);

        info!(
            run_id = %run_id,
            agents = plan.len(),
            total_ms = timeline.total.as_millis() as u64,
            per_step_ms = timeline.per_step.as_millis() as u64,
            "Starting playback"
        );

        let run = PlaybackRun {
            run_id,
            plan,
            timeline,
            epoch,
            token: token.clone(),
            event_tx: self.event_tx.clone(),
        };
        let task = tokio::spawn(run.play(sink));

        SequenceHandle {
            run_id,
            token,
            task: Some(task),
        }
    }

    /// Start a run and wait for it to finish.
    pub async fn run<S: EventSink>(&self, plan: PlaybackPlan, sink: S) -> Result<SequenceOutcome, NablonError> {
        self.start(plan, sink).await.join().await
    }
}

/// Owner's handle on a running playback. Dropping it cancels the run.
#[derive(Debug)]
pub struct SequenceHandle {
    run_id: Uuid,
    token: CancellationToken,
    task: Option<JoinHandle<SequenceOutcome>>,
}

impl SequenceHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub async fn join(mut self) -> Result<SequenceOutcome, NablonError> {
        let task = self
            .task
            .take()
            .ok_or_else(|| NablonError::Internal("Playback task already joined".into()))?;
        task.await
            .map_err(|e| NablonError::Internal(format!("Playback task failed: {}", e)))
    }
}

impl Drop for SequenceHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

struct PlaybackRun {
    run_id: Uuid,
    plan: PlaybackPlan,
    timeline: Timeline,
    epoch: u64,
    token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl PlaybackRun {
    fn emit(&self, event: PlaybackEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    async fn play<S: EventSink>(mut self, sink: S) -> SequenceOutcome {
        let started = Instant::now();
        let mut step_started: Vec<Option<Instant>> = vec![None; self.plan.len()];

        self.emit(PlaybackEvent::RunStarted {
            run_id: self.run_id,
            agent_count: self.plan.len(),
            total_ms: self.timeline.total.as_millis() as u64,
            per_step_ms: self.timeline.per_step.as_millis() as u64,
        });

        let cues = std::mem::take(&mut self.timeline.cues);
        for cue in cues {
            let interrupted = tokio::select! {
                biased;
                _ = self.token.cancelled() => true,
                _ = sleep_until(started + cue.offset) => false,
            };
            if interrupted || self.token.is_cancelled() {
                return self.cancelled();
            }

            let event = cue.event_for(&self.plan.agents);
            debug!(run_id = %self.run_id, event = %event, offset_ms = cue.offset.as_millis() as u64, "Cue fired");
            if !sink.deliver(self.epoch, event).await {
                warn!(run_id = %self.run_id, "Sink rejected event, store was reset; stopping playback");
                self.token.cancel();
                return self.cancelled();
            }

            let index = cue.index;
            match cue.kind {
                CueKind::Start => {
                    step_started[index] = Some(Instant::now());
                    let step = &mut self.plan.steps[index];
                    step.status = ThinkingStatus::Active;
                    info!(run_id = %self.run_id, agent = %step.id, "Agent started");
                    let step = step.clone();
                    self.emit(PlaybackEvent::StepStarted { index, step });
                }
                CueKind::Complete => {
                    let elapsed = step_started[index].map(|t| t.elapsed()).unwrap_or_default();
                    let step = &mut self.plan.steps[index];
                    step.status = ThinkingStatus::Completed;
                    step.duration_ms = Some(elapsed.as_millis() as u64);
                    info!(
                        run_id = %self.run_id,
                        agent = %step.id,
                        duration_ms = elapsed.as_millis() as u64,
                        "Agent completed"
                    );
                    let step = step.clone();
                    self.emit(PlaybackEvent::StepCompleted { index, step });
                }
            }
        }

        let total_ms = started.elapsed().as_millis() as u64;
        info!(run_id = %self.run_id, total_ms, "Playback finished");
        self.emit(PlaybackEvent::RunFinished {
            run_id: self.run_id,
            total_ms,
        });
        SequenceOutcome::Completed {
            steps: self.plan.steps,
            total_ms,
        }
    }

    fn cancelled(self) -> SequenceOutcome {
        let completed_steps = self.plan.steps.iter().filter(|s| s.is_completed()).count();
        info!(run_id = %self.run_id, completed_steps, "Playback cancelled");
        self.emit(PlaybackEvent::RunCancelled {
            run_id: self.run_id,
            completed_steps,
        });
        SequenceOutcome::Cancelled {
            steps: self.plan.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentDescriptor, AgentKind};
    use crate::execution::{ExecutionEvent, SharedTracker};

    fn plan(ids: &[&str]) -> PlaybackPlan {
        PlaybackPlan::from_agents(
            ids.iter()
                .map(|id| AgentDescriptor::new(id, id, AgentKind::System, 1.0))
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_all_steps() {
        let tracker = SharedTracker::new();
        let outcome = StepSequencer::default()
            .run(plan(&["a", "b"]), tracker.clone())
            .await
            .unwrap();
        assert!(outcome.is_completed());
        assert!(outcome.steps().iter().all(|s| s.is_completed()));
        let state = tracker.snapshot().await;
        assert!(!state.is_executing);
        assert_eq!(state.completed.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_plan_completes_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ExecutionEvent>();
        let outcome = StepSequencer::default().run(PlaybackPlan::default(), tx).await.unwrap();
        assert_eq!(outcome, SequenceOutcome::Completed { steps: vec![], total_ms: 0 });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_events() {
        let tracker = SharedTracker::new();
        let handle = StepSequencer::default().start(plan(&["a", "b"]), tracker.clone()).await;
        tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
        handle.cancel();
        let outcome = handle.join().await.unwrap();
        assert!(!outcome.is_completed());

        tokio::time::sleep(std::time::Duration::from_secs(20)).await;
        let state = tracker.snapshot().await;
        assert!(state.completed.is_empty());
        assert!(state.active.contains("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_token_cancels_run() {
        let parent = CancellationToken::new();
        let sequencer = StepSequencer::default().with_cancel_token(parent.clone());
        let handle = sequencer.start(plan(&["a"]), SharedTracker::new()).await;
        parent.cancel();
        assert!(!handle.join().await.unwrap().is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_channel_brackets_run() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        StepSequencer::default()
            .with_event_channel(tx)
            .run(plan(&["a"]), SharedTracker::new())
            .await
            .unwrap();
        assert!(matches!(rx.recv().await, Some(PlaybackEvent::RunStarted { agent_count: 1, .. })));
        assert!(matches!(rx.recv().await, Some(PlaybackEvent::StepStarted { index: 0, .. })));
        assert!(matches!(rx.recv().await, Some(PlaybackEvent::StepCompleted { index: 0, .. })));
        match rx.recv().await {
            Some(PlaybackEvent::RunFinished { total_ms, .. }) => assert!((8000..8100).contains(&total_ms)),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
