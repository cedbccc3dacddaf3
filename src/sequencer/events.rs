use uuid::Uuid;

use super::thinking::ThinkingStep;

/// Progress messages a sequencer run streams to a display.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Playback began
    RunStarted {
        run_id: Uuid,
        agent_count: usize,
        total_ms: u64,
        per_step_ms: u64,
    },
    /// A thinking step became active
    StepStarted {
        index: usize,
        step: ThinkingStep,
    },
    /// A thinking step completed, with its measured duration
    StepCompleted {
        index: usize,
        step: ThinkingStep,
    },
    /// Every step completed
    RunFinished {
        run_id: Uuid,
        total_ms: u64,
    },
    /// The run was cancelled or superseded by a reset
    RunCancelled {
        run_id: Uuid,
        completed_steps: usize,
    },
}
