use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agents::AgentDescriptor;
use crate::execution::{ExecutionEvent, ExecutionState};

pub const DEFAULT_MIN_TOTAL_MS: u64 = 8000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencePolicy {
    /// One agent at a time; the next starts when the previous completes.
    #[default]
    Sequential,
    /// Each agent stays active for `overlap_ms` past the next agent's start.
    Overlap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerSettings {
    pub min_total_ms: u64,
    pub policy: SequencePolicy,
    pub overlap_ms: u64,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            min_total_ms: DEFAULT_MIN_TOTAL_MS,
            policy: SequencePolicy::Sequential,
            overlap_ms: 0,
        }
    }
}

/// Completions sort before starts at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CueKind {
    Complete,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub offset: Duration,
    pub index: usize,
    pub kind: CueKind,
}

impl Cue {
    pub fn event_for(&self, agents: &[AgentDescriptor]) -> ExecutionEvent {
        let id = &agents[self.index].id;
        match self.kind {
            CueKind::Start => ExecutionEvent::started(id),
            CueKind::Complete => ExecutionEvent::completed(id),
        }
    }
}

/// When each start and completion fires, relative to the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub total: Duration,
    pub per_step: Duration,
    pub cues: Vec<Cue>,
}

impl Timeline {
    pub fn plan(agents: &[AgentDescriptor], settings: &SequencerSettings) -> Self {
        let n = agents.len();
        if n == 0 {
            return Self {
                total: Duration::ZERO,
                per_step: Duration::ZERO,
                cues: Vec::new(),
            };
        }

        let nominal_ms: f64 = agents
            .iter()
            .map(|a| a.nominal_duration_secs)
            .filter(|d| d.is_finite() && *d > 0.0)
            .sum::<f64>()
            * 1000.0;
        let total_ms = (nominal_ms.round() as u64).max(settings.min_total_ms);
        let total = Duration::from_millis(total_ms);
        let per_step = total / n as u32;

        let overlap = match settings.policy {
            SequencePolicy::Sequential => Duration::ZERO,
            SequencePolicy::Overlap => Duration::from_millis(settings.overlap_ms),
        };

        let mut cues = Vec::with_capacity(n * 2);
        for index in 0..n {
            let start = per_step * index as u32;
            let nominal_end = if index + 1 == n { total } else { per_step * (index as u32 + 1) };
            let end = (nominal_end + overlap).min(total);
            cues.push(Cue { offset: start, index, kind: CueKind::Start });
            cues.push(Cue { offset: end, index, kind: CueKind::Complete });
        }
        // Stable: equal keys keep list order.
        cues.sort_by_key(|c| (c.offset, c.kind));

        Self { total, per_step, cues }
    }

    /// Execution state after every cue at or before `at` has fired.
    pub fn state_at(&self, agents: &[AgentDescriptor], at: Duration) -> ExecutionState {
        self.cues
            .iter()
            .take_while(|c| c.offset <= at)
            .fold(ExecutionState::new(), |state, cue| state.apply(&cue.event_for(agents)))
    }
}
