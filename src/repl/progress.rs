use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chat::{AgentReply, ChatEngine};
use crate::errors::NablonError;
use crate::sequencer::PlaybackEvent;
use crate::utils::formatting::{format_duration, one_line};

const DETAIL_WIDTH: usize = 72;

/// Manages indicatif bars while a playback run is on screen.
pub struct PlaybackProgress {
    multi: MultiProgress,
    step_bar: Option<ProgressBar>,
    active_bar: Option<ProgressBar>,
}

impl Default for PlaybackProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            step_bar: None,
            active_bar: None,
        }
    }

    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            step_bar: None,
            active_bar: None,
        }
    }

    /// Handle a playback event and update progress bars accordingly.
    pub fn handle_event(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::RunStarted { agent_count, total_ms, .. } => {
                let bar = self.multi.add(ProgressBar::new(*agent_count as u64));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {bar:30.cyan/dark_gray} {pos}/{len} agents | {msg}")
                        .unwrap()
                        .progress_chars("█▓░"),
                );
                bar.set_message(format!("~{}", format_duration(*total_ms)));
                self.step_bar = Some(bar);
            }
            PlaybackEvent::StepStarted { step, .. } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner:.cyan} {msg}")
                        .unwrap(),
                );
                let detail = step
                    .detail
                    .as_deref()
                    .map(|d| format!(" {}", style(one_line(d, DETAIL_WIDTH)).dim()))
                    .unwrap_or_default();
                bar.set_message(format!("{}{}", step.label, detail));
                bar.enable_steady_tick(std::time::Duration::from_millis(100));
                if let Some(previous) = self.active_bar.replace(bar) {
                    previous.finish_and_clear();
                }
            }
            PlaybackEvent::StepCompleted { step, .. } => {
                if let Some(bar) = &self.step_bar {
                    bar.inc(1);
                }
                let took = step.duration_ms.map(format_duration).unwrap_or_default();
                self.println(&format!(
                    "  {} {} {}",
                    style("✓").green(),
                    style(&step.label).green(),
                    style(took).dim(),
                ));
            }
            PlaybackEvent::RunFinished { total_ms, .. } => {
                self.clear_active();
                if let Some(bar) = self.step_bar.take() {
                    bar.finish_and_clear();
                }
                self.println(&format!(
                    "  {} {}",
                    style("Thought for").dim(),
                    style(format_duration(*total_ms)).dim(),
                ));
            }
            PlaybackEvent::RunCancelled { completed_steps, .. } => {
                self.clear_active();
                if let Some(bar) = self.step_bar.take() {
                    bar.abandon_with_message(format!("Cancelled after {} steps", completed_steps));
                }
            }
        }
    }

    fn clear_active(&mut self) {
        if let Some(bar) = self.active_bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Print a line through the multi-progress (won't interfere with bars).
    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }
}

/// Play one chat turn while feeding its playback events to `progress`.
/// Ctrl-C cancels the turn rather than the process.
pub async fn ask_with_progress(
    engine: &mut ChatEngine,
    events: &mut mpsc::UnboundedReceiver<PlaybackEvent>,
    query: &str,
    progress: &mut PlaybackProgress,
) -> Result<AgentReply, NablonError> {
    let cancel = CancellationToken::new();
    let result = {
        let turn = engine.ask(query, cancel.clone());
        tokio::pin!(turn);
        loop {
            tokio::select! {
                result = &mut turn => break result,
                Some(event) = events.recv() => progress.handle_event(&event),
                signal = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                    if signal.is_ok() {
                        debug!("Ctrl-C, cancelling turn");
                        cancel.cancel();
                    }
                }
            }
        }
    };
    while let Ok(event) = events.try_recv() {
        progress.handle_event(&event);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::{ThinkingStatus, ThinkingStep};
    use uuid::Uuid;

    fn step(status: ThinkingStatus) -> ThinkingStep {
        ThinkingStep {
            id: "refiner".into(),
            label: "Query refiner".into(),
            detail: Some("Refining \"q\"...".into()),
            status,
            duration_ms: Some(800),
        }
    }

    #[test]
    fn test_bars_follow_run_lifecycle() {
        let mut progress = PlaybackProgress::hidden();
        let run_id = Uuid::new_v4();
        progress.handle_event(&PlaybackEvent::RunStarted { run_id, agent_count: 1, total_ms: 8000, per_step_ms: 8000 });
        assert!(progress.step_bar.is_some());
        progress.handle_event(&PlaybackEvent::StepStarted { index: 0, step: step(ThinkingStatus::Active) });
        assert!(progress.active_bar.is_some());
        progress.handle_event(&PlaybackEvent::StepCompleted { index: 0, step: step(ThinkingStatus::Completed) });
        assert_eq!(progress.step_bar.as_ref().map(|b| b.position()), Some(1));
        progress.handle_event(&PlaybackEvent::RunFinished { run_id, total_ms: 8000 });
        assert!(progress.step_bar.is_none());
        assert!(progress.active_bar.is_none());
    }

    #[test]
    fn test_cancel_clears_bars() {
        let mut progress = PlaybackProgress::hidden();
        let run_id = Uuid::new_v4();
        progress.handle_event(&PlaybackEvent::RunStarted { run_id, agent_count: 2, total_ms: 8000, per_step_ms: 4000 });
        progress.handle_event(&PlaybackEvent::StepStarted { index: 0, step: step(ThinkingStatus::Active) });
        progress.handle_event(&PlaybackEvent::RunCancelled { run_id, completed_steps: 0 });
        assert!(progress.step_bar.is_none());
        assert!(progress.active_bar.is_none());
    }
}
