use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{NablonConfig, DEFAULT_TITLE_MAX_CHARS};
use crate::errors::NablonError;
use crate::execution::SharedTracker;
use crate::fixtures::{Catalog, ChartKind, WorkflowScript};
use crate::intent::{IntentMatcher, MatchKind, MatcherSettings};
use crate::sequencer::{PlaybackEvent, SequenceOutcome, SequencerSettings, StepSequencer, ThinkingStep};
use super::chart::select_chart;
use super::session::{ChatMessage, ChatSession};
use super::trace::pipeline_for;

/// What one chat turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub query: String,
    /// Catalog question the query resolved to; the query itself on fallback.
    pub question: String,
    pub matched: Option<MatchKind>,
    pub content: String,
    pub steps: Vec<ThinkingStep>,
    pub chart: Option<ChartKind>,
    pub follow_ups: Vec<String>,
    pub sql: Option<String>,
    pub tables_used: Vec<String>,
    pub complete: bool,
}

/// Drives chat turns: resolve the query, play the pipeline into the
/// shared tracker, record the transcript.
pub struct ChatEngine {
    catalog: Arc<Catalog>,
    matcher: IntentMatcher,
    sequencer_settings: SequencerSettings,
    tracker: SharedTracker,
    sessions: Vec<ChatSession>,
    title_max_chars: usize,
    event_tx: Option<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl ChatEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            matcher: IntentMatcher::new(MatcherSettings::default()),
            sequencer_settings: SequencerSettings::default(),
            tracker: SharedTracker::new(),
            sessions: vec![ChatSession::new()],
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            event_tx: None,
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &NablonConfig) -> Self {
        Self {
            matcher: IntentMatcher::new(config.matcher_settings()),
            sequencer_settings: config.sequencer_settings(),
            title_max_chars: config.title_max_chars(),
            ..Self::new(catalog)
        }
    }

    pub fn with_sequencer_settings(mut self, settings: SequencerSettings) -> Self {
        self.sequencer_settings = settings;
        self
    }

    /// Stream playback progress of every turn to a display.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn tracker(&self) -> &SharedTracker {
        &self.tracker
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The session new turns are recorded into.
    pub fn active_session(&self) -> &ChatSession {
        // sessions is never empty
        &self.sessions[self.sessions.len() - 1]
    }

    /// Resolve a query to a catalog script, or the generic fallback.
    pub fn resolve(&self, query: &str) -> (WorkflowScript, Option<MatchKind>) {
        match self.matcher.find(query, &self.catalog.workflows) {
            Some(found) => (found.entry.clone(), Some(found.kind)),
            None => (WorkflowScript::fallback(query.trim()), None),
        }
    }

    pub async fn ask(&mut self, query: &str, cancel: CancellationToken) -> Result<AgentReply, NablonError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NablonError::InvalidInput("Query is empty".into()));
        }

        let (script, matched) = self.resolve(query);
        match matched {
            Some(kind) => info!(query, question = %script.question, ?kind, "Query matched catalog"),
            None => info!(query, "No catalog match, using fallback answer"),
        }

        let plan = pipeline_for(&script, query);
        self.tracker.reset().await;

        let title_max_chars = self.title_max_chars;
        self.active_session_mut().push_user(query, title_max_chars);

        let mut sequencer = StepSequencer::new(self.sequencer_settings.clone()).with_cancel_token(cancel);
        if let Some(tx) = &self.event_tx {
            sequencer = sequencer.with_event_channel(tx.clone());
        }
        let outcome = sequencer.run(plan, self.tracker.clone()).await?;

        let complete = outcome.is_completed();
        let reply = match outcome {
            SequenceOutcome::Completed { steps, .. } => AgentReply {
                query: query.to_string(),
                question: script.question.clone(),
                matched,
                content: script.answer.clone(),
                steps,
                chart: select_chart(&script),
                follow_ups: script.follow_ups.clone(),
                sql: script.sql.clone(),
                tables_used: script.tables_used.clone(),
                complete,
            },
            SequenceOutcome::Cancelled { steps } => {
                warn!(query, completed_steps = steps.iter().filter(|s| s.is_completed()).count(), "Turn cancelled");
                self.tracker.reset().await;
                AgentReply {
                    query: query.to_string(),
                    question: script.question.clone(),
                    matched,
                    content: String::new(),
                    steps,
                    chart: None,
                    follow_ups: Vec::new(),
                    sql: None,
                    tables_used: Vec::new(),
                    complete,
                }
            }
        };

        self.active_session_mut().push(ChatMessage::Agent {
            content: reply.content.clone(),
            steps: reply.steps.clone(),
            chart: reply.chart,
            follow_ups: reply.follow_ups.clone(),
            complete,
            sent_at: Utc::now(),
        });

        Ok(reply)
    }

    /// Open a fresh session. An untouched active session is reused.
    pub fn new_session(&mut self) -> &ChatSession {
        if !self.active_session().is_empty() {
            self.sessions.push(ChatSession::new());
        }
        self.active_session()
    }

    /// Reset the tracker and discard every session.
    pub async fn clear_history(&mut self) {
        self.tracker.reset().await;
        self.sessions = vec![ChatSession::new()];
        info!("Chat history cleared");
    }

    fn active_session_mut(&mut self) -> &mut ChatSession {
        if self.sessions.is_empty() {
            self.sessions.push(ChatSession::new());
        }
        let last = self.sessions.len() - 1;
        &mut self.sessions[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn engine() -> ChatEngine {
        ChatEngine::new(Arc::new(Catalog::builtin().unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_rejected() {
        let mut engine = engine();
        let err = engine.ask("   ", CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, NablonError::InvalidInput(_)));
        assert!(engine.active_session().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_matched_turn_records_transcript() {
        let mut engine = engine();
        let reply = engine.ask("top 5 vendors", CancellationToken::new()).await.unwrap();
        assert!(reply.complete);
        assert_eq!(reply.question, "List top 5 vendors by sale amount.");
        assert!(reply.content.contains("Diageo"));
        assert_eq!(reply.chart, Some(ChartKind::Bar));
        assert!(reply.steps.iter().all(|s| s.is_completed()));

        let session = engine.active_session();
        assert_eq!(session.title, "top 5 vendors");
        assert_eq!(session.messages.len(), 2);

        let state = engine.tracker().snapshot().await;
        assert!(!state.is_executing);
        assert_eq!(state.completed.len(), reply.steps.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_query_uses_fallback() {
        let mut engine = engine();
        let reply = engine.ask("asdkjasd", CancellationToken::new()).await.unwrap();
        assert!(reply.matched.is_none());
        assert_eq!(reply.content, crate::fixtures::FALLBACK_ANSWER);
        assert_eq!(reply.steps.len(), 6);
        assert_eq!(reply.chart, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_turn_is_incomplete() {
        let mut engine = engine();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            trigger.cancel();
        });

        let reply = engine.ask("Who is the CEO?", cancel).await.unwrap();
        assert!(!reply.complete);
        assert!(reply.steps.iter().any(|s| s.is_completed()));
        assert!(!reply.steps.iter().all(|s| s.is_completed()));
        assert!(engine.tracker().snapshot().await.is_empty());

        match engine.active_session().messages.last().unwrap() {
            ChatMessage::Agent { complete, .. } => assert!(!complete),
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_and_clear() {
        let mut engine = engine();
        engine.new_session();
        assert_eq!(engine.sessions().len(), 1);

        engine.ask("Who is the CEO?", CancellationToken::new()).await.unwrap();
        engine.new_session();
        assert_eq!(engine.sessions().len(), 2);

        engine.clear_history().await;
        assert_eq!(engine.sessions().len(), 1);
        assert!(engine.active_session().is_empty());
        assert!(engine.tracker().snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_from_config() {
        let config = crate::config::parse_config_str("sequencer:\n  min_total_ms: 1000\nchat:\n  title_max_chars: 5\n").unwrap();
        let mut engine = ChatEngine::from_config(Arc::new(Catalog::builtin().unwrap()), &config);
        let started = tokio::time::Instant::now();
        engine.ask("Who is the CEO?", CancellationToken::new()).await.unwrap();
        // six 0.8 s steps exceed the 1 s floor
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(4800) && elapsed < Duration::from_millis(4900));
        assert_eq!(engine.active_session().title, "Who i...");
    }
}
