use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::intent::{MatcherSettings, DEFAULT_TOKEN_OVERLAP_THRESHOLD};
use crate::sequencer::{SequencePolicy, SequencerSettings, DEFAULT_MIN_TOTAL_MS};

pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NablonConfig {
    pub sequencer: Option<SequencerConfig>,
    pub matcher: Option<MatcherConfig>,
    pub chat: Option<ChatConfig>,
    pub fixtures: Option<FixturesConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SequencerConfig {
    pub min_total_ms: Option<u64>,
    pub policy: Option<SequencePolicy>,
    pub overlap_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MatcherConfig {
    pub token_overlap_threshold: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ChatConfig {
    pub title_max_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FixturesConfig {
    /// Catalog file to load instead of the built-in one.
    pub path: Option<PathBuf>,
}

impl NablonConfig {
    pub fn sequencer_settings(&self) -> SequencerSettings {
        let section = self.sequencer.clone().unwrap_or_default();
        SequencerSettings {
            min_total_ms: section.min_total_ms.unwrap_or(DEFAULT_MIN_TOTAL_MS),
            policy: section.policy.unwrap_or_default(),
            overlap_ms: section.overlap_ms.unwrap_or(0),
        }
    }

    pub fn matcher_settings(&self) -> MatcherSettings {
        MatcherSettings {
            token_overlap_threshold: self
                .matcher
                .as_ref()
                .and_then(|m| m.token_overlap_threshold)
                .unwrap_or(DEFAULT_TOKEN_OVERLAP_THRESHOLD),
        }
    }

    pub fn title_max_chars(&self) -> usize {
        self.chat
            .as_ref()
            .and_then(|c| c.title_max_chars)
            .unwrap_or(DEFAULT_TITLE_MAX_CHARS)
    }

    pub fn fixtures_path(&self) -> Option<&PathBuf> {
        self.fixtures.as_ref().and_then(|f| f.path.as_ref())
    }
}
