use serde::Serialize;
use tracing::debug;

use super::normalize::{normalize, tokens};

pub const DEFAULT_TOKEN_OVERLAP_THRESHOLD: f64 = 0.6;

/// Anything the matcher can select: it only needs the question text.
pub trait CatalogEntry {
    fn question(&self) -> &str;
}

impl CatalogEntry for String {
    fn question(&self) -> &str {
        self
    }
}

impl CatalogEntry for &str {
    fn question(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Containment,
    TokenOverlap { score: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct IntentMatch<'a, T> {
    pub entry: &'a T,
    pub index: usize,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    /// Token-overlap ratio that must be strictly exceeded.
    pub token_overlap_threshold: f64,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            token_overlap_threshold: DEFAULT_TOKEN_OVERLAP_THRESHOLD,
        }
    }
}

/// Heuristic free-text to canned-question matcher. Each stage scans the
/// whole catalog before the next, looser stage runs.
#[derive(Debug, Clone, Default)]
pub struct IntentMatcher {
    settings: MatcherSettings,
}

impl IntentMatcher {
    pub fn new(settings: MatcherSettings) -> Self {
        Self { settings }
    }

    pub fn find<'a, T: CatalogEntry>(&self, query: &str, catalog: &'a [T]) -> Option<IntentMatch<'a, T>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        let normalized: Vec<(usize, String)> = catalog
            .iter()
            .enumerate()
            .map(|(i, e)| (i, normalize(e.question())))
            .filter(|(_, q)| !q.is_empty())
            .collect();

        let hit = |index: usize, kind: MatchKind| {
            debug!(query = %query, index, kind = ?kind, "Intent matched");
            Some(IntentMatch { entry: &catalog[index], index, kind })
        };

        if let Some((i, _)) = normalized.iter().find(|(_, q)| *q == query) {
            return hit(*i, MatchKind::Exact);
        }

        if let Some((i, _)) = normalized
            .iter()
            .find(|(_, q)| q.contains(query.as_str()) || query.contains(q.as_str()))
        {
            return hit(*i, MatchKind::Containment);
        }

        let query_tokens = tokens(&query);
        for (i, q) in &normalized {
            let score = token_overlap(&query_tokens, &tokens(q));
            if score > self.settings.token_overlap_threshold {
                return hit(*i, MatchKind::TokenOverlap { score });
            }
        }

        debug!(query = %query, "No intent match");
        None
    }
}

/// Fraction of query tokens that occur inside some candidate token.
pub fn token_overlap(query_tokens: &[&str], candidate_tokens: &[&str]) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let hits = query_tokens
        .iter()
        .filter(|qt| candidate_tokens.iter().any(|ct| ct.contains(**qt)))
        .count();
    hits as f64 / query_tokens.len() as f64
}
