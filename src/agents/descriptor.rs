use serde::{Deserialize, Serialize};

use crate::graph::{deserialize_id, sanitize_id};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    System,
    Retrieval,
    Generation,
    Validation,
    Visualization,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Retrieval => "retrieval",
            Self::Generation => "generation",
            Self::Validation => "validation",
            Self::Visualization => "visualization",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named step of a canned pipeline. Carries display metadata and the
/// nominal duration used to pace playback; nothing is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Canonical id, see [`sanitize_id`].
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: AgentKind,
    #[serde(rename = "duration", alias = "nominal_duration_secs")]
    pub nominal_duration_secs: f64,
}

impl AgentDescriptor {
    pub fn new(id: &str, name: &str, kind: AgentKind, nominal_duration_secs: f64) -> Self {
        Self {
            id: sanitize_id(id),
            name: name.to_string(),
            kind,
            nominal_duration_secs,
        }
    }

    /// Name shown in progress output; falls back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
