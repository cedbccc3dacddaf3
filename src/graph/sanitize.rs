use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

static INVALID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_.-]").expect("static regex is valid"));
static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("static regex is valid"));

/// Canonical form of a node id as it appears in execution state:
/// invalid characters become `_`, runs of `_` collapse, and leading or
/// trailing `_` are trimmed.
pub fn sanitize_id(name: &str) -> String {
    let replaced = INVALID.replace_all(name, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Serde adapter: ids are stored in canonical form from the moment they
/// are read, so the store, the sequencer and the graph agree on them.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(sanitize_id(&raw))
}

/// `sales_data_agent` -> `Sales Data Agent`.
pub fn display_label(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
