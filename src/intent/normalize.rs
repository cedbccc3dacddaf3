use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\s]").expect("static regex is valid")
});

/// Lowercase, strip everything outside `[a-z0-9\s]`, trim.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALNUM_SPACE.replace_all(&lower, "").trim().to_string()
}

pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
