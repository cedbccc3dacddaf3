use std::path::Path;

use tracing::{info, warn};

use crate::errors::NablonError;
use super::schema::CONFIG_SCHEMA;
use super::types::NablonConfig;

pub const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<NablonConfig, NablonError> {
    if !path.exists() {
        return Err(NablonError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(NablonError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<NablonConfig, NablonError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    // An empty document is an empty config.
    if yaml.is_null() {
        return Ok(NablonConfig::default());
    }

    validate_schema(&yaml)?;

    let config: NablonConfig = serde_yaml::from_value(yaml)?;

    validate_conflicts(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), NablonError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| NablonError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| NablonError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: typed parsing and conflict checks below are authoritative.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &NablonConfig) -> Result<(), NablonError> {
    let threshold = config.matcher_settings().token_overlap_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(NablonError::Config(format!(
            "matcher.token_overlap_threshold must be in (0, 1], got {}",
            threshold
        )));
    }

    let sequencer = config.sequencer_settings();
    if sequencer.overlap_ms > 0 && sequencer.overlap_ms >= sequencer.min_total_ms {
        return Err(NablonError::Config(format!(
            "sequencer.overlap_ms ({}) must be smaller than sequencer.min_total_ms ({})",
            sequencer.overlap_ms, sequencer.min_total_ms
        )));
    }
    if sequencer.overlap_ms > 0 && sequencer.policy == crate::sequencer::SequencePolicy::Sequential {
        warn!(overlap_ms = sequencer.overlap_ms, "overlap_ms is ignored by the sequential policy");
    }

    if config.title_max_chars() == 0 {
        return Err(NablonError::Config("chat.title_max_chars must be at least 1".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_out_of_range() {
        let err = parse_config_str("matcher:\n  token_overlap_threshold: 1.5\n").unwrap_err();
        assert!(matches!(err, NablonError::Config(_)));
        assert!(parse_config_str("matcher:\n  token_overlap_threshold: 0\n").is_err());
    }

    #[test]
    fn test_overlap_must_be_below_floor() {
        let yaml = "sequencer:\n  min_total_ms: 1000\n  policy: overlap\n  overlap_ms: 1000\n";
        assert!(parse_config_str(yaml).is_err());
    }

    #[test]
    fn test_zero_title_length_rejected() {
        assert!(parse_config_str("chat:\n  title_max_chars: 0\n").is_err());
    }

    #[test]
    fn test_valid_config() {
        let yaml = "sequencer:\n  min_total_ms: 4000\nmatcher:\n  token_overlap_threshold: 0.5\n";
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.sequencer_settings().min_total_ms, 4000);
        assert_eq!(config.matcher_settings().token_overlap_threshold, 0.5);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_config_str("").unwrap();
        assert!(config.sequencer.is_none());
    }

    #[test]
    fn test_unknown_section_only_warns() {
        assert!(parse_config_str("theme:\n  dark: true\n").is_ok());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/nablon.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
