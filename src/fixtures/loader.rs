use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::NablonError;
use super::schema::CATALOG_SCHEMA;
use super::types::Catalog;

pub const MAX_FIXTURE_BYTES: u64 = 4 * 1_048_576;

static BUILTIN_CATALOG: &str = include_str!("../../fixtures/catalog.json");

impl Catalog {
    /// The demo catalog compiled into the binary.
    pub fn builtin() -> Result<Self, NablonError> {
        parse_catalog(BUILTIN_CATALOG)
    }
}

impl std::str::FromStr for Catalog {
    type Err = NablonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_catalog(s)
    }
}

pub async fn load_catalog(path: &Path) -> Result<Catalog, NablonError> {
    if !path.exists() {
        return Err(NablonError::Fixture(format!("Fixture file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_FIXTURE_BYTES {
        return Err(NablonError::Fixture("Fixture file exceeds 4MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&content).map_err(|e| match e {
        NablonError::Fixture(msg) => NablonError::Fixture(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    info!(
        path = %path.display(),
        databases = catalog.databases.len(),
        questions = catalog.questions.len(),
        workflows = catalog.workflows.len(),
        "Loaded fixture catalog"
    );
    Ok(catalog)
}

/// Parse, schema-check and semantically validate catalog JSON.
pub fn parse_catalog(content: &str) -> Result<Catalog, NablonError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| NablonError::Fixture(format!("Malformed JSON: {}", e)))?;

    validate_schema(&value)?;

    let catalog: Catalog = serde_json::from_value(value)
        .map_err(|e| NablonError::Fixture(format!("Unexpected fixture shape: {}", e)))?;

    validate_semantics(&catalog)?;
    Ok(catalog)
}

/// Structural validation. Unlike config, fixture violations are fatal.
fn validate_schema(value: &serde_json::Value) -> Result<(), NablonError> {
    let compiled = jsonschema::JSONSchema::compile(&CATALOG_SCHEMA)
        .map_err(|e| NablonError::Internal(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(value) {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            return Err(NablonError::Fixture(format!(
                "Schema validation failed: {}",
                messages.join("; ")
            )));
        }
    }

    Ok(())
}

fn validate_semantics(catalog: &Catalog) -> Result<(), NablonError> {
    let database_ids: HashSet<&str> = catalog.databases.iter().map(|d| d.id.as_str()).collect();

    let mut question_ids = HashSet::new();
    for q in &catalog.questions {
        if !question_ids.insert(q.id) {
            return Err(NablonError::Fixture(format!("Duplicate question id {}", q.id)));
        }
        if !database_ids.contains(q.database.as_str()) {
            warn!(question_id = q.id, database = %q.database, "Question references unknown database");
        }
    }

    for workflow in &catalog.workflows {
        if workflow.question.trim().is_empty() {
            return Err(NablonError::Fixture("Workflow with empty question".into()));
        }

        let mut agent_ids = HashSet::new();
        for agent in &workflow.agents {
            if agent.id.is_empty() {
                return Err(NablonError::Fixture(format!(
                    "Agent id in workflow '{}' has no characters from [A-Za-z0-9_.-]",
                    workflow.question
                )));
            }
            if !agent_ids.insert(agent.id.as_str()) {
                return Err(NablonError::Fixture(format!(
                    "Duplicate agent id '{}' in workflow '{}'",
                    agent.id, workflow.question
                )));
            }
            if !agent.nominal_duration_secs.is_finite() || agent.nominal_duration_secs < 0.0 {
                return Err(NablonError::Fixture(format!(
                    "Agent '{}' in workflow '{}' has invalid duration {}",
                    agent.id, workflow.question, agent.nominal_duration_secs
                )));
            }
        }

        for edge in &workflow.edges {
            if !agent_ids.contains(edge.source.as_str()) || !agent_ids.contains(edge.target.as_str()) {
                warn!(
                    workflow = %workflow.question,
                    source = %edge.source,
                    target = %edge.target,
                    "Edge references unknown agent; it will not be drawn"
                );
            }
        }

        if let Some(db) = &workflow.database {
            if !database_ids.contains(db.as_str()) {
                warn!(workflow = %workflow.question, database = %db, "Workflow references unknown database");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.workflows.is_empty());
        assert!(!catalog.questions.is_empty());
        assert!(!catalog.databases.is_empty());
    }

    #[test]
    fn test_malformed_json_is_fixture_error() {
        let err = parse_catalog("{ not json").unwrap_err();
        assert!(matches!(err, NablonError::Fixture(_)));
    }

    #[test]
    fn test_schema_violation_rejected() {
        let err = parse_catalog(r#"{"workflows":[{"question":"q"}]}"#).unwrap_err();
        match err {
            NablonError::Fixture(msg) => assert!(msg.contains("Schema validation failed")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_negative_duration_rejected_by_schema() {
        let json = r#"{"workflows":[{"question":"q","answer":"a","agents":[{"id":"x","duration":-1}]}]}"#;
        assert!(parse_catalog(json).is_err());
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let json = r#"{"workflows":[{"question":"q","answer":"a",
            "agents":[{"id":"x","duration":1},{"id":"x","duration":2}]}]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate agent id"));
    }

    #[test]
    fn test_agent_ids_canonicalized_on_load() {
        let json = r#"{"workflows":[{"question":"q","answer":"a",
            "agents":[{"id":"SQL Generator","duration":1},{"id":"writer","duration":1}],
            "edges":[{"source":"SQL Generator","target":"writer"}]}]}"#;
        let catalog = parse_catalog(json).unwrap();
        let workflow = &catalog.workflows[0];
        assert_eq!(workflow.agents[0].id, "SQL_Generator");
        assert_eq!(workflow.edges[0].source, "SQL_Generator");
    }

    #[test]
    fn test_ids_colliding_after_sanitizing_rejected() {
        let json = r#"{"workflows":[{"question":"q","answer":"a",
            "agents":[{"id":"SQL Generator","duration":1},{"id":"SQL_Generator","duration":1}]}]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate agent id 'SQL_Generator'"));
    }

    #[test]
    fn test_id_without_valid_characters_rejected() {
        let json = r#"{"workflows":[{"question":"q","answer":"a","agents":[{"id":"!!!","duration":1}]}]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(matches!(err, NablonError::Fixture(_)));
    }

    #[test]
    fn test_dangling_edge_is_tolerated() {
        let json = r#"{"workflows":[{"question":"q","answer":"a",
            "agents":[{"id":"x","duration":1}],
            "edges":[{"source":"x","target":"ghost"}]}]}"#;
        let catalog = parse_catalog(json).unwrap();
        assert_eq!(catalog.workflows[0].edges.len(), 1);
    }

    #[test]
    fn test_duplicate_question_id_rejected() {
        let json = r#"{"questions":[
            {"id":1,"database":"d","question":"a"},
            {"id":1,"database":"d","question":"b"}]}"#;
        assert!(parse_catalog(json).is_err());
    }

    #[test]
    fn test_from_str() {
        let catalog: Catalog = r#"{"workflows":[]}"#.parse().unwrap();
        assert!(catalog.workflows.is_empty());
    }
}
