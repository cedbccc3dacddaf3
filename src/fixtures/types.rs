use serde::{Deserialize, Serialize};

use crate::agents::AgentDescriptor;
use crate::graph::{deserialize_id, sanitize_id};
use crate::intent::CatalogEntry;

pub const FALLBACK_ANSWER: &str = "I couldn't find a pre-computed answer for that question. \
In a live system, I would analyze your database and generate a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "trend_line")]
    TrendLine,
    #[serde(rename = "bar_horizontal_bottom_5")]
    BarHorizontalBottom5,
    #[serde(rename = "bar_vertical_top_5")]
    BarVerticalTop5,
}

impl ChartKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Bar => "Bar Chart",
            Self::TrendLine => "Trend Line Chart",
            Self::BarHorizontalBottom5 => "Horizontal Bar Chart",
            Self::BarVerticalTop5 => "Vertical Bar Chart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(deserialize_with = "deserialize_id")]
    pub source: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub target: String,
}

impl EdgeSpec {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: sanitize_id(source),
            target: sanitize_id(target),
        }
    }
}

/// A canned question with its pre-authored answer and, optionally, the
/// agent pipeline narrated while "computing" it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowScript {
    pub question: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub agents: Vec<AgentDescriptor>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    pub answer: String,
    #[serde(default)]
    pub chart: Option<ChartKind>,
    #[serde(default)]
    pub follow_ups: Vec<String>,
    #[serde(default)]
    pub tables_used: Vec<String>,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub sql_response: Option<serde_json::Value>,
    #[serde(default)]
    pub need_visualization: bool,
}

impl WorkflowScript {
    /// Generic script played when a query matches nothing in the catalog.
    pub fn fallback(query: &str) -> Self {
        Self {
            question: query.to_string(),
            answer: FALLBACK_ANSWER.to_string(),
            ..Self::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.answer == FALLBACK_ANSWER
    }
}

impl CatalogEntry for WorkflowScript {
    fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseFixture {
    pub id: String,
    pub name: String,
    pub database_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedQuestion {
    pub id: u32,
    pub database: String,
    pub question: String,
    #[serde(default)]
    pub category: String,
}

impl CatalogEntry for CuratedQuestion {
    fn question(&self) -> &str {
        &self.question
    }
}

/// Everything the demo reads from disk, loaded wholesale at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub databases: Vec<DatabaseFixture>,
    #[serde(default)]
    pub questions: Vec<CuratedQuestion>,
    #[serde(default)]
    pub workflows: Vec<WorkflowScript>,
}

impl Catalog {
    pub fn database(&self, id: &str) -> Option<&DatabaseFixture> {
        self.databases.iter().find(|d| d.id == id)
    }

    pub fn questions_for(&self, database: Option<&str>) -> Vec<&CuratedQuestion> {
        self.questions
            .iter()
            .filter(|q| database.map_or(true, |db| q.database == db))
            .collect()
    }

    /// Case-insensitive substring search over question text and category.
    pub fn search(&self, text: &str, database: Option<&str>) -> Vec<&CuratedQuestion> {
        let needle = text.to_lowercase();
        self.questions_for(database)
            .into_iter()
            .filter(|q| q.question.to_lowercase().contains(&needle) || q.category.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog {
            databases: vec![],
            questions: vec![
                CuratedQuestion { id: 1, database: "sales".into(), question: "Top vendors".into(), category: "Vendors".into() },
                CuratedQuestion { id: 2, database: "hr".into(), question: "Headcount by team".into(), category: "People".into() },
                CuratedQuestion { id: 3, database: "sales".into(), question: "Monthly trend".into(), category: "Trends".into() },
            ],
            workflows: vec![],
        }
    }

    #[test]
    fn test_questions_for_database() {
        let c = catalog();
        assert_eq!(c.questions_for(Some("sales")).len(), 2);
        assert_eq!(c.questions_for(None).len(), 3);
    }

    #[test]
    fn test_search_matches_category() {
        let c = catalog();
        let found = c.search("people", None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert!(c.search("people", Some("sales")).is_empty());
    }

    #[test]
    fn test_fallback_script() {
        let s = WorkflowScript::fallback("asdkjasd");
        assert!(s.is_fallback());
        assert!(s.agents.is_empty());
        assert!(!s.need_visualization);
    }

    #[test]
    fn test_chart_kind_wire_names() {
        let kind: ChartKind = serde_json::from_str("\"bar_horizontal_bottom_5\"").unwrap();
        assert_eq!(kind, ChartKind::BarHorizontalBottom5);
        assert_eq!(kind.description(), "Horizontal Bar Chart");
    }
}
