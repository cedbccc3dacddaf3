use std::collections::BTreeSet;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::agents::DEFAULT_PIPELINE;
use crate::fixtures::Catalog;
use crate::repl::commands::COMMAND_NAMES;

/// The part of the line under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot<'a> {
    Question(&'a str),
    Command(&'a str),
    Argument {
        command: &'a str,
        previous: &'a str,
        partial: &'a str,
    },
}

impl<'a> Slot<'a> {
    fn of(input: &'a str) -> Self {
        if !input.starts_with('/') {
            return Slot::Question(input);
        }
        match input.rsplit_once(' ') {
            None => Slot::Command(input),
            Some((head, partial)) => {
                let command = head.split_whitespace().next().unwrap_or(head);
                let previous = head.split_whitespace().last().unwrap_or(command);
                Slot::Argument { command, previous, partial }
            }
        }
    }

    fn partial(&self) -> &'a str {
        match *self {
            Slot::Question(s) | Slot::Command(s) => s,
            Slot::Argument { partial, .. } => partial,
        }
    }
}

/// Completion and inline hints over the loaded catalog: curated
/// questions, slash commands, database ids after `--db` and agent ids
/// after `--hover`.
#[derive(Default)]
pub struct ReplHelper {
    questions: Vec<String>,
    databases: Vec<String>,
    agents: Vec<String>,
}

impl ReplHelper {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let agents: BTreeSet<String> = catalog
            .workflows
            .iter()
            .flat_map(|w| w.agents.iter().map(|a| a.id.clone()))
            .chain(DEFAULT_PIPELINE.iter().map(|d| d.agent.as_str().to_string()))
            .collect();
        Self {
            questions: catalog.questions.iter().map(|q| q.question.clone()).collect(),
            databases: catalog.databases.iter().map(|d| d.id.clone()).collect(),
            agents: agents.into_iter().collect(),
        }
    }

    fn candidates(&self, slot: &Slot<'_>) -> Vec<String> {
        match *slot {
            Slot::Question("") => Vec::new(),
            Slot::Question(text) => {
                let needle = text.to_lowercase();
                self.questions
                    .iter()
                    .filter(|q| q.to_lowercase().starts_with(&needle))
                    .cloned()
                    .collect()
            }
            Slot::Command(prefix) => COMMAND_NAMES
                .iter()
                .filter(|name| name.starts_with(prefix))
                .map(|name| name.to_string())
                .collect(),
            Slot::Argument { command, previous, partial } => {
                let pool: Vec<&str> = match (command, previous) {
                    ("/questions", "--db") => self.databases.iter().map(String::as_str).collect(),
                    ("/graph", "--hover") => self.agents.iter().map(String::as_str).collect(),
                    ("/questions", _) => vec!["--db"],
                    ("/graph", _) => vec!["--hover"],
                    ("/help", "/help") => COMMAND_NAMES.iter().map(|n| n.trim_start_matches('/')).collect(),
                    _ => Vec::new(),
                };
                pool.into_iter()
                    .filter(|c| c.starts_with(partial))
                    .map(String::from)
                    .collect()
            }
        }
    }
}

impl Helper for ReplHelper {}
impl Validator for ReplHelper {}
impl Highlighter for ReplHelper {}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let slot = Slot::of(line.trim_start());
        let typed = slot.partial().len();
        self.candidates(&slot)
            .into_iter()
            .find_map(|c| c.get(typed..).filter(|rest| !rest.is_empty()).map(String::from))
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let slot = Slot::of(line[..pos].trim_start());
        let start = pos - slot.partial().len();
        let pairs = self
            .candidates(&slot)
            .into_iter()
            .map(|c| Pair { display: c.clone(), replacement: c })
            .collect();
        Ok((start, pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> ReplHelper {
        ReplHelper::from_catalog(&Catalog::builtin().unwrap())
    }

    #[test]
    fn test_slot_detection() {
        assert_eq!(Slot::of("who is"), Slot::Question("who is"));
        assert_eq!(Slot::of("/gr"), Slot::Command("/gr"));
        assert_eq!(
            Slot::of("/questions --db emp"),
            Slot::Argument { command: "/questions", previous: "--db", partial: "emp" }
        );
        assert_eq!(
            Slot::of("/graph "),
            Slot::Argument { command: "/graph", previous: "/graph", partial: "" }
        );
    }

    #[test]
    fn test_database_ids_after_db_flag() {
        let found = helper().candidates(&Slot::of("/questions --db emp"));
        assert_eq!(found, vec!["employee".to_string()]);
    }

    #[test]
    fn test_hover_offers_catalog_and_pipeline_agents() {
        let found = helper().candidates(&Slot::of("/graph --hover s"));
        assert!(found.contains(&"schema_retriever".to_string()));
        assert!(found.contains(&"sandbox".to_string()));
        assert!(found.contains(&"selector".to_string()));
    }

    #[test]
    fn test_questions_match_case_insensitively() {
        let found = helper().candidates(&Slot::of("WHO IS"));
        assert_eq!(found, vec!["Who is the CEO?".to_string()]);
        assert!(helper().candidates(&Slot::of("")).is_empty());
    }

    #[test]
    fn test_help_completes_bare_command_names() {
        let found = helper().candidates(&Slot::of("/help gr"));
        assert_eq!(found, vec!["graph".to_string()]);
    }
}
