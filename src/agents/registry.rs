use std::sync::LazyLock;

use super::descriptor::{AgentDescriptor, AgentKind};

/// Nominal pacing of one step of the default chat pipeline.
pub const DEFAULT_STEP_SECS: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineAgent {
    Refiner,
    Evaluator,
    Selector,
    Generator,
    Sandbox,
    Visualizer,
    Final,
}

impl PipelineAgent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refiner => "refiner",
            Self::Evaluator => "evaluator",
            Self::Selector => "selector",
            Self::Generator => "generator",
            Self::Sandbox => "sandbox",
            Self::Visualizer => "visualizer",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for PipelineAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AgentDefinition {
    pub agent: PipelineAgent,
    pub display_name: &'static str,
    pub kind: AgentKind,
    /// Only played when the answer needs a chart.
    pub visual_only: bool,
}

impl AgentDefinition {
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor::new(self.agent.as_str(), self.display_name, self.kind, DEFAULT_STEP_SECS)
    }
}

/// The text-to-SQL pipeline every chat answer is narrated through.
pub static DEFAULT_PIPELINE: LazyLock<Vec<AgentDefinition>> = LazyLock::new(|| vec![
    AgentDefinition {
        agent: PipelineAgent::Refiner,
        display_name: "Query refiner",
        kind: AgentKind::System,
        visual_only: false,
    },
    AgentDefinition {
        agent: PipelineAgent::Evaluator,
        display_name: "Intent evaluator",
        kind: AgentKind::System,
        visual_only: false,
    },
    AgentDefinition {
        agent: PipelineAgent::Selector,
        display_name: "Table selector",
        kind: AgentKind::Retrieval,
        visual_only: false,
    },
    AgentDefinition {
        agent: PipelineAgent::Generator,
        display_name: "SQL generator",
        kind: AgentKind::Generation,
        visual_only: false,
    },
    AgentDefinition {
        agent: PipelineAgent::Sandbox,
        display_name: "Execution sandbox",
        kind: AgentKind::Validation,
        visual_only: false,
    },
    AgentDefinition {
        agent: PipelineAgent::Visualizer,
        display_name: "Chart visualizer",
        kind: AgentKind::Visualization,
        visual_only: true,
    },
    AgentDefinition {
        agent: PipelineAgent::Final,
        display_name: "Answer composer",
        kind: AgentKind::Generation,
        visual_only: false,
    },
]);

pub fn find_definition(agent: PipelineAgent) -> Option<&'static AgentDefinition> {
    DEFAULT_PIPELINE.iter().find(|d| d.agent == agent)
}
