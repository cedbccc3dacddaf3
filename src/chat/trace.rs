use crate::agents::{PipelineAgent, DEFAULT_PIPELINE};
use crate::fixtures::WorkflowScript;
use crate::sequencer::PlaybackPlan;

/// Build the playback plan narrated while a script's answer is "computed".
///
/// Scripts that declare their own agents are played as declared. All
/// others run the default text-to-SQL pipeline, with the visualizer only
/// when the answer needs a chart, and each step carries progress text
/// derived from the script.
pub fn pipeline_for(script: &WorkflowScript, query: &str) -> PlaybackPlan {
    if !script.agents.is_empty() {
        return PlaybackPlan::from_agents(script.agents.clone());
    }

    let agents = DEFAULT_PIPELINE
        .iter()
        .filter(|def| !def.visual_only || script.need_visualization)
        .map(|def| def.descriptor())
        .collect();

    DEFAULT_PIPELINE
        .iter()
        .fold(PlaybackPlan::from_agents(agents), |plan, def| {
            plan.with_detail(def.agent.as_str(), step_detail(def.agent, script, query))
        })
}

fn step_detail(agent: PipelineAgent, script: &WorkflowScript, query: &str) -> String {
    match agent {
        PipelineAgent::Refiner => format!("Refining \"{}\"...", query.trim()),
        PipelineAgent::Evaluator => "Routing to SQL Engine...".to_string(),
        PipelineAgent::Selector => {
            let tables = if script.tables_used.is_empty() {
                "Identifying tables...".to_string()
            } else {
                script.tables_used.join(", ")
            };
            format!("Identified Tables: {}", tables)
        }
        PipelineAgent::Generator => {
            format!("Generated SQL: {}", script.sql.as_deref().unwrap_or("Generating SQL..."))
        }
        PipelineAgent::Sandbox => {
            let preview = script
                .sql_response
                .as_ref()
                .and_then(|v| serde_json::to_string_pretty(v).ok())
                .unwrap_or_else(|| "Validating Query & Data...".to_string());
            format!("Execution Result: {}", preview)
        }
        PipelineAgent::Visualizer => "Generating Chart Configuration...".to_string(),
        PipelineAgent::Final => "Formulating Final Answer...".to_string(),
    }
}
