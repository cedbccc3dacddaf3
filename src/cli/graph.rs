use std::time::Duration;

use console::style;
use tracing::warn;

use crate::chat::{pipeline_for, ChatEngine};
use crate::cli::commands::GraphArgs;
use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::graph::{map_to_visual, sanitize_id, GraphDefinition};
use crate::repl::renderer;
use crate::sequencer::Timeline;
use crate::utils::formatting::format_duration;

pub async fn handle_graph(args: GraphArgs, ctx: AppContext) -> Result<(), NablonError> {
    let engine = ChatEngine::from_config(ctx.catalog, &ctx.config);
    let (script, _) = engine.resolve(&args.question);
    let plan = pipeline_for(&script, &args.question);

    let timeline = Timeline::plan(&plan.agents, &ctx.config.sequencer_settings());
    let at = args.at_ms.map(Duration::from_millis).unwrap_or(timeline.total);
    let state = timeline.state_at(&plan.agents, at);

    let graph = GraphDefinition::from_agents(&plan.agents, &script.edges);
    if let Some(hover) = &args.hover {
        if !graph.contains_node(&sanitize_id(hover)) {
            warn!(hover = %hover, "Hovered agent is not in the graph; no lineage overlay");
        }
    }
    let visual = map_to_visual(&state, &graph, args.hover.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visual)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        style(&script.question).white().bold(),
        style("at").dim(),
        style(format!(
            "{} / {}",
            format_duration(at.as_millis() as u64),
            format_duration(timeline.total.as_millis() as u64)
        ))
        .cyan(),
    );
    println!("{}", renderer::render_visual_graph(&visual));
    Ok(())
}
