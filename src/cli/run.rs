use tokio::sync::mpsc;
use tracing::info;

use crate::chat::ChatEngine;
use crate::cli::commands::RunArgs;
use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::repl::progress::{ask_with_progress, PlaybackProgress};
use crate::repl::renderer;

pub async fn handle_run(args: RunArgs, ctx: AppContext, quiet: bool) -> Result<(), NablonError> {
    info!(question = %args.question, "Running question");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = ChatEngine::from_config(ctx.catalog, &ctx.config).with_event_channel(tx);
    let mut progress = if quiet || args.json {
        PlaybackProgress::hidden()
    } else {
        PlaybackProgress::new()
    };

    let reply = ask_with_progress(&mut engine, &mut rx, &args.question, &mut progress).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        if !quiet {
            println!("{}", renderer::render_steps(&reply.steps));
        }
        println!("{}", renderer::render_reply(&reply));
    }

    if !reply.complete {
        return Err(NablonError::Cancelled("Playback interrupted".into()));
    }
    Ok(())
}
