use clap::Parser;
use tracing_subscriber::EnvFilter;

use nablon::cli::{self, context::load_context, Cli, Commands};
use nablon::errors::NablonError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging. Info-level playback logs would interleave with
    // the progress bars, so the default is warn.
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .with_writer(std::io::stderr)
            .init();
    }
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = dispatch(cli).await;

    if let Err(e) = result {
        tracing::debug!(error_type = e.classify().error_type, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(cli: Cli) -> Result<(), NablonError> {
    let ctx = load_context(cli.config.as_deref(), cli.fixtures.as_deref()).await?;

    match cli.command {
        Commands::Run(args) => cli::run::handle_run(args, ctx, cli.quiet).await,
        Commands::Match(args) => cli::matching::handle_match(args, ctx).await,
        Commands::Graph(args) => cli::graph::handle_graph(args, ctx).await,
        Commands::Chat => cli::chat::handle_chat(ctx).await,
        Commands::Validate => cli::validate::handle_validate(cli.config.as_deref(), ctx).await,
        Commands::Questions(args) => cli::questions::handle_questions(args, ctx).await,
    }
}
