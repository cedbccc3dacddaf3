use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nablon", version, about = "Simulated multi-agent analytics over canned questions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Fixture catalog (JSON) to use instead of the built-in one
    #[arg(short, long, global = true)]
    pub fixtures: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer one question, playing the agent pipeline with progress
    Run(RunArgs),
    /// Show which catalog question a query resolves to
    Match(MatchArgs),
    /// Project execution state onto the agent graph at a point in playback
    Graph(GraphArgs),
    /// Interactive chat
    Chat,
    /// Validate the --config file and the --fixtures catalog (or the built-in one)
    Validate,
    /// List or search curated sample questions
    Questions(QuestionsArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Question to ask
    pub question: String,

    /// Output the reply as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct MatchArgs {
    /// Free-text query
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct GraphArgs {
    /// Question whose pipeline is drawn
    pub question: String,

    /// Agent id whose lineage is highlighted
    #[arg(long)]
    pub hover: Option<String>,

    /// Milliseconds into playback (defaults to the end of the run)
    #[arg(long)]
    pub at_ms: Option<u64>,

    /// Output the visual graph as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct QuestionsArgs {
    /// Only questions for this database id
    #[arg(long)]
    pub db: Option<String>,

    /// Case-insensitive text to search in question and category
    #[arg(long)]
    pub search: Option<String>,
}
