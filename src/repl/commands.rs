/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplInput {
    /// Free text, asked as a question.
    Ask(String),
    Command(SlashCommand),
}

/// All slash commands supported by the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    /// Reset execution state and discard every session.
    Clear,
    New,
    Sessions,
    Status,
    Graph {
        hover: Option<String>,
    },
    Questions {
        database: Option<String>,
        search: Option<String>,
    },
    Version,
    Help {
        command: Option<String>,
    },
    Quit,
}

/// Description of a command for help display.
pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "clear",
        usage: "/clear",
        description: "Clear chat history and reset the agent graph",
    },
    CommandHelp {
        name: "new",
        usage: "/new",
        description: "Start a new chat session",
    },
    CommandHelp {
        name: "sessions",
        usage: "/sessions",
        description: "List chat sessions",
    },
    CommandHelp {
        name: "status",
        usage: "/status",
        description: "Show agent execution state and the step log of the last turn",
    },
    CommandHelp {
        name: "graph",
        usage: "/graph [--hover <agent>]",
        description: "Draw the agent graph of the last turn, optionally highlighting one agent's lineage",
    },
    CommandHelp {
        name: "questions",
        usage: "/questions [--db <id>] [text]",
        description: "List or search curated sample questions",
    },
    CommandHelp {
        name: "version",
        usage: "/version",
        description: "Show version and build info",
    },
    CommandHelp {
        name: "help",
        usage: "/help [command]",
        description: "Show help for all or a specific command",
    },
    CommandHelp {
        name: "quit",
        usage: "/quit",
        description: "Quit the REPL",
    },
];

/// All command names for tab completion.
pub static COMMAND_NAMES: &[&str] = &[
    "/clear",
    "/new",
    "/sessions",
    "/status",
    "/graph",
    "/questions",
    "/version",
    "/help",
    "/quit",
];

/// Classify a non-empty input line: slash commands are parsed, anything
/// else is a question.
pub fn parse_input(input: &str) -> Result<ReplInput, String> {
    let input = input.trim();
    if input.starts_with('/') {
        parse_command(input).map(ReplInput::Command)
    } else {
        Ok(ReplInput::Ask(input.to_string()))
    }
}

/// Parse a raw input line into a SlashCommand, or return an error message.
pub fn parse_command(input: &str) -> Result<SlashCommand, String> {
    let parts: Vec<&str> = input.trim().split_whitespace().collect();
    let Some((&cmd, args)) = parts.split_first() else {
        return Err("Empty command".into());
    };

    match cmd {
        "/clear" => Ok(SlashCommand::Clear),
        "/new" => Ok(SlashCommand::New),
        "/sessions" => Ok(SlashCommand::Sessions),
        "/status" => Ok(SlashCommand::Status),
        "/graph" => parse_graph(args),
        "/questions" => parse_questions(args),
        "/version" => Ok(SlashCommand::Version),
        "/help" => Ok(SlashCommand::Help {
            command: args.first().map(|s| s.trim_start_matches('/').to_string()),
        }),
        "/quit" | "/exit" | "/q" => Ok(SlashCommand::Quit),
        other => Err(format!("Unknown command: {}. Type /help for available commands.", other)),
    }
}

fn parse_graph(args: &[&str]) -> Result<SlashCommand, String> {
    let mut hover = None;
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--hover" => {
                i += 1;
                hover = Some(
                    args.get(i)
                        .ok_or_else(|| "--hover needs an agent id".to_string())?
                        .to_string(),
                );
            }
            other => {
                return Err(format!("Unknown flag for /graph: {}", other));
            }
        }
        i += 1;
    }
    Ok(SlashCommand::Graph { hover })
}

fn parse_questions(args: &[&str]) -> Result<SlashCommand, String> {
    let mut database = None;
    let mut words = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--db" => {
                i += 1;
                database = Some(
                    args.get(i)
                        .ok_or_else(|| "--db needs a database id".to_string())?
                        .to_string(),
                );
            }
            word => words.push(word),
        }
        i += 1;
    }
    let search = if words.is_empty() { None } else { Some(words.join(" ")) };
    Ok(SlashCommand::Questions { database, search })
}
