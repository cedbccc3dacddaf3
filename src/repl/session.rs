use std::sync::Arc;

use console::style;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use tokio::sync::mpsc;
use tracing::error;

use crate::chat::{pipeline_for, ChatEngine};
use crate::config::NablonConfig;
use crate::errors::NablonError;
use crate::fixtures::Catalog;
use crate::graph::{map_to_visual, GraphDefinition};
use crate::repl::banner;
use crate::repl::commands::{self, ReplInput, SlashCommand};
use crate::repl::completer::ReplHelper;
use crate::repl::progress::{ask_with_progress, PlaybackProgress};
use crate::repl::renderer;
use crate::sequencer::PlaybackEvent;

/// Interactive chat over the fixture catalog.
pub struct ReplSession {
    engine: ChatEngine,
    progress_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
    /// Query of the most recent turn, for /graph.
    last_query: Option<String>,
}

impl ReplSession {
    pub fn new(catalog: Arc<Catalog>, config: &NablonConfig) -> Self {
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let engine = ChatEngine::from_config(catalog, config).with_event_channel(progress_tx);
        Self {
            engine,
            progress_rx,
            last_query: None,
        }
    }

    pub async fn run(mut self) -> Result<(), NablonError> {
        banner::show_banner(self.engine.catalog());

        let config = Config::builder().auto_add_history(true).build();
        let mut editor = Editor::with_config(config)
            .map_err(|e| NablonError::Readline(format!("Failed to initialize REPL: {}", e)))?;
        editor.set_helper(Some(ReplHelper::from_catalog(self.engine.catalog())));

        loop {
            let readline = {
                // rustyline is blocking, so use spawn_blocking
                let result = tokio::task::spawn_blocking(move || {
                    let term_w = console::Term::stdout().size().1 as usize;
                    let sep = format!("{}", style("─".repeat(term_w)).dim());
                    let prompt = format!("{}\n{} ", sep, style("nablon>").cyan().bold());
                    let result = editor.readline(&prompt);
                    (editor, result)
                })
                .await
                .map_err(|e| NablonError::Internal(format!("Readline task failed: {}", e)))?;

                editor = result.0;
                result.1
            };

            match readline {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match commands::parse_input(trimmed) {
                        Ok(ReplInput::Ask(query)) => self.ask(&query).await,
                        Ok(ReplInput::Command(cmd)) => {
                            if self.handle_command(cmd).await {
                                break;
                            }
                        }
                        Err(msg) => println!("{}", renderer::render_error(&msg)),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    println!("{}", renderer::render_error(&format!("Input error: {}", err)));
                    break;
                }
            }
        }

        println!("{}", renderer::render_info("Goodbye."));
        Ok(())
    }

    async fn ask(&mut self, query: &str) {
        let mut progress = PlaybackProgress::new();
        let result = ask_with_progress(&mut self.engine, &mut self.progress_rx, query, &mut progress).await;

        match result {
            Ok(reply) => {
                self.last_query = Some(query.to_string());
                println!("{}", renderer::render_reply(&reply));
            }
            Err(e) => {
                let classified = e.classify();
                if classified.user_facing {
                    println!("{}", renderer::render_error(&e.to_string()));
                } else {
                    error!(error_type = classified.error_type, error = %e, "Chat turn failed");
                    println!("{}", renderer::render_error("Something went wrong answering that question."));
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Quit => return true,

            SlashCommand::Clear => {
                self.engine.clear_history().await;
                self.last_query = None;
                print!("\x1B[2J\x1B[1;1H");
                println!("{}", renderer::render_success("History cleared."));
            }

            SlashCommand::New => {
                let session = self.engine.new_session();
                println!("{}", renderer::render_success(&format!("Started session {}", session.id)));
            }

            SlashCommand::Sessions => {
                println!(
                    "{}",
                    renderer::render_sessions(self.engine.sessions(), self.engine.active_session())
                );
            }

            SlashCommand::Status => {
                let tracker = self.engine.tracker().read().await;
                println!(
                    "{}",
                    renderer::render_execution(tracker.state(), tracker.current_agent(), tracker.steps())
                );
            }

            SlashCommand::Graph { hover } => {
                let Some(query) = &self.last_query else {
                    println!("{}", renderer::render_info("Ask a question first."));
                    return false;
                };
                let (script, _) = self.engine.resolve(query);
                let plan = pipeline_for(&script, query);
                let graph = GraphDefinition::from_agents(&plan.agents, &script.edges);
                let state = self.engine.tracker().snapshot().await;
                let visual = map_to_visual(&state, &graph, hover.as_deref());
                println!("{}", renderer::render_visual_graph(&visual));
            }

            SlashCommand::Questions { database, search } => {
                let catalog = self.engine.catalog();
                let found = match &search {
                    Some(text) => catalog.search(text, database.as_deref()),
                    None => catalog.questions_for(database.as_deref()),
                };
                println!("{}", renderer::render_questions(&found));
            }

            SlashCommand::Version => println!("{}", renderer::render_version()),

            SlashCommand::Help { command } => {
                println!("{}", renderer::render_help(command.as_deref()));
            }
        }
        false
    }
}
