pub mod agents;
pub mod chat;
pub mod cli;
pub mod config;
pub mod errors;
pub mod execution;
pub mod fixtures;
pub mod graph;
pub mod intent;
pub mod repl;
pub mod sequencer;
pub mod utils;
