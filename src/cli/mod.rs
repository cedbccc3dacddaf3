pub mod chat;
pub mod commands;
pub mod context;
pub mod graph;
pub mod matching;
pub mod questions;
pub mod run;
pub mod validate;

pub use commands::{Cli, Commands};
