use thiserror::Error;

#[derive(Debug, Error)]
pub enum NablonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Readline error: {0}")]
    Readline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NablonError {
    /// Process exit code for this error when it ends a CLI command.
    pub fn exit_code(&self) -> i32 {
        match self {
            NablonError::Config(_) | NablonError::Yaml(_) => 2,
            NablonError::Fixture(_) | NablonError::Json(_) => 3,
            NablonError::InvalidInput(_) => 4,
            _ => 1,
        }
    }
}
