use super::types::NablonError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Whether the message is safe to show verbatim in the chat transcript.
    /// Demo flows never surface internal failures to the user.
    pub user_facing: bool,
}

impl NablonError {
    /// Classify this error to determine its type and whether it can be shown to the user.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            NablonError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInputError",
                user_facing: true,
            },
            NablonError::Cancelled(_) => ErrorClassification {
                error_type: "CancelledError",
                user_facing: true,
            },
            NablonError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                user_facing: false,
            },
            NablonError::Fixture(_) => ErrorClassification {
                error_type: "FixtureError",
                user_facing: false,
            },
            NablonError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                user_facing: false,
            },
            NablonError::Readline(_) => ErrorClassification {
                error_type: "ReadlineError",
                user_facing: false,
            },
            NablonError::Io(_) => ErrorClassification {
                error_type: "IoError",
                user_facing: false,
            },
            NablonError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                user_facing: false,
            },
            NablonError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                user_facing: false,
            },
        }
    }
}
