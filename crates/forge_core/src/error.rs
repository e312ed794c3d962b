use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Error caused by the caller's data (e.g. a quiz without questions).
    UserError,
    /// Error from the text-generation provider.
    ProviderError,
    /// Network connectivity or timeout issue.
    NetworkError,
    /// Internal system error (file I/O, serialization, etc.).
    SystemError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl ForgeError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::ConfigError,
            Self::InvalidInput(_) => ErrorCategory::UserError,
            Self::AiProvider(_) => ErrorCategory::ProviderError,
            Self::Network(_) => ErrorCategory::NetworkError,
            Self::FileSystem(_) => ErrorCategory::SystemError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Configuration issue: {msg}"),
            Self::InvalidInput(msg) => format!("Invalid input: {msg}"),
            Self::AiProvider(msg) => format!("AI service error: {msg}"),
            Self::Network(_) => "Network error. Check your connection.".into(),
            Self::FileSystem(msg) => format!("File error: {msg}"),
        }
    }

    /// Process exit code for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::ConfigError => 3,
            ErrorCategory::ProviderError | ErrorCategory::NetworkError => 4,
            ErrorCategory::SystemError => 1,
        }
    }
}
