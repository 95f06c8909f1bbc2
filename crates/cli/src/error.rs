use thiserror::Error;
use trellis_core::CoreError;

/// Error types for the Trellis CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// Error raised by the core library
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A flag or environment variable with an unusable value
    #[error("Invalid value for {name}: {message}")]
    InvalidArgument { name: String, message: String },

    /// Error encoding JSON output
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
