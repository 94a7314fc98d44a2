//! Error types for label suggestion
//!
//! Any of these aborts the run: suggestion failures are not retried.

/// Errors from the suggestion collaborator
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// API key environment variable is not set
    #[error("environment variable {var} is not set")]
    MissingApiKey { var: String },

    /// Transport-level failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("suggestion service failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// Service answered without any completion choice
    #[error("suggestion service returned no choices")]
    NoChoices,

    /// Backend-specific failure
    #[error("suggestion failed: {0}")]
    Backend(String),
}

impl SuggestError {
    /// Create missing API key error
    pub fn missing_api_key(var: impl Into<String>) -> Self {
        Self::MissingApiKey { var: var.into() }
    }
}

/// Result type alias for suggestion operations
pub type SuggestResult<T> = Result<T, SuggestError>;
