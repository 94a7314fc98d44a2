//! Error types for a TagFlare run

use std::path::PathBuf;
use tagflare_suggest::SuggestError;
use tagflare_vault::VaultError;

/// Errors that stop a run
///
/// Per-document problems (missing fields, empty suggestions, write-back
/// misses) never surface here; they are counted in the
/// [`RunReport`](crate::RunReport).
#[derive(Debug, thiserror::Error)]
pub enum TagflareError {
    /// Configuration could not be read or is unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML for [`TagflareConfig`](crate::TagflareConfig)
    #[error("invalid configuration{}: {source}", .path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    ConfigParse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    /// Vault or vocabulary storage failed
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Suggestion collaborator failed
    #[error(transparent)]
    Suggest(#[from] SuggestError),
}

impl TagflareError {
    /// Process exit code for this error
    ///
    /// `2` for problems the user fixes in configuration (bad config, missing
    /// directory, missing API key), `1` for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::Vault(VaultError::MissingDirectory { .. })
            | Self::Suggest(SuggestError::MissingApiKey { .. }) => 2,
            Self::Vault(_) | Self::Suggest(_) => 1,
        }
    }
}

/// Result type alias for run operations
pub type TagflareResult<T> = Result<T, TagflareError>;
