//! Error types for the vault
//!
//! Two levels:
//! - [`VaultError`]: fails the whole operation (missing directory, I/O on
//!   the vocabulary file, a failed write-back)
//! - [`DocumentError`]: a single file could not be read as a document; the
//!   file is reported and skipped

use std::path::PathBuf;

/// Errors that abort a vault operation
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Configured source directory does not exist
    #[error("the directory {} does not exist, please check the path", .path.display())]
    MissingDirectory { path: PathBuf },

    /// IO error on a vault path
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Vocabulary file is not valid JSON of the expected shape
    #[error("invalid vocabulary file {}: {source}", .path.display())]
    VocabularyFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl VaultError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create missing directory error
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }
}

/// Reasons a single file is not a usable document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// File does not start with a `---` line
    #[error("no front matter found")]
    NoFrontMatter,

    /// Opening `---` without a closing one
    #[error("front matter is not terminated")]
    Unterminated,

    /// Front matter is not valid YAML
    #[error("invalid front matter: {0}")]
    InvalidYaml(String),

    /// Front matter parsed to something other than a mapping
    #[error("front matter is not a mapping")]
    NotAMapping,

    /// File could not be read as UTF-8 text
    #[error("unreadable: {0}")]
    Unreadable(String),
}

/// Reasons a write-back could not place labels in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    /// Document has no front matter block
    #[error("document has no front matter")]
    NoFrontMatter,

    /// Front matter has no `post_tag:` line
    #[error("no label marker found in front matter")]
    NoLabelMarker,
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
