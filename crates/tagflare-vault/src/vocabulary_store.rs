//! Persisted tag vocabulary
//!
//! The vocabulary lives in one JSON file, `{"tags": [...]}`, read whole and
//! rewritten whole. There is no locking and no atomic rename.

use crate::error::{VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tagflare_taxonomy::Vocabulary;

/// Default vocabulary file name
pub const DEFAULT_VOCABULARY_FILE: &str = "tags.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct VocabularyFile {
    tags: Vocabulary,
}

/// File-backed vocabulary
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    path: PathBuf,
}

impl Default for VocabularyStore {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY_FILE)
    }
}

impl VocabularyStore {
    /// Create store backed by `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the vocabulary, creating an empty file first if none exists
    ///
    /// # Errors
    /// - `VaultError::Io` if the file cannot be read or created
    /// - `VaultError::VocabularyFormat` if the file is not `{"tags": [...]}`
    pub async fn load(&self) -> VaultResult<Vocabulary> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| VaultError::io_error(&self.path, e))?;
        if !exists {
            tracing::info!(path = %self.path.display(), "creating empty vocabulary file");
            let empty = Vocabulary::new();
            self.save(&empty).await?;
            return Ok(empty);
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| VaultError::io_error(&self.path, e))?;
        let file: VocabularyFile =
            serde_json::from_slice(&bytes).map_err(|source| VaultError::VocabularyFormat {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), labels = file.tags.len(), "loaded vocabulary");
        Ok(file.tags)
    }

    /// Overwrite the file with `vocabulary`
    ///
    /// # Errors
    /// `VaultError::Io` if the file cannot be written.
    pub async fn save(&self, vocabulary: &Vocabulary) -> VaultResult<()> {
        let file = VocabularyFile {
            tags: vocabulary.clone(),
        };
        let mut bytes =
            serde_json::to_vec_pretty(&file).map_err(|source| VaultError::VocabularyFormat {
                path: self.path.clone(),
                source,
            })?;
        bytes.push(b'\n');

        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| VaultError::io_error(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagflare_taxonomy::Label;

    #[tokio::test]
    async fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabularyStore::new(dir.path().join("tags.json"));

        let vocabulary = store.load().await.unwrap();

        assert!(vocabulary.is_empty());
        let written = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json, serde_json::json!({ "tags": [] }));
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabularyStore::new(dir.path().join("tags.json"));

        let mut vocabulary = Vocabulary::new();
        vocabulary.insert(Label::verbatim("Belief"));
        vocabulary.insert(Label::verbatim("Solitude"));
        store.save(&vocabulary).await.unwrap();

        assert_eq!(store.load().await.unwrap(), vocabulary);
    }

    #[tokio::test]
    async fn reads_compact_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, r#"{"tags": ["Loss", "Hope", "Loss"]}"#).unwrap();

        let vocabulary = VocabularyStore::new(&path).load().await.unwrap();

        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.contains_str("Hope"));
    }

    #[tokio::test]
    async fn rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, r#"["Loss"]"#).unwrap();

        let err = VocabularyStore::new(&path).load().await.unwrap_err();

        assert!(matches!(err, VaultError::VocabularyFormat { .. }));
    }
}
