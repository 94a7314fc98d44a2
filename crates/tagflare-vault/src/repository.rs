//! Document repository over one vault directory
//!
//! A scan reads every `.md` file in the directory once and yields:
//! - the parsed documents, sorted by path
//! - the files that could not be parsed, with the reason
//! - a `uid → path` index used to target write-back

use crate::document::{is_document_path, Document};
use crate::error::{DocumentError, InsertError, VaultError, VaultResult};
use crate::writeback::insert_labels;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tagflare_taxonomy::{Category, Label};

/// A file that was skipped during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    /// Path of the skipped file
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: DocumentError,
}

/// Index from document uid to the first file carrying it
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    by_uid: HashMap<String, PathBuf>,
    duplicates: usize,
}

impl DocumentIndex {
    /// Build an index; later documents repeating a uid are ignored
    #[must_use]
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut index = Self::default();
        for doc in documents {
            let Some(uid) = doc.uid.as_deref() else {
                continue;
            };
            if let Some(first) = index.by_uid.get(uid) {
                tracing::warn!(
                    uid,
                    first = %first.display(),
                    duplicate = %doc.path.display(),
                    "duplicate uid, write-back targets the first file only"
                );
                index.duplicates += 1;
                continue;
            }
            index.by_uid.insert(uid.to_string(), doc.path.clone());
        }
        index
    }

    /// File carrying `uid`
    #[inline]
    #[must_use]
    pub fn get(&self, uid: &str) -> Option<&Path> {
        self.by_uid.get(uid).map(PathBuf::as_path)
    }

    /// Number of indexed uids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_uid.len()
    }

    /// True when no document carries a uid
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }

    /// Number of documents whose uid was already taken
    #[inline]
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Result of scanning a vault directory
#[derive(Debug, Clone, Default)]
pub struct VaultScan {
    /// Parsed documents in enumeration order
    pub documents: Vec<Document>,
    /// Files skipped as malformed
    pub rejected: Vec<RejectedFile>,
    /// uid index over `documents`
    pub index: DocumentIndex,
}

impl VaultScan {
    /// Documents of `category` whose label collection is absent or empty
    pub fn candidates(&self, category: Category) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(move |doc| doc.is_in(category) && doc.is_unlabelled())
    }
}

/// Outcome of a write-back request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Labels were written to `path`
    Applied { path: PathBuf },
    /// No document carries the uid
    UnknownUid,
    /// The document carrying the uid has no usable label marker
    NoLabelMarker { path: PathBuf, reason: InsertError },
}

impl ApplyOutcome {
    /// True when the file was written
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Documents stored as `.md` files in one directory
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    root: PathBuf,
}

impl DocumentRepository {
    /// Create repository over `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the documents
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail unless the directory exists
    ///
    /// # Errors
    /// `VaultError::MissingDirectory` when `root` is not a directory.
    pub async fn ensure_exists(&self) -> VaultResult<()> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(VaultError::missing_directory(&self.root)),
        }
    }

    /// Read and parse every document in the directory
    ///
    /// Malformed files are logged and collected in [`VaultScan::rejected`].
    ///
    /// # Errors
    /// - `VaultError::MissingDirectory` if the directory does not exist
    /// - `VaultError::Io` if the directory cannot be listed
    pub async fn scan(&self) -> VaultResult<VaultScan> {
        self.ensure_exists().await?;

        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| VaultError::io_error(&self.root, e))?;

        let mut scan = VaultScan::default();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| VaultError::io_error(&self.root, e))?
        {
            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file || !is_document_path(&path) {
                continue;
            }

            match read_document(&path).await {
                Ok(doc) => scan.documents.push(doc),
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "skipping malformed document");
                    scan.rejected.push(RejectedFile { path, reason });
                }
            }
        }

        scan.documents.sort_by(|a, b| a.path.cmp(&b.path));
        scan.rejected.sort_by(|a, b| a.path.cmp(&b.path));
        scan.index = DocumentIndex::build(&scan.documents);
        tracing::debug!(
            root = %self.root.display(),
            documents = scan.documents.len(),
            rejected = scan.rejected.len(),
            "scanned vault directory"
        );
        Ok(scan)
    }

    /// Documents of `category` whose label collection is absent or empty
    ///
    /// # Errors
    /// See [`DocumentRepository::scan`].
    pub async fn find_candidates(&self, category: Category) -> VaultResult<Vec<Document>> {
        let scan = self.scan().await?;
        Ok(scan.candidates(category).cloned().collect())
    }

    /// Insert `labels` into the document carrying `uid`, rescanning the
    /// directory to find it
    ///
    /// # Errors
    /// See [`DocumentRepository::scan`] and [`DocumentRepository::apply_indexed`].
    pub async fn apply_labels(&self, uid: &str, labels: &[Label]) -> VaultResult<ApplyOutcome> {
        let scan = self.scan().await?;
        self.apply_indexed(&scan.index, uid, labels).await
    }

    /// Insert `labels` into the document `index` maps `uid` to
    ///
    /// The file is re-read before editing so earlier write-backs in the same
    /// run are kept.
    ///
    /// # Errors
    /// `VaultError::Io` if the document cannot be read or written.
    pub async fn apply_indexed(
        &self,
        index: &DocumentIndex,
        uid: &str,
        labels: &[Label],
    ) -> VaultResult<ApplyOutcome> {
        let Some(path) = index.get(uid) else {
            tracing::warn!(uid, "no document with matching uid");
            return Ok(ApplyOutcome::UnknownUid);
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| VaultError::io_error(path, e))?;

        let updated = match insert_labels(&text, labels) {
            Ok(updated) => updated,
            Err(reason) => {
                tracing::warn!(uid, path = %path.display(), %reason, "labels not written");
                return Ok(ApplyOutcome::NoLabelMarker {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        };

        tokio::fs::write(path, updated)
            .await
            .map_err(|e| VaultError::io_error(path, e))?;

        tracing::info!(uid, path = %path.display(), count = labels.len(), "updated labels");
        Ok(ApplyOutcome::Applied {
            path: path.to_path_buf(),
        })
    }
}

async fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DocumentError::Unreadable(e.to_string()))?;
    Document::parse(path, &text)
}
