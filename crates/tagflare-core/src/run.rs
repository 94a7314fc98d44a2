//! Run orchestration
//!
//! ```text
//! for each configured category (Category::ALL order):
//!     scan directory ─► candidates (category match, no labels)
//!     for each candidate:
//!         suggest ─► SuggestionBatch::parse ─► reconcile
//!             ─► persist vocabulary ─► write labels into the document
//! ```
//!
//! Every configured directory is checked before any document is touched, so
//! a typo in the second path cannot leave the first category half-labelled.

use crate::config::TagflareConfig;
use crate::error::TagflareResult;
use crate::report::{CategoryReport, NoticeKind, RunReport};
use std::path::{Path, PathBuf};
use tagflare_suggest::{LabelSuggester, SuggestionRequest};
use tagflare_taxonomy::{reconcile, Category, SuggestionBatch, Vocabulary};
use tagflare_vault::{ApplyOutcome, Document, DocumentRepository, VaultScan, VocabularyStore};

/// Candidates found in one category directory
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCandidates {
    /// Category searched
    pub category: Category,
    /// Directory searched
    pub directory: PathBuf,
    /// Unlabelled documents of the category
    pub documents: Vec<Document>,
}

/// Resolve configured sources, logging unrecognized keys, and check that
/// at least one is configured and every directory exists
async fn preflight(config: &TagflareConfig) -> TagflareResult<(Vec<(Category, PathBuf)>, Vec<String>)> {
    let resolved = config.require_sources()?;
    for key in &resolved.unrecognized {
        tracing::warn!(category = %key, "unrecognized category, skipping");
    }
    for (_, dir) in &resolved.categories {
        DocumentRepository::new(dir).ensure_exists().await?;
    }
    Ok((resolved.categories, resolved.unrecognized))
}

/// List unlabelled documents per configured category without suggesting
///
/// # Errors
/// - `TagflareError::Config` if no source is configured
/// - `TagflareError::Vault` if a directory is missing or unreadable
pub async fn list_candidates(config: &TagflareConfig) -> TagflareResult<Vec<CategoryCandidates>> {
    let (sources, _) = preflight(config).await?;

    let mut found = Vec::with_capacity(sources.len());
    for (category, directory) in sources {
        let documents = DocumentRepository::new(&directory)
            .find_candidates(category)
            .await?;
        found.push(CategoryCandidates {
            category,
            directory,
            documents,
        });
    }
    Ok(found)
}

/// Labels unlabelled documents using a suggestion collaborator
#[derive(Debug)]
pub struct Tagger<S> {
    config: TagflareConfig,
    store: VocabularyStore,
    suggester: S,
}

impl<S: LabelSuggester> Tagger<S> {
    /// Create tagger for `config`
    pub fn new(config: TagflareConfig, suggester: S) -> Self {
        let store = VocabularyStore::new(&config.vocabulary_path);
        Self {
            config,
            store,
            suggester,
        }
    }

    /// Process every configured category
    ///
    /// Labels written before a fatal error stay written and the vocabulary
    /// file reflects every document processed up to that point.
    ///
    /// # Errors
    /// - `TagflareError::Config` if no source is configured
    /// - `TagflareError::Vault` if a directory is missing, or the vocabulary
    ///   or a document cannot be read or written
    /// - `TagflareError::Suggest` if the collaborator fails
    pub async fn run(&self) -> TagflareResult<RunReport> {
        let (sources, unrecognized) = preflight(&self.config).await?;
        tracing::info!(
            categories = sources.len(),
            suggester = self.suggester.name(),
            "starting run"
        );

        let mut report = RunReport {
            unrecognized_sources: unrecognized,
            ..RunReport::default()
        };
        for (category, directory) in sources {
            let entry = self.process_category(category, &directory).await?;
            report.categories.push(entry);
        }

        report.vocabulary_size = self.store.load().await?.len();
        tracing::info!(
            labelled = report.labelled(),
            vocabulary = report.vocabulary_size,
            "run complete"
        );
        Ok(report)
    }

    /// Process one category directory
    ///
    /// # Errors
    /// See [`Tagger::run`].
    pub async fn process_category(
        &self,
        category: Category,
        directory: &Path,
    ) -> TagflareResult<CategoryReport> {
        let repo = DocumentRepository::new(directory);
        let scan = repo.scan().await?;
        let mut report = CategoryReport::new(category, directory);
        record_scan(&mut report, &scan);

        if scan.documents.is_empty() {
            tracing::info!(%category, directory = %directory.display(), "no valid files found");
            return Ok(report);
        }

        let candidates: Vec<&Document> = scan.candidates(category).collect();
        report.stats.candidates = candidates.len();
        tracing::info!(%category, count = candidates.len(), "found documents with empty labels");

        let mut vocabulary = self.store.load().await?;
        for doc in candidates {
            vocabulary = self
                .process_document(&repo, &scan, doc, category, vocabulary, &mut report)
                .await?;
        }
        Ok(report)
    }

    async fn process_document(
        &self,
        repo: &DocumentRepository,
        scan: &VaultScan,
        doc: &Document,
        category: Category,
        vocabulary: Vocabulary,
        report: &mut CategoryReport,
    ) -> TagflareResult<Vocabulary> {
        let file = doc.file_name();
        tracing::info!(%file, "working on file");

        let missing = doc.missing_fields();
        if !missing.is_empty() {
            let message = format!("missing {}", missing.join(", "));
            tracing::warn!(%file, missing = ?missing, "skipping document");
            report.stats.skipped += 1;
            report.notice(&doc.path, NoticeKind::MissingFields, message);
            return Ok(vocabulary);
        }

        let request = SuggestionRequest {
            content: doc.content.clone(),
            title: doc.title.clone().unwrap_or_default(),
            category,
            vocabulary,
        };
        let raw = self.suggester.suggest(&request).await?;

        let batch = SuggestionBatch::parse(&raw);
        let outcome = reconcile(&batch, &request.vocabulary, self.config.budget());
        self.store.save(&outcome.vocabulary).await?;
        report.stats.labels_remembered += outcome.remembered();

        if outcome.applied.is_empty() {
            tracing::warn!(%file, "no tags found for the file");
            report.stats.empty_suggestions += 1;
            report.notice(&doc.path, NoticeKind::EmptySuggestion, "no labels suggested");
            return Ok(outcome.vocabulary);
        }
        tracing::info!(%file, tags = %outcome.applied_strs().join(", "), "tags generated");

        let Some(uid) = doc.uid.as_deref() else {
            tracing::warn!(%file, "document has no uid, labels not written");
            report.stats.write_misses += 1;
            report.notice(&doc.path, NoticeKind::WriteMiss, "document has no uid");
            return Ok(outcome.vocabulary);
        };

        match repo.apply_indexed(&scan.index, uid, &outcome.applied).await? {
            ApplyOutcome::Applied { .. } => {
                report.stats.labelled += 1;
                report.stats.labels_applied += outcome.applied.len();
            }
            ApplyOutcome::UnknownUid => {
                report.stats.write_misses += 1;
                report.notice(&doc.path, NoticeKind::WriteMiss, format!("no document with uid {uid}"));
            }
            ApplyOutcome::NoLabelMarker { path, reason } => {
                report.stats.write_misses += 1;
                report.notice(path, NoticeKind::WriteMiss, reason.to_string());
            }
        }
        Ok(outcome.vocabulary)
    }
}

fn record_scan(report: &mut CategoryReport, scan: &VaultScan) {
    report.stats.documents = scan.documents.len();
    report.stats.rejected = scan.rejected.len();
    for rejected in &scan.rejected {
        report.notice(&rejected.path, NoticeKind::Malformed, rejected.reason.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TagflareError;
    use async_trait::async_trait;
    use mockall::{mock, Sequence};
    use pretty_assertions::assert_eq;
    use tagflare_suggest::{SuggestError, SuggestResult};
    use tagflare_test_utils::{vocabulary, DocSpec, VaultFixture};

    mock! {
        Suggester {}

        #[async_trait]
        impl LabelSuggester for Suggester {
            async fn suggest(&self, request: &SuggestionRequest) -> SuggestResult<String>;
        }
    }

    fn config_for(vault: &VaultFixture) -> TagflareConfig {
        TagflareConfig::new()
            .with_vocabulary_path(vault.vocabulary_path())
            .with_source(Category::DigitalGarden, vault.category_dir(Category::DigitalGarden))
            .with_source(Category::VisualFiction, vault.category_dir(Category::VisualFiction))
    }

    #[tokio::test]
    async fn failure_keeps_earlier_labels() {
        let vault = VaultFixture::new();
        let garden = Category::DigitalGarden;
        vault.write(garden, "a.md", &DocSpec::new("a", garden));
        vault.write(garden, "b.md", &DocSpec::new("b", garden));

        let mut seq = Sequence::new();
        let mut mock = MockSuggester::new();
        mock.expect_suggest()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Loss, Memory".to_string()));
        mock.expect_suggest()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(SuggestError::Backend("rate limited".to_string())));

        let err = Tagger::new(config_for(&vault), mock).run().await.unwrap_err();
        assert!(matches!(err, TagflareError::Suggest(SuggestError::Backend(_))));

        let labelled: Vec<_> = ["a.md", "b.md"]
            .into_iter()
            .filter(|f| vault.read(garden, f).contains("- Loss"))
            .collect();
        assert_eq!(labelled.len(), 1);

        let saved = VocabularyStore::new(vault.vocabulary_path()).load().await.unwrap();
        assert_eq!(saved, vocabulary(&["Loss", "Memory"]));
    }

    #[tokio::test]
    async fn missing_directory_touches_nothing() {
        let vault = VaultFixture::new();
        let garden = Category::DigitalGarden;
        vault.write(garden, "a.md", &DocSpec::new("a", garden));
        let before = vault.read(garden, "a.md");

        let config = config_for(&vault)
            .with_source(Category::VisualFiction, vault.root().join("nowhere"));
        let mut mock = MockSuggester::new();
        mock.expect_suggest().never();

        let err = Tagger::new(config, mock).run().await.unwrap_err();
        assert!(matches!(
            err,
            TagflareError::Vault(tagflare_vault::VaultError::MissingDirectory { .. })
        ));
        assert_eq!(vault.read(garden, "a.md"), before);
    }

    #[tokio::test]
    async fn run_without_sources_is_a_config_error() {
        let vault = VaultFixture::new();
        let config = TagflareConfig::new().with_vocabulary_path(vault.vocabulary_path());
        let mut mock = MockSuggester::new();
        mock.expect_suggest().never();

        let err = Tagger::new(config, mock).run().await.unwrap_err();
        assert!(matches!(err, TagflareError::Config(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!vault.vocabulary_path().exists());
    }

    #[tokio::test]
    async fn skipped_document_is_not_sent() {
        let vault = VaultFixture::new();
        let fiction = Category::VisualFiction;
        vault.write(fiction, "untitled.md", &DocSpec::new("u", fiction).without_title());

        let mut mock = MockSuggester::new();
        mock.expect_suggest().never();

        let report = Tagger::new(config_for(&vault), mock).run().await.unwrap();
        let entry = report.category(fiction).unwrap();
        assert_eq!(entry.stats.candidates, 1);
        assert_eq!(entry.stats.skipped, 1);
        assert_eq!(entry.notices[0].kind, NoticeKind::MissingFields);
        assert_eq!(entry.notices[0].message, "missing title");
    }

    #[tokio::test]
    async fn list_candidates_reports_per_category() {
        let vault = VaultFixture::new();
        vault.write(Category::DigitalGarden, "a.md", &DocSpec::new("a", Category::DigitalGarden));
        vault.write(
            Category::DigitalGarden,
            "b.md",
            &DocSpec::new("b", Category::DigitalGarden).with_labels(&["Hope"]),
        );

        let found = list_candidates(&config_for(&vault)).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].category, Category::DigitalGarden);
        assert_eq!(found[0].documents.len(), 1);
        assert_eq!(found[0].documents[0].uid.as_deref(), Some("a"));
        assert!(found[1].documents.is_empty());
    }
}
