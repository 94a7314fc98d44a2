//! Run reporting
//!
//! Counters are kept per category; document-level problems are listed as
//! [`Notice`]s so a run never has to stop for them.

use serde::Serialize;
use std::path::PathBuf;
use tagflare_taxonomy::Category;

/// Why a document was not labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Front matter could not be parsed
    Malformed,
    /// Content, title or category is absent
    MissingFields,
    /// The collaborator suggested nothing usable
    EmptySuggestion,
    /// No document carries the uid, or the document has no label marker
    WriteMiss,
}

/// A document-level problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Affected file
    pub path: PathBuf,
    /// Problem class
    pub kind: NoticeKind,
    /// Human-readable detail
    pub message: String,
}

/// Counters for one category pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Parsed documents in the directory
    pub documents: usize,
    /// Files rejected as malformed
    pub rejected: usize,
    /// Unlabelled documents of the category
    pub candidates: usize,
    /// Documents that received labels
    pub labelled: usize,
    /// Candidates skipped for missing fields
    pub skipped: usize,
    /// Candidates whose suggestion produced no labels
    pub empty_suggestions: usize,
    /// Labels computed but not written
    pub write_misses: usize,
    /// Labels written across all documents
    pub labels_applied: usize,
    /// Labels added to the vocabulary
    pub labels_remembered: usize,
}

/// Outcome of one category pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// Category processed
    pub category: Category,
    /// Source directory
    pub directory: PathBuf,
    /// Counters
    pub stats: CategoryStats,
    /// Document-level problems, in processing order
    pub notices: Vec<Notice>,
}

impl CategoryReport {
    /// Empty report for a pass over `directory`
    #[must_use]
    pub fn new(category: Category, directory: impl Into<PathBuf>) -> Self {
        Self {
            category,
            directory: directory.into(),
            stats: CategoryStats::default(),
            notices: Vec::new(),
        }
    }

    pub(crate) fn notice(&mut self, path: impl Into<PathBuf>, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice {
            path: path.into(),
            kind,
            message: message.into(),
        });
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// One entry per processed category, in processing order
    pub categories: Vec<CategoryReport>,
    /// Configured source keys that name no known category
    pub unrecognized_sources: Vec<String>,
    /// Vocabulary size at the end of the run
    pub vocabulary_size: usize,
}

impl RunReport {
    /// Report for `category`, if it was processed
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Documents labelled across all categories
    #[must_use]
    pub fn labelled(&self) -> usize {
        self.categories.iter().map(|c| c.stats.labelled).sum()
    }

    /// All notices across categories
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.categories.iter().flat_map(|c| c.notices.iter())
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== TagFlare Run Report ===\n");
        for entry in &self.categories {
            let stats = &entry.stats;
            report.push_str(&format!(
                "\n[{}] {}\n",
                entry.category,
                entry.directory.display()
            ));
            report.push_str(&format!("Documents: {} ({} rejected)\n", stats.documents, stats.rejected));
            report.push_str(&format!("Candidates: {}\n", stats.candidates));
            report.push_str(&format!("Labelled: {}\n", stats.labelled));
            report.push_str(&format!("Skipped (missing fields): {}\n", stats.skipped));
            report.push_str(&format!("Empty suggestions: {}\n", stats.empty_suggestions));
            report.push_str(&format!("Write misses: {}\n", stats.write_misses));
            report.push_str(&format!("Labels applied: {}\n", stats.labels_applied));
            report.push_str(&format!("New labels remembered: {}\n", stats.labels_remembered));
        }

        if !self.unrecognized_sources.is_empty() {
            report.push_str(&format!(
                "\nUnrecognized categories skipped: {}\n",
                self.unrecognized_sources.join(", ")
            ));
        }

        let notices: Vec<_> = self.notices().collect();
        if !notices.is_empty() {
            report.push_str("\n=== Notices ===\n");
            for (i, notice) in notices.iter().enumerate() {
                report.push_str(&format!(
                    "{}. {}: {}\n",
                    i + 1,
                    notice.path.display(),
                    notice.message
                ));
            }
        }

        report.push_str(&format!("\nVocabulary size: {}\n", self.vocabulary_size));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> RunReport {
        let mut garden = CategoryReport::new(Category::DigitalGarden, "garden");
        garden.stats = CategoryStats {
            documents: 3,
            rejected: 1,
            candidates: 2,
            labelled: 1,
            skipped: 1,
            labels_applied: 3,
            labels_remembered: 2,
            ..CategoryStats::default()
        };
        garden.notice("garden/b.md", NoticeKind::MissingFields, "missing title");

        RunReport {
            categories: vec![garden],
            unrecognized_sources: vec!["Poetry".to_string()],
            vocabulary_size: 5,
        }
    }

    #[test]
    fn text_report() {
        assert_eq!(
            sample().generate_text(),
            "=== TagFlare Run Report ===\n\
             \n\
             [Digital Garden] garden\n\
             Documents: 3 (1 rejected)\n\
             Candidates: 2\n\
             Labelled: 1\n\
             Skipped (missing fields): 1\n\
             Empty suggestions: 0\n\
             Write misses: 0\n\
             Labels applied: 3\n\
             New labels remembered: 2\n\
             \n\
             Unrecognized categories skipped: Poetry\n\
             \n\
             === Notices ===\n\
             1. garden/b.md: missing title\n\
             \n\
             Vocabulary size: 5\n"
        );
    }

    #[test]
    fn json_report_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["categories"][0]["category"], "Digital Garden");
        assert_eq!(json["categories"][0]["stats"]["labelled"], 1);
        assert_eq!(json["categories"][0]["notices"][0]["kind"], "missing_fields");
        assert_eq!(json["vocabulary_size"], 5);
    }

    #[test]
    fn lookup_and_totals() {
        let report = sample();
        assert!(report.category(Category::VisualFiction).is_none());
        assert_eq!(report.category(Category::DigitalGarden).unwrap().stats.candidates, 2);
        assert_eq!(report.labelled(), 1);
        assert_eq!(report.notices().count(), 1);
    }
}
