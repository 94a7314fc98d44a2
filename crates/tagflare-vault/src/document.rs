//! Documents read from a vault directory

use crate::error::DocumentError;
use crate::frontmatter::{scalar_to_string, FrontMatter};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tagflare_taxonomy::Category;

/// Front-matter key path of the document category
pub const CATEGORY_PATH: &str = "taxonomy.category";

/// Front-matter key path of the label collection
pub const LABELS_PATH: &str = "taxonomy.post_tag";

/// A text document with front-matter metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File the document was read from
    pub path: PathBuf,
    /// Unique id used to target write-back
    pub uid: Option<String>,
    /// Document title
    pub title: Option<String>,
    /// Category name, first entry when the field is a list
    pub category: Option<String>,
    /// Labels already present under `taxonomy.post_tag`
    pub labels: Vec<String>,
    /// Body text after the front matter
    pub content: String,
}

impl Document {
    /// Parse a document from its text
    ///
    /// # Errors
    /// Returns [`DocumentError`] when the text has no usable front matter.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, DocumentError> {
        let fm = FrontMatter::parse(text)?;

        let category = fm.get_path(CATEGORY_PATH).and_then(|value| match value {
            Value::Sequence(items) => items.first().and_then(scalar_to_string),
            other => scalar_to_string(other),
        });

        let labels = match fm.get_path(LABELS_PATH) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other)
                .filter(|s| !s.is_empty())
                .into_iter()
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            path: path.into(),
            uid: fm.get_scalar("uid"),
            title: fm.get_scalar("title"),
            category,
            labels,
            content: fm.body,
        })
    }

    /// File name for reporting
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// True when the label collection is absent or empty
    #[inline]
    #[must_use]
    pub fn is_unlabelled(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when the document's category is `category`
    #[inline]
    #[must_use]
    pub fn is_in(&self, category: Category) -> bool {
        self.category.as_deref() == Some(category.name())
    }

    /// Required fields that are absent or empty: `content`, `title`, `category`
    ///
    /// Whitespace counts as present; a body of a single blank line still
    /// goes to the suggester.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |value: Option<&str>| value.map_or(true, str::is_empty);

        let mut missing = Vec::new();
        if blank(Some(&self.content)) {
            missing.push("content");
        }
        if blank(self.title.as_deref()) {
            missing.push("title");
        }
        if blank(self.category.as_deref()) {
            missing.push("category");
        }
        missing
    }
}

/// Whether a path looks like a document file
#[must_use]
pub fn is_document_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELLED: &str = "---
uid: 1001
title: On Belief
taxonomy:
    category:
        - Digital Garden
    post_tag:
        - Belief
        - Wonder
---
Why we believe.
";

    const UNLABELLED: &str = "---
uid: abc
title: Night Train
taxonomy:
    category: Visual Fiction
    post_tag:
---
A train at night.
";

    #[test]
    fn parse_labelled_document() {
        let doc = Document::parse("belief.md", LABELLED).unwrap();
        assert_eq!(doc.uid.as_deref(), Some("1001"));
        assert_eq!(doc.title.as_deref(), Some("On Belief"));
        assert_eq!(doc.category.as_deref(), Some("Digital Garden"));
        assert_eq!(doc.labels, ["Belief", "Wonder"]);
        assert_eq!(doc.content, "Why we believe.\n");
        assert!(!doc.is_unlabelled());
        assert!(doc.is_in(Category::DigitalGarden));
    }

    #[test]
    fn parse_unlabelled_document_with_scalar_category() {
        let doc = Document::parse("train.md", UNLABELLED).unwrap();
        assert!(doc.is_unlabelled());
        assert!(doc.is_in(Category::VisualFiction));
        assert!(!doc.is_in(Category::DigitalGarden));
        assert!(doc.missing_fields().is_empty());
    }

    #[test]
    fn missing_taxonomy_is_unlabelled_without_category() {
        let doc = Document::parse("bare.md", "---\nuid: 7\n---\n").unwrap();
        assert!(doc.is_unlabelled());
        assert_eq!(doc.category, None);
        assert_eq!(doc.missing_fields(), ["content", "title", "category"]);
    }

    #[test]
    fn whitespace_fields_count_as_present() {
        let doc = Document::parse(
            "blank.md",
            "---\ntitle: \"  \"\ntaxonomy:\n    category: Digital Garden\n    post_tag:\n---\n\n",
        )
        .unwrap();
        assert_eq!(doc.content, "\n");
        assert!(doc.missing_fields().is_empty());

        let doc = Document::parse("empty.md", "---\ntitle: \"\"\n---\n").unwrap();
        assert_eq!(doc.missing_fields(), ["content", "title", "category"]);
    }

    #[test]
    fn empty_inline_list_is_unlabelled() {
        let doc = Document::parse(
            "x.md",
            "---\ntitle: X\ntaxonomy:\n  category: [Digital Garden]\n  post_tag: []\n---\nx\n",
        )
        .unwrap();
        assert!(doc.is_unlabelled());
        assert!(doc.is_in(Category::DigitalGarden));
    }

    #[test]
    fn document_paths() {
        assert!(is_document_path(Path::new("notes/belief.md")));
        assert!(!is_document_path(Path::new("notes/belief.txt")));
        assert!(!is_document_path(Path::new("notes/md")));
    }

    #[test]
    fn file_name_for_reporting() {
        let doc = Document::parse("/vault/garden/belief.md", LABELLED).unwrap();
        assert_eq!(doc.file_name(), "belief.md");
    }
}
