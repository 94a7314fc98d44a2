//! Labels and suggestion batches
//!
//! A [`Label`] is the canonical form of a raw suggestion: surrounding
//! whitespace removed, trailing comma stripped, title-cased. Two raw strings
//! that normalize identically are the same label.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Separator between labels in a raw collaborator response
pub const BATCH_SEPARATOR: &str = ", ";

/// A normalized thematic tag
///
/// Deserialization keeps stored strings verbatim; only [`Label::normalize`]
/// applies the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Normalize a raw suggestion into its canonical label form
    ///
    /// Trims whitespace, strips the trailing comma (and any whitespace it
    /// exposes) and title-cases the remainder. Normalization is idempotent.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw
            .trim_start()
            .trim_end_matches(|c: char| c == ',' || c.is_whitespace());
        Self(title_case(trimmed))
    }

    /// Wrap an already-normalized string without touching it
    #[inline]
    #[must_use]
    pub fn verbatim(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Label text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the degenerate label produced by punctuation-only input
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Title-case every word: the first cased character after a non-letter is
/// upper-cased, every following letter lower-cased
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                let mut upper = c.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                // Multi-char uppercase expansions (e.g. 'ß') keep only the
                // leading capital.
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Ordered, normalized labels suggested for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionBatch {
    labels: Vec<Label>,
}

impl SuggestionBatch {
    /// Split a raw collaborator response and normalize every entry
    ///
    /// An empty or whitespace-only response is an empty batch.
    #[must_use]
    pub fn parse(response: &str) -> Self {
        if response.trim().is_empty() {
            return Self::default();
        }

        let labels: Vec<Label> = response.split(BATCH_SEPARATOR).map(Label::normalize).collect();

        if labels.iter().any(Label::is_empty) {
            tracing::warn!(response, "suggestion batch contains an empty label");
        }

        Self { labels }
    }

    /// Labels in batch order
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of labels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the collaborator suggested nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<Label> for SuggestionBatch {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}
