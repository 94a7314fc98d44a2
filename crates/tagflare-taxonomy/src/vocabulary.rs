//! The run-spanning set of known labels

use crate::label::Label;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Deduplicated set of known labels
///
/// Order carries no meaning; insertion order is kept only so a rewritten
/// vocabulary file diffs cleanly against the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    labels: IndexSet<Label>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership
    #[inline]
    #[must_use]
    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Exact-match membership by string
    #[inline]
    #[must_use]
    pub fn contains_str(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Insert a label, returning `true` if it was not known yet
    #[inline]
    pub fn insert(&mut self, label: Label) -> bool {
        self.labels.insert(label)
    }

    /// Number of known labels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no label is known
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over known labels
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// True when every label of `other` is also known here
    #[must_use]
    pub fn is_superset(&self, other: &Vocabulary) -> bool {
        other.labels.is_subset(&self.labels)
    }

    /// Labels joined for display or prompting
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.labels
            .iter()
            .map(Label::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Extend<Label> for Vocabulary {
    fn extend<I: IntoIterator<Item = Label>>(&mut self, iter: I) {
        self.labels.extend(iter);
    }
}

impl FromIterator<Label> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Label::verbatim).collect()
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a Label;
    type IntoIter = indexmap::set::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_dedups_exact_matches() {
        let mut vocabulary = Vocabulary::new();
        assert!(vocabulary.insert(Label::verbatim("Belief")));
        assert!(!vocabulary.insert(Label::verbatim("Belief")));
        assert!(vocabulary.insert(Label::verbatim("belief")));
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn deserialize_collapses_duplicates() {
        let vocabulary: Vocabulary = serde_json::from_str(r#"["Loss", "Hope", "Loss"]"#).unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.contains_str("Loss"));
    }

    #[test]
    fn superset() {
        let small: Vocabulary = ["Loss"].into_iter().collect();
        let large: Vocabulary = ["Loss", "Hope"].into_iter().collect();
        assert!(large.is_superset(&small));
        assert!(!small.is_superset(&large));
        assert!(small.is_superset(&Vocabulary::new()));
    }

    #[test]
    fn join_keeps_insertion_order() {
        let vocabulary: Vocabulary = ["Time", "Grief", "Hope"].into_iter().collect();
        assert_eq!(vocabulary.join(", "), "Time, Grief, Hope");
    }
}
