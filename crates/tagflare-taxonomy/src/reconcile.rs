//! Reconciliation engine
//!
//! Merges a suggestion batch into the vocabulary under two budgets:
//!
//! 1. Partition the batch (order preserved) into labels the vocabulary
//!    already knows (`reused`) and labels it does not (`new`).
//! 2. Keep at most `max_new_tags` new labels.
//! 3. Fill the document's `max_total_tags` slots with reused labels first,
//!    then with new ones.
//! 4. Remember every kept new label, applied or not.
//!
//! The function is pure: the caller persists the returned vocabulary.

use crate::label::{Label, SuggestionBatch};
use crate::vocabulary::Vocabulary;
use std::collections::HashSet;

/// Per-document label budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Maximum number of new labels kept from one batch
    pub max_new_tags: usize,
    /// Maximum number of labels applied to one document
    pub max_total_tags: usize,
}

impl Budget {
    /// Create a budget
    #[inline]
    #[must_use]
    pub fn new(max_new_tags: usize, max_total_tags: usize) -> Self {
        Self {
            max_new_tags,
            max_total_tags,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

/// Outcome of reconciling one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Suggested labels already in the vocabulary, batch order
    pub reused: Vec<Label>,
    /// Suggested labels not in the vocabulary, truncated to `max_new_tags`
    pub new: Vec<Label>,
    /// Labels to write to the document, reused first
    pub applied: Vec<Label>,
    /// Vocabulary with every entry of `new` added
    pub vocabulary: Vocabulary,
}

impl Reconciliation {
    /// Applied labels as string slices
    #[must_use]
    pub fn applied_strs(&self) -> Vec<&str> {
        self.applied.iter().map(Label::as_str).collect()
    }

    /// True when nothing should be written to the document
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Number of labels added to the vocabulary
    #[inline]
    #[must_use]
    pub fn remembered(&self) -> usize {
        self.new.len()
    }
}

/// Reconcile a suggestion batch against a vocabulary snapshot
///
/// Repeated labels within one batch count once, at their first position.
#[must_use]
pub fn reconcile(batch: &SuggestionBatch, vocabulary: &Vocabulary, budget: Budget) -> Reconciliation {
    let mut seen: HashSet<&Label> = HashSet::with_capacity(batch.len());
    let mut reused = Vec::new();
    let mut new = Vec::new();

    for label in batch.labels() {
        if !seen.insert(label) {
            continue;
        }
        if vocabulary.contains(label) {
            reused.push(label.clone());
        } else {
            new.push(label.clone());
        }
    }

    new.truncate(budget.max_new_tags);

    let applied: Vec<Label> = if reused.len() < budget.max_total_tags {
        let free_slots = budget.max_total_tags - reused.len();
        reused
            .iter()
            .chain(new.iter().take(free_slots))
            .cloned()
            .collect()
    } else {
        reused.iter().take(budget.max_total_tags).cloned().collect()
    };

    let mut updated = vocabulary.clone();
    updated.extend(new.iter().cloned());

    tracing::debug!(
        reused = reused.len(),
        new = new.len(),
        applied = applied.len(),
        "reconciled suggestion batch"
    );

    Reconciliation {
        reused,
        new,
        applied,
        vocabulary: updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strs(labels: &[Label]) -> Vec<&str> {
        labels.iter().map(Label::as_str).collect()
    }

    #[test]
    fn reused_labels_win_remaining_slots_go_to_new() {
        let vocabulary: Vocabulary = ["Belief", "Solitude"].into_iter().collect();
        let batch = SuggestionBatch::parse("Belief, Wonder, Curiosity, Solitude");

        let outcome = reconcile(&batch, &vocabulary, Budget::default());

        assert_eq!(strs(&outcome.reused), ["Belief", "Solitude"]);
        assert_eq!(strs(&outcome.new), ["Wonder", "Curiosity"]);
        assert_eq!(outcome.applied_strs(), ["Belief", "Solitude", "Wonder"]);
        let expected: Vocabulary = ["Belief", "Solitude", "Wonder", "Curiosity"]
            .into_iter()
            .collect();
        assert_eq!(outcome.vocabulary, expected);
    }

    #[test]
    fn new_labels_truncated_before_union() {
        let batch = SuggestionBatch::parse("Loss, Memory, Time, Hope, Grief");

        let outcome = reconcile(&batch, &Vocabulary::new(), Budget::default());

        assert!(outcome.reused.is_empty());
        assert_eq!(outcome.applied_strs(), ["Loss", "Memory", "Time"]);
        assert_eq!(outcome.vocabulary.len(), 3);
        assert!(!outcome.vocabulary.contains_str("Hope"));
        assert!(!outcome.vocabulary.contains_str("Grief"));
    }

    #[test]
    fn reused_over_budget_drops_new_from_applied() {
        let vocabulary: Vocabulary = ["A", "B", "C", "D"].into_iter().collect();
        let batch = SuggestionBatch::parse("d, novel, c, b, a");

        let outcome = reconcile(&batch, &vocabulary, Budget::default());

        assert_eq!(outcome.applied_strs(), ["D", "C", "B"]);
        // Dropped from the document, still remembered.
        assert!(outcome.vocabulary.contains_str("Novel"));
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let vocabulary: Vocabulary = ["Belief"].into_iter().collect();

        let outcome = reconcile(&SuggestionBatch::default(), &vocabulary, Budget::default());

        assert!(outcome.is_empty());
        assert_eq!(outcome.vocabulary, vocabulary);
        assert_eq!(outcome.remembered(), 0);
    }

    #[test]
    fn case_variants_count_as_reused() {
        let vocabulary: Vocabulary = ["Belief"].into_iter().collect();
        let batch = SuggestionBatch::parse("belief, BELIEF");

        let outcome = reconcile(&batch, &vocabulary, Budget::default());

        assert_eq!(outcome.applied_strs(), ["Belief"]);
        assert!(outcome.new.is_empty());
    }

    #[test]
    fn zero_new_budget_remembers_nothing() {
        let batch = SuggestionBatch::parse("Loss, Memory");

        let outcome = reconcile(&batch, &Vocabulary::new(), Budget::new(0, 3));

        assert!(outcome.is_empty());
        assert!(outcome.vocabulary.is_empty());
    }

    #[test]
    fn new_budget_larger_than_total() {
        let batch = SuggestionBatch::parse("Loss, Memory, Time, Hope");

        let outcome = reconcile(&batch, &Vocabulary::new(), Budget::new(4, 2));

        assert_eq!(outcome.applied_strs(), ["Loss", "Memory"]);
        assert_eq!(outcome.remembered(), 4);
    }

    #[test]
    fn empty_label_is_kept() {
        let batch = SuggestionBatch::parse("Loss, ,");

        let outcome = reconcile(&batch, &Vocabulary::new(), Budget::default());

        assert_eq!(outcome.applied_strs(), ["Loss", ""]);
        assert!(outcome.vocabulary.contains_str(""));
    }
}
