//! TagFlare Taxonomy
//!
//! The pure, I/O-free part of TagFlare:
//! - [`Label`] normalization (trim, strip trailing comma, title-case)
//! - [`Vocabulary`], the deduplicated set of known labels
//! - [`Category`], the closed set of document categories
//! - [`reconcile`], the merge policy between suggested labels and the vocabulary
//!
//! # Example
//!
//! ```rust
//! use tagflare_taxonomy::{reconcile, Budget, SuggestionBatch, Vocabulary};
//!
//! let vocabulary: Vocabulary = ["Belief", "Solitude"].into_iter().collect();
//! let batch = SuggestionBatch::parse("Belief, Wonder, Curiosity, Solitude");
//!
//! let outcome = reconcile(&batch, &vocabulary, Budget::default());
//! assert_eq!(outcome.applied_strs(), ["Belief", "Solitude", "Wonder"]);
//! assert!(outcome.vocabulary.contains_str("Curiosity"));
//! ```

#![warn(unreachable_pub)]

pub mod category;
pub mod label;
pub mod reconcile;
pub mod vocabulary;

pub use category::{Category, SuggestionPolicy, UnknownCategory};
pub use label::{Label, SuggestionBatch};
pub use reconcile::{reconcile, Budget, Reconciliation};
pub use vocabulary::Vocabulary;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
