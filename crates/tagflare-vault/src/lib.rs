//! TagFlare Vault
//!
//! The boundary between TagFlare and the filesystem:
//! - **Documents**: `.md` files with YAML front matter, scanned per
//!   directory, indexed by `uid`, and edited in place below `post_tag:`
//! - **Vocabulary**: the `tags.json` file holding every known label
//!
//! ```text
//! directory ─► DocumentRepository::scan ─► VaultScan { documents, rejected, index }
//!                                                        │
//! labels ───► DocumentRepository::apply_indexed ◄────────┘
//!
//! tags.json ◄─► VocabularyStore::{load, save}
//! ```

#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod frontmatter;
pub mod repository;
pub mod vocabulary_store;
pub mod writeback;

pub use document::Document;
pub use error::{DocumentError, InsertError, VaultError, VaultResult};
pub use frontmatter::FrontMatter;
pub use repository::{ApplyOutcome, DocumentIndex, DocumentRepository, RejectedFile, VaultScan};
pub use vocabulary_store::{VocabularyStore, DEFAULT_VOCABULARY_FILE};
pub use writeback::insert_labels;
