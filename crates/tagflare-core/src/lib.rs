//! TagFlare Core
//!
//! Ties the pieces together: configuration, the per-category run loop and
//! its report.
//!
//! # Example
//!
//! ```rust,ignore
//! use tagflare_core::{TagflareConfig, Tagger};
//! use tagflare_suggest::OpenAiSuggester;
//! use tagflare_taxonomy::Category;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TagflareConfig::new()
//!     .with_source(Category::DigitalGarden, "content/garden")
//!     .with_vocabulary_path("tags.json");
//! let suggester = OpenAiSuggester::from_env(config.openai.clone())?;
//!
//! let report = Tagger::new(config, suggester).run().await?;
//! print!("{}", report.generate_text());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod report;
pub mod run;

pub use config::{ResolvedSources, TagflareConfig};
pub use error::{TagflareError, TagflareResult};
pub use report::{CategoryReport, CategoryStats, Notice, NoticeKind, RunReport};
pub use run::{list_candidates, CategoryCandidates, Tagger};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
