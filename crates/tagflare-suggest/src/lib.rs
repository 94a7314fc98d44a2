//! TagFlare Suggest
//!
//! The label suggestion collaborator: given a document and the current
//! vocabulary, return free-text, comma-separated candidate labels.
//!
//! The response is deliberately left raw. Splitting and normalization belong
//! to [`tagflare_taxonomy::SuggestionBatch`], so every backend is held to the
//! same reconciliation rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use tagflare_suggest::{LabelSuggester, OpenAiConfig, OpenAiSuggester, SuggestionRequest};
//!
//! # async fn example(request: SuggestionRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let suggester = OpenAiSuggester::from_env(OpenAiConfig::default())?;
//! let raw = suggester.suggest(&request).await?;
//! println!("suggested: {raw}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod openai;
pub mod prompt;

pub use error::{SuggestError, SuggestResult};
pub use openai::{OpenAiConfig, OpenAiSuggester};
pub use prompt::{Prompt, SYSTEM_PROMPT};

use async_trait::async_trait;
use tagflare_taxonomy::{Category, Vocabulary};

/// Everything the collaborator sees for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Document body
    pub content: String,
    /// Document title
    pub title: String,
    /// Category deciding the suggestion policy
    pub category: Category,
    /// Vocabulary as of this request
    pub vocabulary: Vocabulary,
}

/// External label suggestion service
///
/// Implementations return the service's answer unmodified. Errors are fatal
/// for the run; callers do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelSuggester: Send + Sync {
    /// Suggest labels for one document
    async fn suggest(&self, request: &SuggestionRequest) -> SuggestResult<String>;

    /// Backend name for logging
    fn name(&self) -> &str {
        "custom"
    }
}

#[async_trait]
impl<T: LabelSuggester + ?Sized> LabelSuggester for Box<T> {
    async fn suggest(&self, request: &SuggestionRequest) -> SuggestResult<String> {
        (**self).suggest(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SuggestionRequest {
        SuggestionRequest {
            content: "body".to_string(),
            title: "Title".to_string(),
            category: Category::DigitalGarden,
            vocabulary: Vocabulary::new(),
        }
    }

    #[tokio::test]
    async fn boxed_suggester_delegates() {
        let mut mock = MockLabelSuggester::new();
        mock.expect_suggest()
            .withf(|req| req.title == "Title")
            .times(1)
            .returning(|_| Ok("Belief, Wonder".to_string()));

        let boxed: Box<dyn LabelSuggester> = Box::new(mock);
        assert_eq!(boxed.suggest(&request()).await.unwrap(), "Belief, Wonder");
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let mut mock = MockLabelSuggester::new();
        mock.expect_suggest()
            .returning(|_| Err(SuggestError::Backend("offline".to_string())));

        let err = mock.suggest(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "suggestion failed: offline");
    }
}
