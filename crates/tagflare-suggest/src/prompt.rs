//! Prompts per category policy
//!
//! - Reuse-only categories must pick labels from the vocabulary.
//! - Reuse-preferred categories may invent labels but are nudged towards
//!   existing ones.

use crate::SuggestionRequest;
use tagflare_taxonomy::SuggestionPolicy;

/// System message shared by every request
pub const SYSTEM_PROMPT: &str =
    "You are to only ever return a list of keywords separated by comma. Nothing else";

/// Chat prompt for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instruction for the assistant role
    pub system: String,
    /// The analysis request including the document content
    pub user: String,
}

impl Prompt {
    /// Build the prompt for `request` according to its category policy
    #[must_use]
    pub fn for_request(request: &SuggestionRequest) -> Self {
        let vocabulary = request.vocabulary.join(", ");
        let content = &request.content;

        let user = match request.category.policy() {
            SuggestionPolicy::ReuseOnly => format!(
                "I need you to identify the primary themes in the following '{category}' text. \
                 Your goal is to choose thematic keywords that capture the essence of this text. \
                 These keywords should be from the existing tags list: {vocabulary}. \
                 Do not invent new keywords. You have to select suitable tags from the given list. \
                 Choose exactly 3!\n\
                 \nHere's the text you should analyze, respond only with the themes themselves, \
                 not other words:\n\n{content}\n",
                category = request.category,
            ),
            SuggestionPolicy::ReusePreferred => format!(
                "I need you to identify the primary themes in the following text. \
                 Your goal is to generate thematic keywords that capture the essence of this text. \
                 These keywords should be meaningful, specific, and concise. \
                 Each keyword you generate should reflect one distinct theme or topic in the text, \
                 and should be limited to one to three words whenever possible. \
                 For example, instead of 'Making You Believe', a more appropriate tag could be 'Belief'. \
                 Your keywords should lean more towards the insightful representation of the content \
                 rather than being salesy, marketing oriented or vague. Also, while you are free to \
                 invent new keywords, try to use the existing tags from this list when appropriate: \
                 {vocabulary}.\n\
                 \nHere's the text you should analyze, respond only with the themes themselves, \
                 not other words:\n\n{content}\n"
            ),
        };

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
