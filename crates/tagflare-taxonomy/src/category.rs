//! Document categories
//!
//! Categories are a closed set. They decide which documents a pass looks at
//! and how freely the suggestion collaborator may invent labels; the
//! reconciliation engine itself never looks at them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed enumeration of recognized document categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Essays and notes; new labels may be invented
    #[serde(rename = "Digital Garden")]
    DigitalGarden,
    /// Illustrated fiction; labels must come from the vocabulary
    #[serde(rename = "Visual Fiction")]
    VisualFiction,
}

/// How the collaborator is instructed to treat the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPolicy {
    /// Only labels already in the vocabulary may be suggested
    ReuseOnly,
    /// Vocabulary labels are preferred, new ones are allowed
    ReusePreferred,
}

impl Category {
    /// All categories in processing order
    pub const ALL: [Category; 2] = [Category::DigitalGarden, Category::VisualFiction];

    /// Name as written in document front matter
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DigitalGarden => "Digital Garden",
            Self::VisualFiction => "Visual Fiction",
        }
    }

    /// Collaborator policy for this category
    #[inline]
    #[must_use]
    pub fn policy(self) -> SuggestionPolicy {
        match self {
            Self::DigitalGarden => SuggestionPolicy::ReusePreferred,
            Self::VisualFiction => SuggestionPolicy::ReuseOnly,
        }
    }

    /// Short identifier used for configuration keys and CLI flags
    #[inline]
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::DigitalGarden => "digital-garden",
            Self::VisualFiction => "visual-fiction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A category name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts either the display name or the slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s || c.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_name_and_slug() {
        assert_eq!("Digital Garden".parse::<Category>(), Ok(Category::DigitalGarden));
        assert_eq!("visual-fiction".parse::<Category>(), Ok(Category::VisualFiction));
    }

    #[test]
    fn parse_unknown() {
        let err = "Poetry".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized category: 'Poetry'");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("digital garden".parse::<Category>().is_err());
    }

    #[test]
    fn policies() {
        assert_eq!(Category::DigitalGarden.policy(), SuggestionPolicy::ReusePreferred);
        assert_eq!(Category::VisualFiction.policy(), SuggestionPolicy::ReuseOnly);
    }

    #[test]
    fn processing_order() {
        assert_eq!(Category::ALL, [Category::DigitalGarden, Category::VisualFiction]);
    }
}
