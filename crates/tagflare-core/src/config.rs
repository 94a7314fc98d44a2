//! Run configuration
//!
//! Loaded from an optional TOML file, then adjusted with the `with_*`
//! builders (the CLI applies its flags this way).
//!
//! ```toml
//! vocabulary_path = "tags.json"
//! max_new_tags = 3
//! max_total_tags = 3
//!
//! [sources]
//! "Digital Garden" = "content/garden"
//! visual-fiction = "content/fiction"
//!
//! [openai]
//! model = "gpt-3.5-turbo"
//! ```

use crate::error::TagflareError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tagflare_suggest::OpenAiConfig;
use tagflare_taxonomy::{Budget, Category};
use tagflare_vault::DEFAULT_VOCABULARY_FILE;

/// TagFlare configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagflareConfig {
    /// Vocabulary file
    pub vocabulary_path: PathBuf,
    /// Maximum new labels kept per document
    pub max_new_tags: usize,
    /// Maximum labels applied per document
    pub max_total_tags: usize,
    /// Source directory per category, keyed by category name or slug
    pub sources: BTreeMap<String, PathBuf>,
    /// Suggestion backend settings
    pub openai: OpenAiConfig,
}

impl Default for TagflareConfig {
    fn default() -> Self {
        let budget = Budget::default();
        Self {
            vocabulary_path: PathBuf::from(DEFAULT_VOCABULARY_FILE),
            max_new_tags: budget.max_new_tags,
            max_total_tags: budget.max_total_tags,
            sources: BTreeMap::new(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Category sources split into recognized and unrecognized entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSources {
    /// Recognized categories with their directory, in processing order
    pub categories: Vec<(Category, PathBuf)>,
    /// Keys that name no known category
    pub unrecognized: Vec<String>,
}

impl TagflareConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// `TagflareError::ConfigParse` if the text is not a valid configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, TagflareError> {
        toml::from_str(text).map_err(|source| TagflareError::ConfigParse {
            path: None,
            source,
        })
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// - `TagflareError::Config` if the file cannot be read
    /// - `TagflareError::ConfigParse` if its content is invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TagflareError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            TagflareError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|source| TagflareError::ConfigParse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// With source directory for a category, replacing any entry naming it
    #[must_use]
    pub fn with_source(mut self, category: Category, dir: impl Into<PathBuf>) -> Self {
        self.sources
            .retain(|key, _| key.parse::<Category>().map_or(true, |c| c != category));
        self.sources.insert(category.name().to_string(), dir.into());
        self
    }

    /// With vocabulary file
    #[inline]
    #[must_use]
    pub fn with_vocabulary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary_path = path.into();
        self
    }

    /// With label budget
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.max_new_tags = budget.max_new_tags;
        self.max_total_tags = budget.max_total_tags;
        self
    }

    /// With suggestion backend settings
    #[inline]
    #[must_use]
    pub fn with_openai(mut self, openai: OpenAiConfig) -> Self {
        self.openai = openai;
        self
    }

    /// Label budget per document
    #[inline]
    #[must_use]
    pub fn budget(&self) -> Budget {
        Budget::new(self.max_new_tags, self.max_total_tags)
    }

    /// Match source keys against the closed category set
    ///
    /// Recognized categories come back in [`Category::ALL`] order; when two
    /// keys name the same category the display name wins over the slug.
    #[must_use]
    pub fn resolve_sources(&self) -> ResolvedSources {
        let mut resolved = ResolvedSources::default();
        let mut by_category: BTreeMap<Category, PathBuf> = BTreeMap::new();

        for (key, dir) in &self.sources {
            match key.parse::<Category>() {
                Ok(category) => {
                    if key.trim() == category.name() || !by_category.contains_key(&category) {
                        by_category.insert(category, dir.clone());
                    }
                }
                Err(_) => resolved.unrecognized.push(key.clone()),
            }
        }

        resolved.categories = Category::ALL
            .into_iter()
            .filter_map(|category| by_category.remove(&category).map(|dir| (category, dir)))
            .collect();
        resolved
    }

    /// Resolve sources, failing when no known category has a directory
    ///
    /// # Errors
    /// `TagflareError::Config` if no source names a recognized category.
    pub fn require_sources(&self) -> Result<ResolvedSources, TagflareError> {
        let resolved = self.resolve_sources();
        if resolved.categories.is_empty() {
            return Err(TagflareError::Config("no sources configured".to_string()));
        }
        Ok(resolved)
    }
}
