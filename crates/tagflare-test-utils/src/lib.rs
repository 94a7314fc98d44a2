//! Testing utilities for TagFlare workspace
//!
//! Shared fixtures: on-disk vault directories and a scripted suggester.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tagflare_suggest::{LabelSuggester, SuggestError, SuggestResult, SuggestionRequest};
use tagflare_taxonomy::{Category, Vocabulary};
use tempfile::TempDir;

/// Front matter for a test document
#[derive(Debug, Clone)]
pub struct DocSpec {
    pub uid: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub labels: Vec<String>,
    pub body: String,
}

impl DocSpec {
    /// Unlabelled document with uid, title, category and a one-line body
    pub fn new(uid: &str, category: Category) -> Self {
        Self {
            uid: Some(uid.to_string()),
            title: Some(format!("Title {uid}")),
            category: Some(category.name().to_string()),
            labels: Vec::new(),
            body: format!("Body of document {uid}.\n"),
        }
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Render as a markdown file, nested `taxonomy` with 4-space indentation
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        if let Some(uid) = &self.uid {
            out.push_str(&format!("uid: {uid}\n"));
        }
        if let Some(title) = &self.title {
            out.push_str(&format!("title: {title}\n"));
        }
        out.push_str("taxonomy:\n");
        if let Some(category) = &self.category {
            out.push_str(&format!("    category:\n        - {category}\n"));
        }
        out.push_str("    post_tag:\n");
        for label in &self.labels {
            out.push_str(&format!("        - {label}\n"));
        }
        out.push_str("---\n");
        out.push_str(&self.body);
        out
    }
}

/// Temporary vault: one directory per category plus a vocabulary path
#[derive(Debug)]
pub struct VaultFixture {
    dir: TempDir,
}

impl VaultFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for category in Category::ALL {
            std::fs::create_dir(dir.path().join(category.slug())).unwrap();
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.dir.path().join(category.slug())
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.dir.path().join("tags.json")
    }

    /// Write `spec` as `<file>` in the category's directory
    pub fn write(&self, category: Category, file: &str, spec: &DocSpec) -> PathBuf {
        self.write_raw(category, file, &spec.render())
    }

    pub fn write_raw(&self, category: Category, file: &str, text: &str) -> PathBuf {
        let path = self.category_dir(category).join(file);
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn read(&self, category: Category, file: &str) -> String {
        std::fs::read_to_string(self.category_dir(category).join(file)).unwrap()
    }

    pub fn write_vocabulary(&self, labels: &[&str]) {
        let tags: Vec<String> = labels.iter().map(|l| format!("\"{l}\"")).collect();
        std::fs::write(self.vocabulary_path(), format!("{{\"tags\": [{}]}}", tags.join(", ")))
            .unwrap();
    }
}

impl Default for VaultFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a vocabulary from string literals
pub fn vocabulary(labels: &[&str]) -> Vocabulary {
    labels.iter().copied().collect()
}

/// Suggester answering from a queue of canned responses
///
/// Every request is recorded. An exhausted queue answers with an error.
#[derive(Debug, Default)]
pub struct ScriptedSuggester {
    responses: Mutex<VecDeque<SuggestResult<String>>>,
    requests: Mutex<Vec<SuggestionRequest>>,
}

impl ScriptedSuggester {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failure after the responses queued so far
    pub fn then_fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .push_back(Err(SuggestError::Backend(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<SuggestionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LabelSuggester for ScriptedSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> SuggestResult<String> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SuggestError::Backend("no scripted response left".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
