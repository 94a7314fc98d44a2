//! Front matter extraction
//!
//! A document starts with a `---` line (optionally behind a BOM), followed by
//! YAML, closed by another `---` (or `...`) line. Everything after the
//! closing line is the body.

use crate::error::DocumentError;
use serde_yaml::{Mapping, Value};

/// Line indices of the front matter delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterSpan {
    /// Index of the opening `---` line
    pub open: usize,
    /// Index of the closing delimiter line
    pub close: usize,
}

impl FrontMatterSpan {
    /// Locate the front matter in a document split into lines
    ///
    /// # Errors
    /// - `DocumentError::NoFrontMatter` if the first line is not `---`
    /// - `DocumentError::Unterminated` if no closing delimiter follows
    pub fn locate<S: AsRef<str>>(lines: &[S]) -> Result<Self, DocumentError> {
        let first = lines.first().ok_or(DocumentError::NoFrontMatter)?;
        if !is_opening(first.as_ref()) {
            return Err(DocumentError::NoFrontMatter);
        }

        lines
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, line)| is_closing(line.as_ref()))
            .map(|(close, _)| Self { open: 0, close })
            .ok_or(DocumentError::Unterminated)
    }

    /// Indices of the YAML lines between the delimiters
    #[inline]
    #[must_use]
    pub fn inner(&self) -> std::ops::Range<usize> {
        self.open + 1..self.close
    }
}

fn is_opening(line: &str) -> bool {
    line.trim_start_matches('\u{feff}').trim_end() == "---"
}

fn is_closing(line: &str) -> bool {
    matches!(line.trim_end(), "---" | "...")
}

/// Parsed front matter plus the body that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    /// Top-level YAML mapping
    pub fields: Mapping,
    /// Text after the closing delimiter
    pub body: String,
}

impl FrontMatter {
    /// Split a document into front matter and body
    ///
    /// # Errors
    /// Returns the [`DocumentError`] explaining why the file is not a document.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let span = FrontMatterSpan::locate(&lines)?;

        let yaml: String = lines[span.inner()].concat();
        let body: String = lines[span.close + 1..].concat();

        let value: Value = if yaml.trim().is_empty() {
            Value::Mapping(Mapping::new())
        } else {
            serde_yaml::from_str(&yaml).map_err(|e| DocumentError::InvalidYaml(e.to_string()))?
        };

        match value {
            Value::Mapping(fields) => Ok(Self { fields, body }),
            Value::Null => Ok(Self {
                fields: Mapping::new(),
                body,
            }),
            _ => Err(DocumentError::NotAMapping),
        }
    }

    /// Get value at a dot-separated path
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Mapping(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Scalar at `path` rendered as a string
    #[must_use]
    pub fn get_scalar(&self, path: &str) -> Option<String> {
        self.get_path(path).and_then(scalar_to_string)
    }
}

/// Render a YAML scalar as a string; `None` for null, sequences and mappings
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_frontmatter() {
        let text = "---\nuid: 42\ntitle: On Belief\n---\nBody text\n";
        let fm = FrontMatter::parse(text).unwrap();
        assert_eq!(fm.get_scalar("uid").as_deref(), Some("42"));
        assert_eq!(fm.get_scalar("title").as_deref(), Some("On Belief"));
        assert_eq!(fm.body, "Body text\n");
    }

    #[test]
    fn nested_path() {
        let text = "---\ntaxonomy:\n  category:\n    - Digital Garden\n  post_tag:\n---\n";
        let fm = FrontMatter::parse(text).unwrap();
        let category = fm.get_path("taxonomy.category").unwrap();
        assert!(category.is_sequence());
        assert_eq!(fm.get_path("taxonomy.post_tag"), Some(&Value::Null));
        assert_eq!(fm.get_path("taxonomy.missing"), None);
        assert_eq!(fm.get_path("title.nested"), None);
    }

    #[test]
    fn frontmatter_with_bom_and_crlf() {
        let text = "\u{feff}---\r\nuid: a1\r\n---\r\nBody\r\n";
        let fm = FrontMatter::parse(text).unwrap();
        assert_eq!(fm.get_scalar("uid").as_deref(), Some("a1"));
        assert_eq!(fm.body, "Body\r\n");
    }

    #[test]
    fn no_frontmatter() {
        assert_eq!(FrontMatter::parse("# Title\nBody"), Err(DocumentError::NoFrontMatter));
        assert_eq!(FrontMatter::parse(""), Err(DocumentError::NoFrontMatter));
    }

    #[test]
    fn unterminated_frontmatter() {
        assert_eq!(FrontMatter::parse("---\nuid: 1\n"), Err(DocumentError::Unterminated));
    }

    #[test]
    fn invalid_yaml() {
        let err = FrontMatter::parse("---\nuid: [1\n---\n").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidYaml(_)));
    }

    #[test]
    fn scalar_frontmatter_rejected() {
        assert_eq!(FrontMatter::parse("---\njust text\n---\n"), Err(DocumentError::NotAMapping));
    }

    #[test]
    fn empty_frontmatter_is_empty_mapping() {
        let fm = FrontMatter::parse("---\n---\nBody").unwrap();
        assert!(fm.fields.is_empty());
        assert_eq!(fm.body, "Body");
    }
}
