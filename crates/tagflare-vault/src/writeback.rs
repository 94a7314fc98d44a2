//! In-place label insertion
//!
//! Write-back is a minimal diff: new `- label` lines go directly below the
//! `post_tag:` line of the front matter and nothing else in the file moves.

use crate::error::InsertError;
use crate::frontmatter::FrontMatterSpan;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use tagflare_taxonomy::Label;

/// Indentation added below the marker when the block has no entries yet
pub const DEFAULT_INDENT: &str = "    ";

static LABEL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)post_tag:[ \t]*(?P<empty>\[[ \t]*\]|~|null)?[ \t]*(?:#.*)?$")
        .expect("label marker pattern is valid")
});

static SEQUENCE_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>[ \t]*)-(?:[ \t]|$)").expect("entry pattern is valid"));

/// Plain scalars that YAML 1.1 readers load as booleans
static YAML11_BOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:y|yes|n|no|true|false|on|off)$").expect("boolean pattern is valid")
});

/// Insert `labels` below the label marker of `text`
///
/// Existing entries keep their place after the inserted ones. The indentation
/// of an existing first entry is reused; an empty block gets the marker's
/// indentation plus [`DEFAULT_INDENT`]. An inline empty value on the marker
/// line (`post_tag: []`) is dropped so the block stays valid YAML.
///
/// # Errors
/// - `InsertError::NoFrontMatter` if the text has no front matter block
/// - `InsertError::NoLabelMarker` if the front matter has no `post_tag:` line
pub fn insert_labels(text: &str, labels: &[Label]) -> Result<String, InsertError> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let span = FrontMatterSpan::locate(&lines).map_err(|_| InsertError::NoFrontMatter)?;

    let (marker_idx, captures) = span
        .inner()
        .find_map(|idx| {
            LABEL_MARKER
                .captures(strip_eol(lines[idx]))
                .map(|caps| (idx, caps))
        })
        .ok_or(InsertError::NoLabelMarker)?;

    let marker_line = lines[marker_idx];
    let eol = line_ending(marker_line);
    let marker_indent = captures.name("indent").map_or("", |m| m.as_str());
    let inline_empty = captures.name("empty").is_some();

    let entry_indent = lines
        .get(marker_idx + 1)
        .filter(|_| marker_idx + 1 < span.close && !inline_empty)
        .and_then(|next| SEQUENCE_ENTRY.captures(strip_eol(next)))
        .and_then(|caps| caps.name("indent"))
        .map(|m| m.as_str().to_string())
        .filter(|indent| indent.len() >= marker_indent.len())
        .unwrap_or_else(|| format!("{marker_indent}{DEFAULT_INDENT}"));

    let mut out = String::with_capacity(text.len() + labels.len() * 16);
    for line in &lines[..marker_idx] {
        out.push_str(line);
    }

    if inline_empty {
        out.push_str(marker_indent);
        out.push_str("post_tag:");
        out.push_str(eol);
    } else {
        out.push_str(marker_line);
    }

    for label in labels {
        out.push_str(&entry_indent);
        out.push_str("- ");
        out.push_str(&yaml_scalar(label.as_str()));
        out.push_str(eol);
    }

    for line in &lines[marker_idx + 1..] {
        out.push_str(line);
    }

    Ok(out)
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Render a label as a YAML scalar, quoting only when a plain scalar would
/// read back as something else under YAML 1.2 or 1.1
fn yaml_scalar(label: &str) -> String {
    match serde_yaml::from_str::<Value>(label) {
        Ok(Value::String(ref s)) if s == label && !YAML11_BOOL.is_match(label) => label.to_string(),
        // A JSON string literal is also a valid double-quoted YAML scalar.
        _ => serde_json::Value::String(label.to_string()).to_string(),
    }
}
