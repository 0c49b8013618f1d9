//! YAML front matter updates for notes.
//!
//! # Responsibility
//! - Upsert scalar `key: value` lines in a leading `---` block.
//! - Persist sort metadata (distance + priority) onto note files.
//!
//! # Invariants
//! - Keys not being written, their order, and the note body are preserved.
//! - A note without front matter gets a new block prepended.
//! - Line endings follow the note (`\r\n` stays `\r\n`).

use super::{write_atomic, StoreError, StoreResult};
use crate::config::MetadataConfig;
use crate::model::sort::SortEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static FRONTMATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)\A---[ \t]*\r?\n(?P<body>.*?)^---[ \t]*\r?$\n?")
        .expect("valid front matter regex")
});
static KEY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[^\s#:-][^:]*?)[ \t]*:").expect("valid key regex"));

/// Upserts `fields` into the front matter of `content`.
pub fn upsert_fields(content: &str, fields: &[(&str, String)]) -> String {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

    let (existing, rest) = match FRONTMATTER_RE.captures(content) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let body = caps.name("body").map_or("", |m| m.as_str());
            (Some(body), &content[whole..])
        }
        None => (None, content),
    };

    let mut lines: Vec<String> = existing
        .map(|body| body.lines().map(str::to_string).collect())
        .unwrap_or_default();

    for (key, value) in fields {
        let rendered = format!("{key}: {value}");
        match find_key_line(&lines, key) {
            Some(index) => {
                lines[index] = rendered;
                drop_continuation_lines(&mut lines, index + 1);
            }
            None => lines.push(rendered),
        }
    }

    let mut output = String::with_capacity(content.len() + 64);
    output.push_str("---");
    output.push_str(newline);
    for line in &lines {
        output.push_str(line.trim_end_matches('\r'));
        output.push_str(newline);
    }
    output.push_str("---");
    output.push_str(newline);
    output.push_str(rest);
    output
}

/// Reads one scalar front matter value, if present.
pub fn read_field(content: &str, key: &str) -> Option<String> {
    let caps = FRONTMATTER_RE.captures(content)?;
    let body = caps.name("body")?.as_str();
    body.lines().find_map(|line| {
        let caps = KEY_LINE_RE.captures(line)?;
        if unquote(caps.name("key")?.as_str()) != key {
            return None;
        }
        let value_start = caps.get(0)?.end();
        Some(line[value_start..].trim().to_string())
    })
}

/// Writes the distance and priority fields onto the note at `path`.
///
/// # Errors
/// - Returns `StoreError::NotFound` when the note does not exist.
/// - Returns `StoreError::Io` for other read/write failures.
pub fn write_sort_metadata(
    path: impl AsRef<Path>,
    fields: &MetadataConfig,
    entry: &SortEntry,
) -> StoreResult<()> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let updated = upsert_fields(
        content.as_str(),
        &[
            (fields.distance_field.as_str(), format_number(entry.distance)),
            (
                fields.priority_field.as_str(),
                entry.quadrant.number().to_string(),
            ),
        ],
    );
    if updated == content {
        return Ok(());
    }
    write_atomic(path, updated.as_bytes())
}

/// Formats a float without a trailing `.0` (`1`, `0.5`, `0.333`).
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

fn find_key_line(lines: &[String], key: &str) -> Option<usize> {
    lines.iter().position(|line| {
        KEY_LINE_RE
            .captures(line)
            .and_then(|caps| caps.name("key"))
            .is_some_and(|found| unquote(found.as_str()) == key)
    })
}

// `"ns-distance": 1` and `'ns-distance': 1` name the same key.
fn unquote(key: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            key.strip_prefix(*quote)
                .and_then(|inner| inner.strip_suffix(*quote))
        })
        .unwrap_or(key)
}

// A replaced key may have carried a block value (list or nested map).
fn drop_continuation_lines(lines: &mut Vec<String>, start: usize) {
    let end = lines[start..]
        .iter()
        .position(|line| !(line.starts_with(' ') || line.starts_with('\t') || line.starts_with("- ")))
        .map_or(lines.len(), |offset| start + offset);
    lines.drain(start..end);
}
