//! Frontmatter detection for exec files.
//!
//! A frontmatter block is a run of `key: value` lines between two `---`
//! marker lines at the very top of a file. This is deliberately not YAML:
//! values are plain trimmed strings and nesting is not supported.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const MARKER: &str = "---";

/// Parsed `key: value` pairs. Later duplicates overwrite earlier ones.
pub type Frontmatter = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontmatterParseResult {
    /// `None` iff `has_frontmatter` is false. An empty block is `Some({})`.
    pub frontmatter: Option<Frontmatter>,
    /// Body after the closing marker, or the original content untouched.
    pub content: String,
    pub has_frontmatter: bool,
}

/// Index of the closing marker line, if the content opens with a marker.
fn closing_marker(lines: &[&str]) -> Option<usize> {
    if lines.first()?.trim() != MARKER {
        return None;
    }
    lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == MARKER)
        .map(|i| i + 1)
}

pub fn has_frontmatter(content: &str) -> bool {
    let lines: Vec<&str> = content.split('\n').collect();
    closing_marker(&lines).is_some()
}

pub fn parse_frontmatter(content: &str) -> FrontmatterParseResult {
    let lines: Vec<&str> = content.split('\n').collect();
    let Some(end) = closing_marker(&lines) else {
        return FrontmatterParseResult {
            frontmatter: None,
            content: content.to_string(),
            has_frontmatter: false,
        };
    };

    let mut frontmatter = Frontmatter::new();
    for line in &lines[1..end] {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        frontmatter.insert(key.to_string(), value.trim().to_string());
    }

    FrontmatterParseResult {
        frontmatter: Some(frontmatter),
        content: lines[end + 1..].join("\n"),
        has_frontmatter: true,
    }
}

/// Read `path` and parse any frontmatter it carries.
pub async fn read_file_with_frontmatter(path: &Path) -> Result<FrontmatterParseResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::Frontmatter(format!("{e} (path: {})", path.display())))?;
    Ok(parse_frontmatter(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_simple_block() {
        assert!(has_frontmatter("---\ntitle: T\n---\nBody"));
    }

    #[test]
    fn no_opening_marker_is_not_frontmatter() {
        assert!(!has_frontmatter("title: T\n---\nBody"));
        assert!(!has_frontmatter("Body only"));
        assert!(!has_frontmatter(""));
    }

    #[test]
    fn unterminated_block_is_not_frontmatter() {
        let input = "---\ntitle: T\nBody";
        assert!(!has_frontmatter(input));
        let parsed = parse_frontmatter(input);
        assert!(!parsed.has_frontmatter);
        assert_eq!(parsed.frontmatter, None);
        assert_eq!(parsed.content, input);
    }

    #[test]
    fn markers_tolerate_surrounding_whitespace() {
        let parsed = parse_frontmatter("  ---  \r\nmodel: gpt-4\r\n --- \r\nBody");
        assert!(parsed.has_frontmatter);
        assert_eq!(
            parsed.frontmatter.unwrap().get("model").map(String::as_str),
            Some("gpt-4")
        );
    }

    #[test]
    fn parses_block_and_strips_it() {
        let parsed = parse_frontmatter("---\ntitle: T\n---\nBody");
        assert!(parsed.has_frontmatter);
        let fm = parsed.frontmatter.unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm["title"], "T");
        assert_eq!(parsed.content, "Body");
    }

    #[test]
    fn empty_block_yields_empty_map() {
        let parsed = parse_frontmatter("---\n---\nBody");
        assert!(parsed.has_frontmatter);
        assert_eq!(parsed.frontmatter, Some(Frontmatter::new()));
        assert_eq!(parsed.content, "Body");
    }

    #[test]
    fn skips_comments_blank_lines_and_keyless_lines() {
        let parsed = parse_frontmatter("---\n# comment\n\nnot a pair\n: orphan\nkey: value\n---\n");
        let fm = parsed.frontmatter.unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm["key"], "value");
    }

    #[test]
    fn splits_on_first_colon_only() {
        let parsed = parse_frontmatter("---\nurl: http://example.com:8080\n---\n");
        assert_eq!(parsed.frontmatter.unwrap()["url"], "http://example.com:8080");
    }

    #[test]
    fn last_duplicate_key_wins() {
        let parsed = parse_frontmatter("---\nmode: a\nmode: b\n---\n");
        assert_eq!(parsed.frontmatter.unwrap()["mode"], "b");
    }

    #[test]
    fn body_is_not_trimmed() {
        let parsed = parse_frontmatter("---\na: 1\n---\n\n  indented\n\n");
        assert_eq!(parsed.content, "\n  indented\n\n");
    }

    #[tokio::test]
    async fn reads_file_with_frontmatter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("task.md");
        std::fs::write(
            &path,
            "---\ntitle: Integration Test\ndescription: Testing frontmatter parsing\n---\n\nContent after frontmatter.",
        )
        .unwrap();

        let parsed = read_file_with_frontmatter(&path).await.unwrap();
        assert!(parsed.has_frontmatter);
        let fm = parsed.frontmatter.unwrap();
        assert_eq!(fm["title"], "Integration Test");
        assert_eq!(fm["description"], "Testing frontmatter parsing");
        assert_eq!(parsed.content, "\nContent after frontmatter.");
    }

    #[tokio::test]
    async fn read_failure_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");
        let err = read_file_with_frontmatter(&path).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to read file with frontmatter:"));
        assert!(msg.contains("missing.md"));
    }
}
