//! Markdown scaffolding for `codex new`: changelog entries and prompts.

use crate::config::ScaffoldConfig;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Local};
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Change,
    Prompt,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Change => "change",
            ItemKind::Prompt => "prompt",
        }
    }

    /// Template placeholder the description is substituted into.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ItemKind::Change => "message",
            ItemKind::Prompt => "title",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "change" => Ok(ItemKind::Change),
            "prompt" => Ok(ItemKind::Prompt),
            other => Err(CoreError::Validation(format!(
                "Type must be 'change' or 'prompt', received '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s-]").expect("valid regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Drop everything except ASCII alphanumerics, whitespace and `-`, then turn
/// whitespace runs into `_`.
pub fn sanitize_filename(description: &str) -> String {
    let kept = unsafe_chars().replace_all(description, "");
    whitespace_runs().replace_all(&kept, "_").into_owned()
}

/// `YYYYMMDD_HHMMSS_mmm` in local time.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S_%3f").to_string()
}

pub fn timestamp() -> String {
    format_timestamp(Local::now())
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub content: String,
    /// True when the template file was absent and the default was used.
    pub defaulted: bool,
}

/// Substitute `{{ key }}` and `${key}` placeholders.
pub fn render(template: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut content = template.to_string();
    for (key, value) in replacements {
        let key = regex::escape(key);
        for pattern in [format!(r"\{{\{{\s*{key}\s*\}}\}}"), format!(r"\$\{{{key}\}}")] {
            let re = Regex::new(&pattern).expect("escaped placeholder pattern");
            content = re.replace_all(&content, NoExpand(value)).into_owned();
        }
    }
    content
}

/// Load and render `path`, or fall back to `default` when it does not exist.
pub fn load_template(
    path: &Path,
    replacements: &BTreeMap<String, String>,
    default: &str,
) -> Result<Template> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "template missing, using default");
        return Ok(Template {
            content: default.to_string(),
            defaulted: true,
        });
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CoreError::fs("Failed to read template file", path, e))?;
    Ok(Template {
        content: render(&raw, replacements),
        defaulted: false,
    })
}

/// Write `content` to `path`, creating parent directories.
pub fn create_file(path: &Path, content: &str) -> Result<PathBuf> {
    crate::io::atomic_write(path, content.as_bytes())?;
    Ok(path.to_path_buf())
}

// ---------------------------------------------------------------------------
// New items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scaffolded {
    pub path: PathBuf,
    pub template_defaulted: bool,
}

/// Target path for a new item, relative to `root`.
pub fn item_path(root: &Path, config: &ScaffoldConfig, kind: ItemKind, description: &str, stamp: &str) -> PathBuf {
    let name = sanitize_filename(description);
    match kind {
        ItemKind::Change => root
            .join(&config.changelog_dir)
            .join(format!("{stamp}_{name}.md")),
        ItemKind::Prompt => root.join(&config.prompts_dir).join(format!("{name}.md")),
    }
}

/// Create a changelog entry or prompt file from its template.
///
/// Prompts are named after the description alone, so an existing prompt is
/// never overwritten.
pub fn new_item(root: &Path, config: &ScaffoldConfig, kind: ItemKind, description: &str) -> Result<Scaffolded> {
    let description = description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation("Description cannot be empty".into()));
    }
    if sanitize_filename(description).trim_matches('_').is_empty() {
        return Err(CoreError::Validation(
            "Description must contain at least one letter, digit or '-'".into(),
        ));
    }

    let template_path = match kind {
        ItemKind::Change => root.join(&config.changelog_template),
        ItemKind::Prompt => root.join(&config.prompt_template),
    };
    let replacements = BTreeMap::from([(kind.placeholder().to_string(), description.to_string())]);
    let default = format!("# {description}\n\n");
    let template = load_template(&template_path, &replacements, &default)?;

    let path = item_path(root, config, kind, description, &timestamp());
    match kind {
        ItemKind::Change => {
            create_file(&path, &template.content)?;
        }
        ItemKind::Prompt => {
            if !crate::io::write_if_missing(&path, template.content.as_bytes())? {
                return Err(CoreError::FileSystem {
                    message: "Prompt already exists".into(),
                    path,
                    source: None,
                });
            }
        }
    }

    tracing::info!(kind = %kind, path = %path.display(), "scaffolded");
    Ok(Scaffolded {
        path,
        template_defaulted: template.defaulted,
    })
}
