use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional per-project override file, relative to the project root.
pub const CONFIG_FILE: &str = ".contextascode.yaml";

/// Directory whose presence marks a project root.
pub const CONTEXT_DIR: &str = "context";

// ---------------------------------------------------------------------------
// ScaffoldConfig
// ---------------------------------------------------------------------------

/// Where `codex new` writes files and which templates it reads.
///
/// All paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default = "default_changelog_dir")]
    pub changelog_dir: PathBuf,
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
    #[serde(default = "default_changelog_template")]
    pub changelog_template: PathBuf,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: PathBuf,
}

fn default_changelog_dir() -> PathBuf {
    PathBuf::from("context/changelog")
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("context/prompts")
}

fn default_changelog_template() -> PathBuf {
    PathBuf::from("context/prompts/contextascode/templates/changelog.md")
}

fn default_prompt_template() -> PathBuf {
    PathBuf::from("context/prompts/contextascode/templates/prompt.md")
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            changelog_dir: default_changelog_dir(),
            prompts_dir: default_prompts_dir(),
            changelog_template: default_changelog_template(),
            prompt_template: default_prompt_template(),
        }
    }
}

impl ScaffoldConfig {
    /// Load `<root>/.contextascode.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: ScaffoldConfig = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded scaffold config");
        Ok(cfg)
    }
}
