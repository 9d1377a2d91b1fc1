//! Advisory check that the installed aider is recent enough.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;

pub const MIN_AIDER_VERSION: &str = "0.18.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    Compatible { path: PathBuf, version: String },
    Outdated { path: PathBuf, version: String, minimum: String },
    /// `aider --version` ran but printed no `x.y.z`.
    Unparseable { path: PathBuf },
    NotFound,
}

impl VersionCheck {
    /// Warning lines to show the user, if any.
    pub fn advisory(&self) -> Option<String> {
        match self {
            VersionCheck::Compatible { .. } => None,
            VersionCheck::Outdated { version, minimum, .. } => Some(format!(
                "contextaider requires aider version {minimum} or higher (found {version}). \
                 Upgrade with: pip install -U aider-chat"
            )),
            VersionCheck::Unparseable { .. } => Some("Could not determine aider version".into()),
            VersionCheck::NotFound => Some(
                "aider not found in PATH. Install it with: pip install aider-chat".into(),
            ),
        }
    }
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid regex"))
}

/// First `major.minor.patch` triple in `output`.
pub fn parse_version(output: &str) -> Option<(u64, u64, u64)> {
    let caps = version_re().captures(output)?;
    let part = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
    Some((part(1)?, part(2)?, part(3)?))
}

fn format_version((major, minor, patch): (u64, u64, u64)) -> String {
    format!("{major}.{minor}.{patch}")
}

/// Locate `aider` on PATH and compare its version against `minimum`.
pub async fn check_aider_version(minimum: &str) -> VersionCheck {
    match which::which("aider") {
        Ok(path) => check_version_at(&path, minimum).await,
        Err(e) => {
            tracing::debug!(error = %e, "aider not on PATH");
            VersionCheck::NotFound
        }
    }
}

/// Run `<path> --version` and classify the result.
pub async fn check_version_at(path: &Path, minimum: &str) -> VersionCheck {
    let output = match Command::new(path).arg("--version").output().await {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to run --version");
            return VersionCheck::NotFound;
        }
    };
    let stdout = String::from_utf8_lossy(&output.stdout);

    let Some(found) = parse_version(&stdout) else {
        return VersionCheck::Unparseable {
            path: path.to_path_buf(),
        };
    };
    let required = parse_version(minimum).unwrap_or((0, 0, 0));
    let version = format_version(found);
    tracing::debug!(%version, "found aider");

    if found >= required {
        VersionCheck::Compatible {
            path: path.to_path_buf(),
            version,
        }
    } else {
        VersionCheck::Outdated {
            path: path.to_path_buf(),
            version,
            minimum: format_version(required),
        }
    }
}
