//! Locate the binary to run by walking `PATH`.
//!
//! Probing is strictly sequential: PATH order and candidate order decide
//! precedence, so the first hit wins and nothing is probed concurrently.

use crate::mode::ExecutionMode;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Well-known location of the stand-in on unix. `echo` is usually a shell
/// builtin, so the binary is probed here before PATH.
pub const STAND_IN_PATH: &str = "/bin/echo";

const WINDOWS_EXTENSIONS: [&str; 3] = ["exe", "cmd", "bat"];

/// File names to probe in each PATH directory, in order.
pub fn candidate_names(command: &str, windows: bool) -> Vec<String> {
    if !windows {
        return vec![command.to_string()];
    }
    WINDOWS_EXTENSIONS
        .iter()
        .map(|ext| format!("{command}.{ext}"))
        .chain(std::iter::once(command.to_string()))
        .collect()
}

/// A regular file that, on unix, has at least one execute bit set.
pub async fn is_executable(path: &Path) -> bool {
    let Ok(meta) = tokio::fs::metadata(path).await else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find the executable for `mode` on the current process `PATH`.
pub async fn find_executable(mode: ExecutionMode) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH");
    find_executable_in(mode, path_var.as_deref()).await
}

/// Find the executable for `mode` on an explicit `PATH` value.
///
/// Returns `None` when nothing matches; never errors.
pub async fn find_executable_in(mode: ExecutionMode, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var.unwrap_or_default();
    if path_var.to_string_lossy().trim().is_empty() {
        tracing::debug!("PATH is empty, nothing to search");
        return None;
    }

    if cfg!(not(windows)) && mode == ExecutionMode::DryRun {
        let stand_in = Path::new(STAND_IN_PATH);
        if is_executable(stand_in).await {
            return Some(stand_in.to_path_buf());
        }
    }

    let names = candidate_names(mode.command_name(), cfg!(windows));
    for dir in std::env::split_paths(path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        for name in &names {
            let candidate = dir.join(name);
            if is_executable(&candidate).await {
                tracing::debug!(path = %candidate.display(), "resolved executable");
                return Some(candidate);
            }
        }
    }

    tracing::debug!(command = mode.command_name(), "no executable found on PATH");
    None
}
