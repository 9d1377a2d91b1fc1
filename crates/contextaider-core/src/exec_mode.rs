//! Exec mode: one file's content becomes the primary instruction for aider.

use crate::error::CoreError;
use crate::file_args::file_exists;
use crate::frontmatter::{read_file_with_frontmatter, Frontmatter};
use std::path::{Path, PathBuf};

/// aider flag that reads the initial chat message from a file.
pub const MESSAGE_FILE_FLAG: &str = "--message-file";

#[derive(Debug, Clone)]
pub struct ExecModeOptions {
    pub exec_file: PathBuf,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecPlan {
    pub file_path: PathBuf,
    pub has_frontmatter: bool,
    pub frontmatter: Option<Frontmatter>,
    pub aider_args: Vec<String>,
}

/// Outcome of preparing an exec file.
///
/// Failures are data, not errors: the caller decides whether a broken exec
/// file stops the run.
#[derive(Debug)]
pub enum ExecModeResult {
    Ready(ExecPlan),
    Failed { file_path: PathBuf, error: CoreError },
}

impl ExecModeResult {
    pub fn file_path(&self) -> &Path {
        match self {
            ExecModeResult::Ready(plan) => &plan.file_path,
            ExecModeResult::Failed { file_path, .. } => file_path,
        }
    }

    /// Arguments to hand to aider; empty on failure.
    pub fn aider_args(&self) -> &[String] {
        match self {
            ExecModeResult::Ready(plan) => &plan.aider_args,
            ExecModeResult::Failed { .. } => &[],
        }
    }

    pub fn has_frontmatter(&self) -> bool {
        matches!(self, ExecModeResult::Ready(plan) if plan.has_frontmatter)
    }

    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        match self {
            ExecModeResult::Ready(plan) => plan.frontmatter.as_ref(),
            ExecModeResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            ExecModeResult::Ready(_) => None,
            ExecModeResult::Failed { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> crate::Result<ExecPlan> {
        match self {
            ExecModeResult::Ready(plan) => Ok(plan),
            ExecModeResult::Failed { error, .. } => Err(error),
        }
    }
}

/// Validate the exec file and build the aider arguments for it.
///
/// The frontmatter is parsed and reported but does not change the arguments:
/// aider always receives `--message-file <path>`.
pub async fn process_exec_mode(options: &ExecModeOptions) -> ExecModeResult {
    let file_path = options.exec_file.clone();

    if !file_exists(&file_path).await {
        let error = CoreError::ExecFileNotFound(file_path.clone());
        tracing::error!("Error processing exec file: {error}");
        return ExecModeResult::Failed { file_path, error };
    }

    let parsed = match read_file_with_frontmatter(&file_path).await {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::error!("Error processing exec file: {error}");
            return ExecModeResult::Failed { file_path, error };
        }
    };

    if parsed.has_frontmatter {
        tracing::info!(path = %file_path.display(), "Exec frontmatter detected");
        if options.debug {
            if let Some(fm) = &parsed.frontmatter {
                for (key, value) in fm {
                    tracing::debug!(key = %key, value = %value, "frontmatter field");
                }
            }
        }
    }

    let aider_args = vec![
        MESSAGE_FILE_FLAG.to_string(),
        file_path.to_string_lossy().into_owned(),
    ];

    ExecModeResult::Ready(ExecPlan {
        file_path,
        has_frontmatter: parsed.has_frontmatter,
        frontmatter: parsed.frontmatter,
        aider_args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(path: PathBuf) -> ExecModeOptions {
        ExecModeOptions {
            exec_file: path,
            debug: false,
        }
    }

    #[tokio::test]
    async fn plain_file_yields_message_file_args() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("task.md");
        std::fs::write(&path, "Refactor the parser.").unwrap();

        let result = process_exec_mode(&options(path.clone())).await;
        assert!(result.error().is_none());
        assert!(!result.has_frontmatter());
        assert!(result.frontmatter().is_none());
        assert_eq!(
            result.aider_args(),
            ["--message-file".to_string(), path.to_string_lossy().into_owned()]
        );
    }

    #[tokio::test]
    async fn frontmatter_does_not_change_args() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("task.md");
        std::fs::write(&path, "---\nmodel: gpt-4\n---\nDo it.").unwrap();

        let result = process_exec_mode(&options(path.clone())).await;
        assert!(result.has_frontmatter());
        assert_eq!(result.frontmatter().unwrap()["model"], "gpt-4");
        assert_eq!(result.aider_args()[0], "--message-file");
        assert_eq!(result.aider_args().len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.md");

        let result = process_exec_mode(&options(path.clone())).await;
        assert!(result.aider_args().is_empty());
        assert!(!result.has_frontmatter());
        assert_eq!(result.file_path(), path.as_path());
        let msg = result.error().unwrap().to_string();
        assert_eq!(msg, format!("Exec file not found: {}", path.display()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn directory_read_failure_is_propagated() {
        let dir = TempDir::new().unwrap();
        // A directory opens on unix but cannot be read as text.
        let result = process_exec_mode(&options(dir.path().to_path_buf())).await;
        assert!(result.aider_args().is_empty());
        assert!(result.error().is_some());
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("task.md");
        std::fs::write(&path, "---\ntitle: T\n---\nBody").unwrap();

        let first = process_exec_mode(&options(path.clone())).await;
        let second = process_exec_mode(&options(path)).await;
        assert_eq!(first.aider_args(), second.aider_args());
        assert_eq!(first.has_frontmatter(), second.has_frontmatter());
    }

    #[tokio::test]
    async fn into_result_surfaces_the_error() {
        let dir = TempDir::new().unwrap();
        let err = process_exec_mode(&options(dir.path().join("gone.md")))
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, CoreError::ExecFileNotFound(_)));
    }
}
