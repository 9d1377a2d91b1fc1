//! Split raw command-line tokens into files, a trailing message, and flags.

use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgumentClassification {
    /// Absolute paths of tokens that name readable files, in input order.
    pub valid_files: Vec<PathBuf>,
    /// Non-flag tokens that are not readable files, unmodified, in input order.
    pub invalid_paths: Vec<String>,
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// True when `path` exists and can be opened for reading.
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::File::open(path).await.is_ok()
}

/// Classify every non-flag token as a readable file or an invalid path.
///
/// Tokens starting with `-` are skipped entirely. Filesystem errors are
/// never surfaced: an unreadable token simply lands in `invalid_paths`.
pub async fn classify_args<S: AsRef<str>>(tokens: &[S]) -> ArgumentClassification {
    let mut result = ArgumentClassification::default();
    for token in tokens {
        let token = token.as_ref();
        if is_flag(token) {
            continue;
        }
        let path = Path::new(token);
        if !token.is_empty() && file_exists(path).await {
            match std::path::absolute(path) {
                Ok(abs) => {
                    tracing::debug!(token, path = %abs.display(), "classified as file");
                    result.valid_files.push(abs);
                    continue;
                }
                Err(e) => tracing::debug!(token, error = %e, "could not resolve path"),
            }
        }
        result.invalid_paths.push(token.to_string());
    }
    result
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedArguments {
    /// First readable file; its content is the primary instruction.
    pub exec_file: Option<PathBuf>,
    pub additional_files: Vec<PathBuf>,
    /// Last non-file token, when it is not a flag.
    pub message: Option<String>,
}

impl From<ArgumentClassification> for ProcessedArguments {
    fn from(classified: ArgumentClassification) -> Self {
        let mut files = classified.valid_files.into_iter();
        let exec_file = files.next();
        let additional_files = files.collect();
        let message = classified
            .invalid_paths
            .last()
            .filter(|last| !is_flag(last))
            .cloned();
        ProcessedArguments {
            exec_file,
            additional_files,
            message,
        }
    }
}

pub async fn process_args<S: AsRef<str>>(tokens: &[S]) -> ProcessedArguments {
    let processed = ProcessedArguments::from(classify_args(tokens).await);
    tracing::debug!(
        exec_file = ?processed.exec_file,
        additional = processed.additional_files.len(),
        has_message = processed.message.is_some(),
        "routed arguments"
    );
    processed
}
