use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("{message} (path: {})", .path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to read file: {source} (path: {})", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Exec file not found: {}", .0.display())]
    ExecFileNotFound(PathBuf),

    #[error("Failed to read file with frontmatter: {0}")]
    Frontmatter(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Build a `FileSystem` error from an I/O failure on `path`.
    pub fn fs(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::FileSystem {
            message: format!("{}: {source}", message.into()),
            path: path.into(),
            source: Some(source),
        }
    }

    /// Process exit code for this error class.
    ///
    /// Validation → 1, filesystem → 2, cancellation → 130 (same as SIGINT),
    /// anything else → 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Validation(_) => 1,
            CoreError::FileSystem { .. } | CoreError::FileRead { .. } => 2,
            CoreError::UserCancelled => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
