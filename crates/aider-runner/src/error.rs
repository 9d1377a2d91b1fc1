use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Could not find {command} executable in PATH. Please make sure {command} is installed and available in your PATH.")]
    ExecutableNotFound { command: String },

    #[error("Failed to spawn {command}: {source}")]
    ProcessExecution {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Logical command name (`aider` or `echo`) the error concerns, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            RunnerError::ExecutableNotFound { command }
            | RunnerError::ProcessExecution { command, .. } => Some(command),
            RunnerError::Io(_) => None,
        }
    }
}
