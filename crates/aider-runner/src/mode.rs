use serde::Serialize;
use std::fmt;

/// Environment variable selecting the diagnostic stand-in (`echo`).
pub const ECHO_MODE_ENV: &str = "CONTEXT_AIDER_ECHO_MODE";

/// Which binary the runner targets. Resolved once at startup and passed
/// explicitly to the resolver and the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// The real `aider` binary.
    Real,
    /// The `echo` stand-in: prints the arguments aider would have received.
    DryRun,
}

impl ExecutionMode {
    /// Pick the mode from the echo-mode setting and the `--dry-run` flag.
    ///
    /// `--dry-run` always wins. Otherwise echo mode is on unless the setting
    /// is exactly `"false"` or `"0"`; an unset variable means echo mode.
    pub fn resolve(echo_mode: Option<&str>, dry_run: bool) -> Self {
        if dry_run {
            return ExecutionMode::DryRun;
        }
        match echo_mode {
            Some("false") | Some("0") => ExecutionMode::Real,
            _ => ExecutionMode::DryRun,
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            ExecutionMode::Real => "aider",
            ExecutionMode::DryRun => "echo",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Real => f.write_str("real"),
            ExecutionMode::DryRun => f.write_str("dry-run"),
        }
    }
}
