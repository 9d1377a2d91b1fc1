//! `aider-runner`: locate and drive the `aider` subprocess.
//!
//! # Architecture
//!
//! ```text
//! ExecutionMode        ← Real (aider) or DryRun (echo stand-in)
//!     │
//!     ▼
//! find_executable      ← sequential PATH probe, first hit wins
//!     │
//!     ▼
//! spawn_command        ← one child: stdio, timeout escalation, exit code
//!     │
//!     ▼
//! spawn_aider          ← retries spawn failures with capped backoff
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use aider_runner::{spawn_aider, ExecutionMode, SpawnAiderOptions};
//!
//! let args = vec!["--message".to_string(), "hello".to_string()];
//! let echo = std::env::var(aider_runner::ECHO_MODE_ENV).ok();
//! let mode = ExecutionMode::resolve(echo.as_deref(), false);
//! let result = spawn_aider(&args, &SpawnAiderOptions::default(), mode).await?;
//! std::process::exit(result.exit_code);
//! ```

pub mod error;
pub mod executable;
pub mod mode;
pub mod process;
pub mod runner;
pub mod version;


pub use error::RunnerError;
pub use executable::{find_executable, find_executable_in};
pub use mode::{ExecutionMode, ECHO_MODE_ENV};
pub use process::{spawn_command, SpawnOptions, SpawnResult, DEFAULT_KILL_GRACE};
pub use runner::{retry_spawn, spawn_aider, RetryPolicy, SpawnAiderOptions};
pub use version::{check_aider_version, VersionCheck, MIN_AIDER_VERSION};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, RunnerError>;
