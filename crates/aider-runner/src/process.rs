use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::executable::find_executable;
use crate::mode::ExecutionMode;
use crate::{Result, RunnerError};

/// How long a child gets between SIGTERM and SIGKILL after a timeout.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_millis(2000);

// ─── SpawnOptions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SpawnOptions {
    /// Log the full command line before spawning.
    pub debug: bool,
    pub cwd: Option<PathBuf>,
    /// Replaces the child's environment entirely. `None` inherits ours.
    pub env: Option<HashMap<String, String>>,
    /// Bind the child to our terminal. When false, stdout and stderr are
    /// piped and forwarded to debug logs.
    pub inherit_stdio: bool,
    pub timeout: Option<Duration>,
    pub kill_grace: Duration,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            debug: false,
            cwd: None,
            env: None,
            inherit_stdio: true,
            timeout: None,
            kill_grace: DEFAULT_KILL_GRACE,
        }
    }
}

// ─── SpawnResult ──────────────────────────────────────────────────────────

/// Outcome of a child that ran to completion (or was terminated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnResult {
    /// Child exit code; `1` when it died from a signal.
    pub exit_code: i32,
    /// Name of the terminating signal, e.g. `SIGTERM`.
    pub signal: Option<String>,
    /// Spawn retries consumed before this run started.
    pub retry_count: u32,
}

impl SpawnResult {
    fn from_status(status: ExitStatus) -> Self {
        Self {
            exit_code: status.code().unwrap_or(1),
            signal: terminating_signal(&status),
            retry_count: 0,
        }
    }
}

// ─── Spawning ─────────────────────────────────────────────────────────────

/// Resolve the executable for `mode` and run it once with `args`.
///
/// Any exit code is a successful outcome here; only a missing executable or
/// a failure to start the process is an error.
pub async fn spawn_command(
    args: &[String],
    opts: &SpawnOptions,
    mode: ExecutionMode,
) -> Result<SpawnResult> {
    let command = mode.command_name();
    let exe = find_executable(mode)
        .await
        .ok_or_else(|| RunnerError::ExecutableNotFound {
            command: command.to_string(),
        })?;
    spawn_resolved(&exe, command, args, opts).await
}

/// Run an already resolved executable. `command` is the logical name used in
/// errors and logs.
pub(crate) async fn spawn_resolved(
    exe: &Path,
    command: &str,
    args: &[String],
    opts: &SpawnOptions,
) -> Result<SpawnResult> {
    if opts.debug {
        tracing::debug!(exe = %exe.display(), ?args, "executing {command}");
    }

    let mut child = build_command(exe, args, opts)
        .spawn()
        .map_err(|source| RunnerError::ProcessExecution {
            command: command.to_string(),
            source,
        })?;

    if !opts.inherit_stdio {
        if let Some(stdout) = child.stdout.take() {
            forward_to_log(stdout, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            forward_to_log(stderr, "stderr");
        }
    }

    let status = supervise(&mut child, opts.timeout, opts.kill_grace).await?;
    let result = SpawnResult::from_status(status);
    tracing::debug!(
        exit_code = result.exit_code,
        signal = result.signal.as_deref().unwrap_or("none"),
        "{command} exited"
    );
    Ok(result)
}

fn build_command(exe: &Path, args: &[String], opts: &SpawnOptions) -> Command {
    let mut cmd = Command::new(exe);
    cmd.args(args);

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    if let Some(env) = &opts.env {
        cmd.env_clear().envs(env);
    }

    if opts.inherit_stdio {
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
    } else {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
    }

    cmd
}

/// Drain a piped stream line by line into debug logs. The task is detached:
/// a grandchild holding the pipe open must not keep us waiting.
fn forward_to_log<R>(stream: R, name: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::debug!(stream = name, "{line}");
        }
    });
}

// ─── Timeout escalation ───────────────────────────────────────────────────

#[derive(Debug)]
enum ChildState {
    Running,
    TimedOut,
    Terminating,
    Killed,
    Exited(ExitStatus),
}

/// Wait for the child, escalating SIGTERM then SIGKILL once `timeout` expires.
async fn supervise(
    child: &mut Child,
    timeout: Option<Duration>,
    grace: Duration,
) -> std::io::Result<ExitStatus> {
    let mut state = ChildState::Running;
    loop {
        state = match state {
            ChildState::Running => match timeout {
                None => ChildState::Exited(child.wait().await?),
                Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                    Ok(status) => ChildState::Exited(status?),
                    Err(_) => ChildState::TimedOut,
                },
            },
            ChildState::TimedOut => {
                tracing::warn!(
                    timeout_ms = timeout.map(|t| t.as_millis() as u64).unwrap_or_default(),
                    "process timed out, sending SIGTERM"
                );
                terminate(child);
                ChildState::Terminating
            }
            ChildState::Terminating => match tokio::time::timeout(grace, child.wait()).await {
                Ok(status) => ChildState::Exited(status?),
                Err(_) => {
                    tracing::warn!(
                        grace_ms = grace.as_millis() as u64,
                        "process ignored SIGTERM, sending SIGKILL"
                    );
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(error = %e, "SIGKILL failed");
                    }
                    ChildState::Killed
                }
            },
            ChildState::Killed => ChildState::Exited(child.wait().await?),
            ChildState::Exited(status) => return Ok(status),
        };
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
    // `id()` is None once the child has been reaped.
    let Some(pid) = child.id() else { return };
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        tracing::debug!(error = %std::io::Error::last_os_error(), "SIGTERM failed");
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "terminate failed");
    }
}

// ─── Signals ──────────────────────────────────────────────────────────────

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<String> {
    None
}

#[cfg(unix)]
pub(crate) fn signal_name(signal: i32) -> String {
    let name = match signal {
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGABRT => "SIGABRT",
        libc::SIGKILL => "SIGKILL",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGUSR2 => "SIGUSR2",
        other => return format!("SIG{other}"),
    };
    name.to_string()
}
