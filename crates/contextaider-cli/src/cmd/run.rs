use aider_runner::{
    check_aider_version, spawn_aider, ExecutionMode, RetryPolicy, SpawnAiderOptions, SpawnOptions,
    MIN_AIDER_VERSION,
};
use anyhow::Context;
use contextaider_core::{dry_run_requested, plan_invocation, Invocation, InvocationRequest};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::output::print_json;

// ---------------------------------------------------------------------------
// RunArgs
// ---------------------------------------------------------------------------

/// Everything `contextaider` was asked to do, after clap parsing.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub exec: Option<PathBuf>,
    pub inputs: Vec<String>,
    pub passthrough: Vec<String>,
    pub dry_run: bool,
    pub echo_mode: Option<String>,
    pub debug: bool,
    pub max_retries: u32,
    pub timeout_ms: Option<u64>,
    pub print_args: bool,
    pub skip_version_check: bool,
}

impl RunArgs {
    /// `--dry-run` counts wherever it appears, including among the inputs
    /// and after `--`.
    pub fn mode(&self) -> ExecutionMode {
        let dry_run = self.dry_run
            || dry_run_requested(&self.inputs)
            || dry_run_requested(&self.passthrough);
        ExecutionMode::resolve(self.echo_mode.as_deref(), dry_run)
    }

    fn request(&self) -> InvocationRequest {
        InvocationRequest {
            exec: self.exec.clone(),
            inputs: self.inputs.clone(),
            passthrough: self.passthrough.clone(),
            debug: self.debug,
        }
    }

    fn spawn_options(&self) -> SpawnAiderOptions {
        SpawnAiderOptions {
            spawn: SpawnOptions {
                debug: self.debug,
                timeout: self.timeout_ms.map(Duration::from_millis),
                ..Default::default()
            },
            retry: RetryPolicy::with_retries(self.max_retries),
        }
    }
}

/// Split raw argv at the first `--`. The left side goes to clap; the right
/// side is forwarded to aider without clap ever seeing it.
pub fn split_passthrough<I>(argv: I) -> (Vec<OsString>, Vec<String>)
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut own = Vec::new();
    let mut rest = argv.into_iter().map(Into::into);
    for arg in rest.by_ref() {
        if arg == "--" {
            break;
        }
        own.push(arg);
    }
    let passthrough = rest.map(|a| a.to_string_lossy().into_owned()).collect();
    (own, passthrough)
}

/// What `--print-args` emits.
#[derive(Debug, Serialize)]
struct PlannedRun<'a> {
    mode: ExecutionMode,
    command: &'static str,
    #[serde(flatten)]
    invocation: &'a Invocation,
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Plan the aider invocation and run it. Returns the child's exit code.
pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(run_async(args))
}

async fn run_async(args: RunArgs) -> anyhow::Result<i32> {
    let mode = args.mode();
    tracing::debug!(%mode, "execution mode");

    let invocation = plan_invocation(&args.request()).await?;
    tracing::debug!(args = ?invocation.args, "aider arguments");

    if args.print_args {
        print_json(&PlannedRun {
            mode,
            command: mode.command_name(),
            invocation: &invocation,
        })?;
        return Ok(0);
    }

    if mode == ExecutionMode::Real && !args.skip_version_check {
        if let Some(warning) = check_aider_version(MIN_AIDER_VERSION).await.advisory() {
            tracing::warn!("{warning}");
        }
    }

    let result = spawn_aider(&invocation.args, &args.spawn_options(), mode).await?;
    if let Some(signal) = &result.signal {
        tracing::warn!(%signal, "{} terminated by signal", mode.command_name());
    }
    if result.retry_count > 0 {
        tracing::info!(retries = result.retry_count, "started after retries");
    }
    Ok(result.exit_code)
}
