//! Assemble the final aider argument list from a contextaider command line.

use crate::error::Result;
use crate::exec_mode::{process_exec_mode, ExecModeOptions, ExecPlan};
use crate::file_args::{process_args, ProcessedArguments};
use crate::flags::{partition_flags, translate_flags};
use serde::Serialize;
use std::path::PathBuf;

/// aider flag carrying a one-shot chat message.
pub const MESSAGE_FLAG: &str = "--message";

/// Wrapper-only flag forcing the diagnostic stand-in; never forwarded.
pub const DRY_RUN_FLAG: &str = "--dry-run";

#[derive(Debug, Clone, Default)]
pub struct InvocationRequest {
    /// Explicit `--exec <file>`; skips first-file detection.
    pub exec: Option<PathBuf>,
    /// Positional tokens: files, an optional trailing message, and any
    /// flags mixed in among them.
    pub inputs: Vec<String>,
    /// Tokens after `--`, translated and forwarded.
    pub passthrough: Vec<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub exec_file: Option<PathBuf>,
    pub has_frontmatter: bool,
    pub additional_files: Vec<PathBuf>,
    pub message: Option<String>,
    pub args: Vec<String>,
}

/// Was `--dry-run` given anywhere on the raw command line?
pub fn dry_run_requested<S: AsRef<str>>(raw: &[S]) -> bool {
    raw.iter().any(|a| a.as_ref() == DRY_RUN_FLAG)
}

/// Route the request, prepare the exec file, and merge everything into the
/// argument list aider will receive.
///
/// Order: exec args, additional files, `--message`, then translated flags.
/// A broken exec file aborts with its error.
pub async fn plan_invocation(request: &InvocationRequest) -> Result<Invocation> {
    let (positionals, inline_flags) = partition_flags(&request.inputs);

    let (exec_path, routed) = match &request.exec {
        Some(explicit) => {
            let mut routed = process_args(&positionals).await;
            // Everything readable is context when the exec file is explicit.
            if let Some(first) = routed.exec_file.take() {
                routed.additional_files.insert(0, first);
            }
            (Some(explicit.clone()), routed)
        }
        None => {
            let mut routed = process_args(&positionals).await;
            (routed.exec_file.take(), routed)
        }
    };

    let plan = match exec_path {
        Some(exec_file) => {
            let options = ExecModeOptions {
                exec_file,
                debug: request.debug,
            };
            Some(process_exec_mode(&options).await.into_result()?)
        }
        None => None,
    };

    Ok(assemble(plan, routed, &inline_flags, &request.passthrough))
}

fn assemble(
    plan: Option<ExecPlan>,
    routed: ProcessedArguments,
    inline_flags: &[String],
    passthrough: &[String],
) -> Invocation {
    let ProcessedArguments {
        additional_files,
        message,
        ..
    } = routed;

    let mut args = Vec::new();

    if let Some(plan) = &plan {
        args.extend(plan.aider_args.iter().cloned());
    }
    args.extend(
        additional_files
            .iter()
            .map(|p| p.to_string_lossy().into_owned()),
    );
    if let Some(msg) = &message {
        args.push(MESSAGE_FLAG.to_string());
        args.push(msg.clone());
    }

    // Translated per source so a trailing inline flag never takes its value
    // from the passthrough tokens.
    for flags in [inline_flags, passthrough] {
        let kept: Vec<&String> = flags.iter().filter(|t| t.as_str() != DRY_RUN_FLAG).collect();
        args.extend(translate_flags(&kept));
    }

    Invocation {
        exec_file: plan.as_ref().map(|p| p.file_path.clone()),
        has_frontmatter: plan.as_ref().is_some_and(|p| p.has_frontmatter),
        additional_files,
        message,
        args,
    }
}
