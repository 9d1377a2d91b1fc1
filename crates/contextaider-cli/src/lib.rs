//! Shared plumbing for the `contextaider` and `codex` binaries.

pub mod cmd;
pub mod output;
pub mod root;

use contextaider_core::CoreError;

/// Install the stderr `tracing` subscriber. `RUST_LOG` directives are
/// honored on top of the default level.
pub fn init_logging(debug: bool) {
    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<CoreError>())
        .map(CoreError::exit_code)
        .unwrap_or(1)
}

/// Print a failure and exit. The debug representation is only shown when
/// `debug` is set.
pub fn fail(err: anyhow::Error, debug: bool) -> ! {
    eprintln!("error: {err:#}");
    if debug {
        eprintln!("{err:?}");
    }
    std::process::exit(exit_code(&err));
}
