use aider_runner::ECHO_MODE_ENV;
use clap::builder::FalseyValueParser;
use clap::Parser;
use contextaider_cli::cmd::run::{self, RunArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "contextaider",
    about = "Run aider with an exec file, extra context files and translated flags",
    override_usage = "contextaider [OPTIONS] [INPUTS]... [-- PASSTHROUGH...]",
    after_help = "Everything after `--` is flag-translated and forwarded to aider.",
    version
)]
struct Cli {
    /// Markdown file whose contents become aider's instruction
    #[arg(long, value_name = "FILE")]
    exec: Option<PathBuf>,

    /// Run the echo stand-in instead of aider
    #[arg(long)]
    dry_run: bool,

    /// Use the echo stand-in unless this is exactly "false" or "0"
    #[arg(long, env = ECHO_MODE_ENV, value_name = "VALUE")]
    echo_mode: Option<String>,

    /// Verbose logging to stderr
    #[arg(long, env = "CONTEXT_AIDER_DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    /// Retry a failed spawn this many times with exponential backoff
    #[arg(long, default_value_t = 0, value_name = "N")]
    max_retries: u32,

    /// Terminate aider after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Print the planned invocation as JSON and exit
    #[arg(long)]
    print_args: bool,

    /// Skip the installed-aider version advisory
    #[arg(long, env = "CI", hide_env_values = true, value_parser = FalseyValueParser::new())]
    skip_version_check: bool,

    /// Files to add to the chat, an optional trailing message, and aider flags
    #[arg(value_name = "INPUTS", allow_hyphen_values = true)]
    inputs: Vec<String>,
}

fn main() {
    let (own, passthrough) = run::split_passthrough(std::env::args_os());
    let cli = Cli::parse_from(own);
    contextaider_cli::init_logging(cli.debug);

    let debug = cli.debug;
    let args = RunArgs {
        exec: cli.exec,
        inputs: cli.inputs,
        passthrough,
        dry_run: cli.dry_run,
        echo_mode: cli.echo_mode,
        debug: cli.debug,
        max_retries: cli.max_retries,
        timeout_ms: cli.timeout,
        print_args: cli.print_args,
        skip_version_check: cli.skip_version_check,
    };

    match run::run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => contextaider_cli::fail(e, debug),
    }
}
