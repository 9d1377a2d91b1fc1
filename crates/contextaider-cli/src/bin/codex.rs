use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use contextaider_cli::{cmd, root};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codex",
    about = "Scaffold changelog entries and prompts for a context-as-code project",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from context/ or .git/)
    #[arg(long, global = true, env = "CONTEXTASCODE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Verbose logging to stderr
    #[arg(long, global = true, env = "CONTEXT_AIDER_DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a changelog entry or a prompt from its template
    New {
        /// Item type: change or prompt
        #[arg(value_name = "TYPE")]
        kind: String,

        /// Description; prompted for when omitted
        description: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    contextaider_cli::init_logging(cli.debug);

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::New { kind, description } => cmd::new::run(&root, &kind, description, cli.json),
    };

    if let Err(e) = result {
        contextaider_cli::fail(e, cli.debug);
    }
}
