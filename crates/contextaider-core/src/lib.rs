//! Core of `contextaider`: argument routing, exec files, frontmatter, flag
//! translation and `codex` scaffolding. No process spawning happens here.

pub mod config;
pub mod error;
pub mod exec_mode;
pub mod file_args;
pub mod flags;
pub mod frontmatter;
pub mod invocation;
pub mod io;
pub mod scaffold;

pub use config::ScaffoldConfig;
pub use error::{CoreError, Result};
pub use exec_mode::{process_exec_mode, ExecModeOptions, ExecModeResult, ExecPlan};
pub use file_args::{classify_args, process_args, ArgumentClassification, ProcessedArguments};
pub use flags::{partition_flags, translate_flags, FlagMapping, FLAG_MAPPINGS};
pub use frontmatter::{has_frontmatter, parse_frontmatter, Frontmatter, FrontmatterParseResult};
pub use invocation::{dry_run_requested, plan_invocation, Invocation, InvocationRequest};
pub use scaffold::{new_item, ItemKind, Scaffolded};
