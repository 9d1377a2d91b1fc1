use anyhow::Context;
use contextaider_core::config::ScaffoldConfig;
use contextaider_core::scaffold::{new_item, ItemKind};
use contextaider_core::CoreError;
use inquire::{InquireError, Text};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::output::{display_path, print_json};

/// `codex new <type> [description]`
pub fn run(root: &Path, kind: &str, description: Option<String>, json: bool) -> anyhow::Result<()> {
    let kind: ItemKind = kind.parse()?;
    let config = ScaffoldConfig::load(root).context("failed to load scaffold config")?;

    let description = match description.filter(|d| !d.trim().is_empty()) {
        Some(d) => d,
        None => ask_description(kind)?,
    };

    let created = new_item(root, &config, kind, &description)?;

    if json {
        return print_json(&created);
    }
    println!("Created {kind}: {}", display_path(root, &created.path));
    if created.template_defaulted {
        println!("  (no template found, used default content)");
    }
    Ok(())
}

/// Ask for a description, falling back to a plain stdin line when there is
/// no terminal.
fn ask_description(kind: ItemKind) -> Result<String, CoreError> {
    let message = match kind {
        ItemKind::Change => "Describe the change:",
        ItemKind::Prompt => "Prompt title:",
    };

    match Text::new(message)
        .with_validator(inquire::required!("Description cannot be empty"))
        .prompt()
    {
        Ok(v) => Ok(v),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Err(CoreError::UserCancelled)
        }
        Err(e) => {
            tracing::debug!(error = %e, "interactive prompt unavailable, reading stdin");
            eprint!("? {message} ");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim().to_string())
        }
    }
}
