use serde::Serialize;
use std::path::Path;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// `path` relative to `root` when it lives underneath it.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_shown_relative_to_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            display_path(root, Path::new("/work/project/context/prompts/a.md")),
            "context/prompts/a.md"
        );
        assert_eq!(display_path(root, Path::new("/elsewhere/b.md")), "/elsewhere/b.md");
    }
}
