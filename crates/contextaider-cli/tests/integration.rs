#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn contextaider(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("contextaider").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("CONTEXT_AIDER_ECHO_MODE")
        .env_remove("CONTEXT_AIDER_DEBUG")
        .env("CI", "1");
    cmd
}

fn codex(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("codex").unwrap();
    cmd.current_dir(dir.path())
        .env("CONTEXTASCODE_ROOT", dir.path());
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn planned(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = contextaider(dir)
        .arg("--print-args")
        .args(args)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// contextaider --print-args
// ---------------------------------------------------------------------------

#[test]
fn print_args_defaults_to_echo_mode() {
    let dir = TempDir::new().unwrap();
    let plan = planned(&dir, &["just a message"]);
    assert_eq!(plan["mode"], "dry_run");
    assert_eq!(plan["command"], "echo");
    assert_eq!(plan["args"], serde_json::json!(["--message", "just a message"]));
}

#[test]
fn print_args_real_mode_when_echo_disabled() {
    let dir = TempDir::new().unwrap();
    let out = contextaider(&dir)
        .env("CONTEXT_AIDER_ECHO_MODE", "false")
        .args(["--print-args", "hello"])
        .output()
        .unwrap();
    let plan: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(plan["mode"], "real");
    assert_eq!(plan["command"], "aider");
}

#[test]
fn first_existing_file_becomes_exec_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "task.md", "---\ntitle: Task\n---\nDo the thing\n");
    write(&dir, "notes.md", "notes\n");

    let plan = planned(&dir, &["task.md", "notes.md"]);
    assert_eq!(plan["has_frontmatter"], true);
    let args: Vec<String> = serde_json::from_value(plan["args"].clone()).unwrap();
    assert_eq!(args[0], "--message-file");
    assert!(args[1].ends_with("task.md"), "{args:?}");
    assert!(args[2].ends_with("notes.md"), "{args:?}");
    assert_eq!(args.len(), 3);
}

#[test]
fn passthrough_flags_are_translated() {
    let dir = TempDir::new().unwrap();
    let plan = planned(
        &dir,
        &["fix it", "--", "--auto-approve", "--model", "gpt-4", "--context=api.md"],
    );
    assert_eq!(
        plan["args"],
        serde_json::json!([
            "--message",
            "fix it",
            "--yes-always",
            "--model",
            "gpt-4",
            "--read=api.md"
        ])
    );
}

#[test]
fn separator_after_file_input_forwards_aider_flags() {
    let dir = TempDir::new().unwrap();
    write(&dir, "task.md", "Do the thing\n");

    let plan = planned(&dir, &["task.md", "--", "--model", "gpt-4"]);
    let args: Vec<String> = serde_json::from_value(plan["args"].clone()).unwrap();
    assert_eq!(args.len(), 4, "{args:?}");
    assert_eq!(args[0], "--message-file");
    assert!(args[1].ends_with("task.md"), "{args:?}");
    assert_eq!(args[2..], ["--model", "gpt-4"]);
    assert!(plan["message"].is_null());
}

#[test]
fn inline_flag_keeps_its_value() {
    let dir = TempDir::new().unwrap();
    write(&dir, "task.md", "Do the thing\n");
    write(&dir, "api.md", "api\n");

    let plan = planned(&dir, &["task.md", "--context", "api.md"]);
    let args: Vec<String> = serde_json::from_value(plan["args"].clone()).unwrap();
    assert_eq!(args.len(), 3, "{args:?}");
    assert!(args[1].ends_with("task.md"), "{args:?}");
    assert_eq!(args[2], "--read=api.md");
    assert!(plan["message"].is_null());
    assert_eq!(plan["additional_files"], serde_json::json!([]));
}

#[test]
fn message_follows_exec_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "task.md", "Do the thing\n");
    let plan = planned(&dir, &["--exec", "task.md", "extra words"]);
    assert_eq!(plan["message"], "extra words");
    assert_eq!(
        plan["args"],
        serde_json::json!(["--message-file", "task.md", "--message", "extra words"])
    );
}

// ---------------------------------------------------------------------------
// contextaider execution
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn dry_run_echoes_aider_arguments() {
    let dir = TempDir::new().unwrap();
    write(&dir, "task.md", "Do the thing\n");
    contextaider(&dir)
        .args(["--dry-run", "--exec", "task.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--message-file task.md"));
}

#[test]
fn missing_exec_file_fails() {
    let dir = TempDir::new().unwrap();
    contextaider(&dir)
        .args(["--dry-run", "--exec", "missing.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Exec file not found"));
}

#[test]
fn missing_executable_reports_command() {
    let dir = TempDir::new().unwrap();
    contextaider(&dir)
        .env("CONTEXT_AIDER_ECHO_MODE", "false")
        .env("PATH", "")
        .arg("hello")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Could not find aider executable in PATH",
        ));
}

#[cfg(unix)]
#[test]
fn child_exit_code_is_surfaced() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let aider = bin.path().join("aider");
    std::fs::write(&aider, "#!/bin/sh\nexit 4\n").unwrap();
    std::fs::set_permissions(&aider, std::fs::Permissions::from_mode(0o755)).unwrap();

    contextaider(&dir)
        .env("CONTEXT_AIDER_ECHO_MODE", "0")
        .env("PATH", bin.path())
        .arg("hello")
        .assert()
        .code(4);
}

// ---------------------------------------------------------------------------
// codex new
// ---------------------------------------------------------------------------

#[test]
fn new_change_writes_changelog_entry() {
    let dir = TempDir::new().unwrap();
    codex(&dir)
        .args(["new", "change", "Add login page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created change: context/changelog/"));

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("context/changelog"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with("_Add_login_page.md"), "{entries:?}");
}

#[test]
fn new_prompt_uses_template_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "context/prompts/contextascode/templates/prompt.md",
        "# ${title}\n\nDescribe the task.\n",
    );

    codex(&dir)
        .args(["new", "prompt", "Review code"])
        .assert()
        .success();
    let content =
        std::fs::read_to_string(dir.path().join("context/prompts/Review_code.md")).unwrap();
    assert_eq!(content, "# Review code\n\nDescribe the task.\n");

    codex(&dir)
        .args(["new", "prompt", "Review code"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Prompt already exists"));
}

#[test]
fn new_json_reports_path() {
    let dir = TempDir::new().unwrap();
    let out = codex(&dir)
        .args(["--json", "new", "change", "Tidy"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let created: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(created["template_defaulted"], true);
    assert!(created["path"].as_str().unwrap().ends_with("_Tidy.md"));
}

#[test]
fn new_rejects_unknown_type() {
    let dir = TempDir::new().unwrap();
    codex(&dir)
        .args(["new", "feature", "Something"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Type must be 'change' or 'prompt', received 'feature'",
        ));
}
