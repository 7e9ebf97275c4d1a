//! End-to-end tests of the `pioneer` binary.
//!
//! Every test runs inside its own temporary directory with an explicit
//! settings file, so the developer's own settings never leak in.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
    settings: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let settings = dir.path().join("settings.toml");
        let core = dir.path().join("core");
        std::fs::create_dir_all(&core).unwrap();
        std::fs::write(
            &settings,
            format!(
                "core_dir = {:?}\nprojects_dir = {:?}\npio_executable = \"pio-not-installed\"\n",
                core.display().to_string(),
                dir.path().join("Projects").display().to_string(),
            ),
        )
        .unwrap();
        Self { dir, settings }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn project(&self, name: &str, ini: &str) -> PathBuf {
        let root = self.path().join(name);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("platformio.ini"), ini).unwrap();
        root
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pioneer").unwrap();
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.settings);
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(["--output-format", "json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).unwrap()
    }
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    Command::cargo_bin("pioneer")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import-arduino"))
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn unknown_flag_is_usage_error() {
    Command::cargo_bin("pioneer")
        .unwrap()
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2);
}

#[test]
fn missing_explicit_settings_file_is_configuration_error() {
    let sandbox = Sandbox::new();
    Command::cargo_bin("pioneer")
        .unwrap()
        .current_dir(sandbox.path())
        .args(["--config", "absent.toml", "examples"])
        .assert()
        .code(4);
}

#[test]
fn completions_name_the_binary() {
    Command::cargo_bin("pioneer")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pioneer"));
}

// ── settings ──────────────────────────────────────────────────────────────────

#[test]
fn settings_get_reads_the_file() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["settings", "get", "pio_executable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pio_executable = \"pio-not-installed\""));
}

#[test]
fn settings_get_unknown_key_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["settings", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown settings key"));
}

#[test]
fn settings_init_refuses_to_overwrite() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["settings", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    sandbox
        .cmd()
        .args(["settings", "init", "--force"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&sandbox.settings).unwrap();
    assert!(written.contains("pio-not-installed"));
}

// ── catalog ───────────────────────────────────────────────────────────────────

#[test]
fn projects_summarise_given_dirs_and_skip_missing() {
    let sandbox = Sandbox::new();
    sandbox.project(
        "blink",
        "[platformio]\ndescription = Blinks an LED\n\n[env:uno]\nplatform = atmelavr\nboard = uno\n",
    );

    let projects = sandbox.json(&["projects", "blink", "gone"]);
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["envs"], json!(["uno"]));
    assert_eq!(projects[0]["description"], "Blinks an LED");
    assert_eq!(projects[0]["boards"][0]["id"], "uno");
}

#[test]
fn examples_with_empty_core_dir() {
    let sandbox = Sandbox::new();
    assert_eq!(sandbox.json(&["examples"]), json!([]));
    sandbox
        .cmd()
        .arg("examples")
        .assert()
        .success()
        .stdout(predicate::str::contains("No examples found"));
}

// ── project configuration ─────────────────────────────────────────────────────

#[test]
fn config_load_is_literal() {
    let sandbox = Sandbox::new();
    sandbox.project(
        "blink",
        "[env]\nbuild_flags = -DX=${sysenv.HOME}\n\n[env:uno]\nboard = uno\n",
    );

    assert_eq!(
        sandbox.json(&["config", "load", "blink"]),
        json!([
            ["env", [["build_flags", "-DX=${sysenv.HOME}"]]],
            ["env:uno", [["board", "uno"]]]
        ])
    );
}

#[test]
fn config_dump_from_stdin_then_query() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.path().join("fresh")).unwrap();

    sandbox
        .cmd()
        .args(["config", "dump", "fresh", "-"])
        .write_stdin(r#"[["env:uno", [["board", "uno"], ["lib_deps", ["Servo", "Wire"]]]]]"#)
        .assert()
        .success();

    assert_eq!(
        sandbox.json(&["config", "query", "fresh", "get_list", "env:uno", "lib_deps"]),
        json!(["Servo", "Wire"])
    );
    assert_eq!(
        sandbox.json(&["config", "query", "fresh", "envs"]),
        json!(["uno"])
    );
}

#[test]
fn config_description_set_and_clear() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("blink", "[env:uno]\nboard = uno\n");

    sandbox
        .cmd()
        .args(["config", "description", "blink", "Blinks an LED"])
        .assert()
        .success();
    assert_eq!(
        sandbox.json(&["config", "query", "blink", "get", "platformio", "description"]),
        json!("Blinks an LED")
    );

    sandbox
        .cmd()
        .args(["config", "description", "blink", ""])
        .assert()
        .success();
    let ini = std::fs::read_to_string(root.join("platformio.ini")).unwrap();
    assert!(!ini.contains("[platformio]"));
}

#[test]
fn config_query_rejects_mutating_method() {
    let sandbox = Sandbox::new();
    sandbox.project("blink", "[env:uno]\nboard = uno\n");
    sandbox
        .cmd()
        .args(["config", "query", "blink", "save"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("save"));
}

// ── scaffolding and environments ──────────────────────────────────────────────

#[test]
fn describe_outside_project_reports_code() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["describe", "--env", "uno"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[4002]"));
}

#[test]
fn describe_unresolved_platform_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.project("blink", "[env:uno]\nplatform = atmelavr\nboard = uno\n");
    sandbox
        .cmd()
        .args(["describe", "--project", "blink", "--env", "uno"])
        .assert()
        .code(3);
}

#[test]
fn import_arduino_rejects_folder_without_sketch() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.path().join("notes")).unwrap();
    std::fs::write(sandbox.path().join("notes/readme.txt"), "hi").unwrap();

    sandbox
        .cmd()
        .args(["import-arduino", "notes", "--board", "uno"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[4000]"));
    assert!(!sandbox.path().join("Projects").exists());
}

#[test]
fn new_with_malformed_request_is_user_error() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.path().join("request.json"), "{ not json").unwrap();
    sandbox
        .cmd()
        .args(["new", "--request", "request.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parsing request"));
}

#[test]
fn new_with_missing_tool_fails_after_creating_dir() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["new", "blink", "--platform", "native"])
        .assert()
        .failure();
    assert!(sandbox.path().join("blink").is_dir());
}
