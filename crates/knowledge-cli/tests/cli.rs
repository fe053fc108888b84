use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn knowledge_system(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("knowledge-system").expect("bin");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn init(dir: &Path) {
    knowledge_system(dir)
        .args(["init", "--yes"])
        .assert()
        .success();
}

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

fn guide(id: &str, watched: &str) -> String {
    format!(
        "---\nid: {id}\ntitle: {id}\nlast_verified: 2024-01-01\nwatched_paths: [{watched}]\n---\n\n# {id}\n"
    )
}

#[test]
fn no_arguments_prints_help() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("/knowledge.refresh"));
}

#[test]
fn help_subcommand() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn unknown_subcommand_fails() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path()).arg("frobnicate").assert().failure();
}

#[test]
fn init_scaffolds_project() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path())
        .args(["init", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/3] Installing core..."))
        .stdout(predicate::str::contains(
            "write .knowledge/config.yaml (paths auto-detected)",
        ))
        .stdout(predicate::str::contains("write .claude/commands/k.md"))
        .stdout(predicate::str::contains("No BMAD detected"));

    for rel in [
        ".knowledge/guides",
        ".knowledge/config.yaml",
        ".knowledge/index.yaml",
        ".knowledge/architecture.md",
        ".knowledge/snapshot.md",
        ".knowledge/_templates/guide.tpl.md",
        ".claude/commands/knowledge.check.md",
    ] {
        assert!(tmp.path().join(rel).exists(), "missing {rel}");
    }
}

#[test]
fn init_reports_bmad() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir_all(tmp.path().join("_bmad")).expect("mkdir");
    knowledge_system(tmp.path())
        .args(["init", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMAD detected (_bmad/)"));

    knowledge_system(tmp.path())
        .args(["init", "--yes", "--skip-bmad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip .knowledge/config.yaml (already configured)"))
        .stdout(predicate::str::contains("BMAD integration skipped"));
}

#[test]
fn init_on_existing_project_asks_first() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    fs::write(tmp.path().join(".knowledge/_templates/guide.tpl.md"), "mine").expect("write");

    knowledge_system(tmp.path())
        .arg("init")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overwrite templates? (y/N)"))
        .stdout(predicate::str::contains("Skipping."));
    assert_eq!(
        fs::read_to_string(tmp.path().join(".knowledge/_templates/guide.tpl.md")).expect("read"),
        "mine"
    );
}

#[test]
fn update_requires_init() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path())
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            ".knowledge/ not found. Run 'knowledge-system init' first.",
        ));
}

#[test]
fn update_rewrites_commands_only() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    write(tmp.path(), ".knowledge/config.yaml", "version: mine\n");

    knowledge_system(tmp.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("update .knowledge/_templates/guide.tpl.md"))
        .stdout(predicate::str::contains("update .claude/commands/k.md"));
    assert_eq!(
        fs::read_to_string(tmp.path().join(".knowledge/config.yaml")).expect("read"),
        "version: mine\n"
    );
}

#[test]
fn check_requires_init() {
    let tmp = TempDir::new().expect("tmp");
    knowledge_system(tmp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".knowledge/ not found."));
}

#[test]
fn check_requires_config() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir_all(tmp.path().join(".knowledge")).expect("mkdir");
    knowledge_system(tmp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".knowledge/config.yaml not found."));
}

#[test]
fn check_without_guides_prints_hint() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    knowledge_system(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No guides found in .knowledge/guides/"));
}

#[test]
fn check_verified_guide_exits_zero() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    write(tmp.path(), "src/api.rs", "");
    write(tmp.path(), ".knowledge/guides/api.md", &guide("api", "src/api.rs"));

    knowledge_system(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "VERIFIED  api                      (last verified: 2024-01-01)",
        ))
        .stdout(predicate::str::contains("Summary: 1 verified, 0 stale, 0 unknown"));
}

#[test]
fn check_stale_guide_exits_one() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    write(tmp.path(), ".knowledge/guides/api.md", &guide("api", "src/gone.rs"));
    write(
        tmp.path(),
        ".knowledge/guides/misc.md",
        "---\nid: misc\ntitle: Misc\n---\n\nNotes.\n",
    );

    knowledge_system(tmp.path())
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("STALE     api"))
        .stdout(predicate::str::contains("- src/gone.rs (deleted)"))
        .stdout(predicate::str::contains("UNKNOWN   misc"))
        .stdout(predicate::str::contains("Summary: 0 verified, 1 stale, 1 unknown"));
}

#[test]
fn check_json_output() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    write(tmp.path(), ".knowledge/guides/api.md", &guide("api", "src/gone.rs"));

    let output = knowledge_system(tmp.path())
        .args(["check", "--format", "json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["guides"][0]["id"], "api");
    assert_eq!(value["guides"][0]["status"], "stale");
    assert_eq!(value["summary"]["stale"], 1);
}

#[test]
fn refresh_writes_index_and_snapshot() {
    let tmp = TempDir::new().expect("tmp");
    init(tmp.path());
    write(tmp.path(), "src/api.rs", "");
    write(tmp.path(), ".knowledge/guides/api.md", &guide("api", "src/api.rs"));

    knowledge_system(tmp.path())
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Knowledge refreshed."));

    let index = fs::read_to_string(tmp.path().join(".knowledge/index.yaml")).expect("index");
    assert!(index.contains("id: api"));
    assert!(index.contains("status: verified"));

    let snapshot =
        fs::read_to_string(tmp.path().join(".knowledge/snapshot.md")).expect("snapshot");
    assert!(snapshot.contains("| [api](guides/api.md) | verified |"));
}
