//! Integration tests for the PassVault CLI.
//!
//! These tests drive the binary end-to-end using `assert_cmd`.  The
//! master password comes from `PASSVAULT_PASSWORD` and every test gets
//! its own vault directory, so nothing is interactive.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "CorrectHorse1";

/// Helper: a Command for the passvault binary bound to `dir`.
fn passvault(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passvault").expect("binary should exist");
    cmd.env_remove("PASSVAULT_LOG")
        .env("PASSVAULT_DIR", dir.path())
        .env("PASSVAULT_PASSWORD", PASSWORD);
    cmd
}

/// Helper: an initialized vault directory.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    passvault(&dir).arg("init").assert().success();
    dir
}

fn add(dir: &TempDir, title: &str, args: &[&str]) {
    passvault(dir)
        .args(["add", title])
        .args(args)
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn version_flag_shows_version() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_database() {
    let dir = initialized();
    dir.child("vault.db").assert(predicate::path::exists());

    passvault(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized (locked)"));
}

#[test]
fn init_twice_fails() {
    let dir = initialized();
    passvault(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_rejects_short_password() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("init")
        .env("PASSVAULT_PASSWORD", "short")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn min_password_length_comes_from_config() {
    let dir = TempDir::new().unwrap();
    dir.child("config.toml")
        .write_str("min_password_length = 20\n")
        .unwrap();
    passvault(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 20 characters"));
}

#[test]
fn status_on_empty_dir_reports_uninitialized() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn list_before_init_suggests_init() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No vault exists yet"))
        .stdout(predicate::str::contains("passvault init"));
}

#[test]
fn wrong_password_is_rejected() {
    let dir = initialized();
    passvault(&dir)
        .arg("list")
        .env("PASSVAULT_PASSWORD", "WrongPass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid master password"));
}

#[test]
fn add_list_show_roundtrip() {
    let dir = initialized();
    add(
        &dir,
        "GitHub",
        &[
            "--username",
            "octocat",
            "--url",
            "https://github.com",
            "--password",
            "p@ssW0rd!",
            "--notes",
            "secret note",
            "--category",
            "dev",
        ],
    );

    passvault(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("octocat"))
        .stdout(predicate::str::contains("p@ssW0rd!").not())
        .stdout(predicate::str::contains("secret note").not());

    passvault(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p@ssW0rd!"))
        .stdout(predicate::str::contains("secret note"));
}

#[test]
fn list_filters_and_paginates() {
    let dir = initialized();
    add(&dir, "Gmail", &["--password", "a", "--category", "mail"]);
    add(&dir, "Amazon", &["--password", "b", "--category", "shopping"]);
    add(&dir, "Fastmail", &["--password", "c", "--category", "mail"]);

    passvault(&dir)
        .args(["list", "--category", "mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gmail"))
        .stdout(predicate::str::contains("Fastmail"))
        .stdout(predicate::str::contains("Amazon").not());

    passvault(&dir)
        .args(["list", "--search", "amaz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amazon"))
        .stdout(predicate::str::contains("Gmail").not());

    passvault(&dir)
        .args(["list", "--limit", "1", "--offset", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fastmail"))
        .stdout(predicate::str::contains("Gmail").not());
}

#[test]
fn add_with_generated_password() {
    let dir = initialized();
    add(&dir, "Generated", &["--generate"]);
    passvault(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));
}

#[test]
fn edit_changes_only_given_fields() {
    let dir = initialized();
    add(&dir, "GitHub", &["--username", "octo", "--password", "old-pw"]);

    passvault(&dir)
        .args(["edit", "1", "--username", "octocat"])
        .assert()
        .success();

    passvault(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat"))
        .stdout(predicate::str::contains("old-pw"));
}

#[test]
fn edit_without_changes_fails() {
    let dir = initialized();
    add(&dir, "GitHub", &["--password", "pw"]);
    passvault(&dir)
        .args(["edit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn delete_removes_entry() {
    let dir = initialized();
    add(&dir, "GitHub", &["--password", "pw"]);

    passvault(&dir)
        .args(["delete", "1", "--force"])
        .assert()
        .success();

    passvault(&dir)
        .args(["show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry 1 not found"));
}

#[test]
fn generate_needs_no_vault() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["generate", "--length", "24", "--no-symbols"])
        .env_remove("PASSVAULT_PASSWORD")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9]{24}\n$").unwrap());
}

#[test]
fn generate_rejects_impossible_options() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["generate", "--length", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn export_import_roundtrip() {
    let dir = initialized();
    add(&dir, "GitHub", &["--password", "pw1"]);
    add(&dir, "Gmail", &["--password", "pw2"]);

    let export = dir.child("backup.pvx");
    passvault(&dir)
        .args(["export", export.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 entries"));

    // Refuses to overwrite without --force.
    passvault(&dir)
        .args(["export", export.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    passvault(&dir)
        .args(["import", export.path().to_str().unwrap(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 entries"));

    passvault(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 entries"));
}

#[test]
fn import_missing_file_fails() {
    let dir = initialized();
    passvault(&dir)
        .args(["import", "does-not-exist.pvx", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("import file not found"));
}

#[test]
fn audit_shows_operations() {
    let dir = initialized();
    add(&dir, "GitHub", &["--password", "pw"]);

    passvault(&dir)
        .args(["audit", "--last", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("pw").not());
}

#[test]
fn completions_bash_outputs_script() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn completions_unknown_shell_fails() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["completions", "csh"])
        .assert()
        .failure();
}
