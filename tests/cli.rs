//! CLI integration tests for jobtrack admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use jobtrack::store::{SqliteStore, Store};
use predicates::prelude::*;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("jobtrack").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn create_user(&self, name: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "create-user",
                "--data-dir",
                &self.data_dir_str(),
                "--name",
                name,
            ])
            .assert()
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("jobtrack.db")).expect("open store")
    }
}

#[test]
fn test_init_creates_database_and_token() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Admin token"));

    ctx.temp_dir
        .child("jobtrack.db")
        .assert(predicate::path::exists());
    ctx.temp_dir
        .child(".admin_token")
        .assert(predicate::str::starts_with("jobtrack_"));

    assert!(ctx.store().has_admin_token().unwrap());
}

#[cfg(unix)]
#[test]
fn test_admin_token_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let ctx = TestContext::new();
    ctx.init().success();

    let mode = std::fs::metadata(ctx.data_dir().join(".admin_token"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_create_user_prints_token() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.create_user("alice")
        .success()
        .stdout(predicate::str::contains("Created user 'alice'"))
        .stdout(predicate::str::contains("jobtrack_"));

    let user = ctx.store().get_user_by_name("alice").unwrap();
    assert!(user.is_some());
}

#[test]
fn test_create_user_rejects_duplicates_and_bad_names() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.create_user("alice").success();

    ctx.create_user("alice")
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ctx.create_user("bad name")
        .failure()
        .stderr(predicate::str::contains("Invalid user name"));
}

#[test]
fn test_create_user_requires_init() {
    let ctx = TestContext::new();

    ctx.create_user("alice")
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_serve_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_serve_rejects_bad_config_file() {
    let ctx = TestContext::new();
    let config = ctx.temp_dir.child("jobtrack.toml");
    config.write_str("prot = 9000\n").unwrap();

    ctx.cmd()
        .args(["serve", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobtrack.toml"));
}
