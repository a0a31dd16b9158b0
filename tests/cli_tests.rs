use assert_cmd::prelude::*;
use mercurial_source::{ConnectionData, FetchOutcome, FetchStatus};
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[cfg(unix)]
fn stub_hg(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("hg");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fetch_mercurial() -> Command {
    let mut cmd = Command::cargo_bin("fetch-mercurial").unwrap();
    cmd.env_remove("HG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_command_succeeds() {
    let mut cmd = fetch_mercurial();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Clone a Mercurial repository"));
}

#[test]
fn test_version_command_succeeds() {
    let mut cmd = fetch_mercurial();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fetch-mercurial"));
}

#[test]
fn test_invalid_subcommand() {
    let mut cmd = fetch_mercurial();
    cmd.arg("invalid-command");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_connection_command_with_json_format() {
    let mut cmd = fetch_mercurial();
    cmd.args(["connection", "--format", "json"]);
    let output = cmd.assert().success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let data: ConnectionData = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data, ConnectionData::mercurial());
}

#[test]
fn test_connection_command_with_toml_format() {
    let mut cmd = fetch_mercurial();
    cmd.args(["connection", "--format", "toml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("connection_type = \"Mercurial\""));
}

#[test]
fn test_connection_command_plain() {
    let mut cmd = fetch_mercurial();
    cmd.arg("connection");
    cmd.assert().success().stdout(
        predicate::str::contains("Mercurial")
            .and(predicate::str::contains("repo_url"))
            .and(predicate::str::contains("target_directory")),
    );
}

#[test]
fn test_icon_command_falls_back_to_bundled() {
    let temp_dir = tempdir().unwrap();
    let mut cmd = fetch_mercurial();
    cmd.args([
        "icon",
        "--icon",
        temp_dir.path().join("missing.svg").to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"));
}

#[test]
fn test_fetch_command_without_params_fails_validation() {
    let mut cmd = fetch_mercurial();
    cmd.args(["fetch", "--repo-url", "https://hg.example.com/repo"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "missing required parameter 'target_directory'",
        ));
}

#[test]
fn test_fetch_command_zero_timeout_fails_validation() {
    let temp_dir = tempdir().unwrap();
    let mut cmd = fetch_mercurial();
    cmd.args([
        "fetch",
        "--repo-url",
        "https://hg.example.com/repo",
        "--target-directory",
        temp_dir.path().to_str().unwrap(),
        "--timeout",
        "0",
    ]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_fetch_command_params_conflict_with_flags() {
    let mut cmd = fetch_mercurial();
    cmd.args([
        "fetch",
        "--params",
        "source.toml",
        "--repo-url",
        "https://hg.example.com/repo",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_fetch_command_with_missing_params_file() {
    let mut cmd = fetch_mercurial();
    cmd.args(["fetch", "--params", "nonexistent.toml"]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Failed to read params file"));
}

#[test]
fn test_fetch_command_with_incomplete_params_file() {
    let temp_dir = tempdir().unwrap();
    let params_path = temp_dir.path().join("source.toml");
    std::fs::write(
        &params_path,
        "[params]\nrepo_url = \"https://hg.example.com/repo\"\n",
    )
    .unwrap();

    let mut cmd = fetch_mercurial();
    cmd.args(["fetch", "--params", params_path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(
            predicate::str::contains("Failed to parse params file")
                .and(predicate::str::contains("target_directory")),
        );
}

#[cfg(unix)]
#[test]
fn test_fetch_command_success() {
    let temp_dir = tempdir().unwrap();
    let hg = stub_hg(temp_dir.path(), r#"mkdir -p "$3/.hg""#);
    let target = temp_dir.path().join("out/clone");

    let mut cmd = fetch_mercurial();
    cmd.args([
        "fetch",
        "--repo-url",
        "https://hg.example.com/repo",
        "--target-directory",
        target.to_str().unwrap(),
        "--hg",
        hg.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cloned repository into"))
        .stderr(predicate::str::contains(
            "Successfully cloned Mercurial repository.",
        ));
    assert!(target.join(".hg").is_dir());
}

#[cfg(unix)]
#[test]
fn test_fetch_command_keeps_non_utf8_target_directory() {
    use std::os::unix::ffi::OsStrExt;
    let temp_dir = tempdir().unwrap();
    let hg = stub_hg(temp_dir.path(), r#"mkdir -p "$3/.hg""#);
    let target = temp_dir
        .path()
        .join(std::ffi::OsStr::from_bytes(b"clone-\xff"));

    let mut cmd = fetch_mercurial();
    cmd.args(["fetch", "--repo-url", "https://hg.example.com/repo"])
        .arg("--target-directory")
        .arg(&target)
        .arg("--hg")
        .arg(&hg);
    cmd.assert().success();

    assert!(target.join(".hg").is_dir());
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 2, "unexpected entries: {entries:?}");
}

#[test]
fn test_fetch_command_zero_timeout_in_params_file_fails() {
    let temp_dir = tempdir().unwrap();
    let params_path = temp_dir.path().join("source.toml");
    std::fs::write(
        &params_path,
        format!(
            "[params]\nrepo_url = \"https://hg.example.com/repo\"\ntarget_directory = \"{}\"\ntimeout_secs = 0\n",
            temp_dir.path().join("clone").display()
        ),
    )
    .unwrap();

    let mut cmd = fetch_mercurial();
    cmd.args(["fetch", "--params", params_path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(
            "invalid value '0' for parameter 'timeout_secs'",
        ));
    assert!(!temp_dir.path().join("clone").exists());
}

#[cfg(unix)]
#[test]
fn test_fetch_command_clone_failure_json() {
    let temp_dir = tempdir().unwrap();
    let hg = stub_hg(
        temp_dir.path(),
        "echo 'abort: no repository found' >&2\nexit 255",
    );
    let params_path = temp_dir.path().join("source.toml");
    std::fs::write(
        &params_path,
        format!(
            "name = \"broken\"\n[params]\nrepo_url = \"https://hg.example.com/missing\"\ntarget_directory = \"{}\"\n",
            temp_dir.path().join("clone").display()
        ),
    )
    .unwrap();

    let mut cmd = fetch_mercurial();
    cmd.env("HG", &hg);
    cmd.args([
        "fetch",
        "--params",
        params_path.to_str().unwrap(),
        "--format",
        "json",
    ]);
    let output = cmd.assert().failure().code(1);

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let outcome: FetchOutcome = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome.status, FetchStatus::CloneFailed);
    assert_eq!(outcome.detail, "abort: no repository found");
}
