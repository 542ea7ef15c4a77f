// End-to-end tests for the inframan binary.
//
// External tools are replaced by stub scripts on PATH: the terraform stub
// serves canned `output -json` documents from its work dir, and the ssh stub
// echoes its argv so connection plumbing can be asserted without a host.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TERRAFORM_STUB: &str = r#"#!/bin/sh
# Stand-in for terraform: serves canned output from the work dir.
case "$1" in
  output) cat stub_output.json ;;
  *) : ;;
esac
"#;

const SSH_STUB: &str = r#"#!/bin/sh
echo "stub-ssh $@"
exit "${STUB_SSH_EXIT:-0}"
"#;

struct Fixture {
    tmp: TempDir,
    bin_dir: PathBuf,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let bin_dir = tmp.path().join("stub-bin");
    fs::create_dir_all(&bin_dir).unwrap();
    write_stub(&bin_dir, "terraform", TERRAFORM_STUB);
    write_stub(&bin_dir, "ssh", SSH_STUB);
    Fixture { tmp, bin_dir }
}

fn write_stub(bin_dir: &Path, name: &str, script: &str) {
    let path = bin_dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Create an initialized project whose terraform stub will serve `output`.
fn add_project(fx: &Fixture, name: &str, output: &str) {
    let terraform_dir = fx.tmp.path().join(".inframan").join(name).join("terraform");
    fs::create_dir_all(terraform_dir.join(".terraform")).unwrap();
    fs::write(terraform_dir.join("stub_output.json"), output).unwrap();
}

fn inframan(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin("inframan").unwrap();
    cmd.current_dir(fx.tmp.path());

    let path = format!(
        "{}:{}",
        fx.bin_dir.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    cmd.env("PATH", path);

    // Isolate from the developer's environment.
    for var in [
        "PROJECT_NAME",
        "INFRA_CONFIG_JSON",
        "NIXOS_MODULE_PATH",
        "SSH_KEY_PATH",
        "SSH_CONFIG_PATH",
        "STUB_SSH_EXIT",
        "RUST_LOG",
        "LOG_LEVEL",
        "LOG_OUTPUT",
        "LOG_FORMAT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    let fx = fixture();
    inframan(&fx)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("infra"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("ssh"));
}

#[test]
fn ssh_list_with_empty_workspace_suggests_provisioning() {
    let fx = fixture();
    inframan(&fx)
        .args(["ssh", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No instances found."))
        .stdout(predicate::str::contains("inframan infra"));
}

#[test]
fn ssh_list_shows_all_instances_and_skips_broken_projects() {
    let fx = fixture();
    add_project(
        &fx,
        "prod",
        r#"{"instances":{"value":{"web-1":"10.0.0.1","db-1":"10.0.0.2"}}}"#,
    );
    add_project(&fx, "acct1", r#"{"public_ip":{"value":"3.3.3.3"}}"#);
    add_project(&fx, "broken", "this is not json");

    inframan(&fx)
        .args(["ssh", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod/web-1"))
        .stdout(predicate::str::contains("prod/db-1"))
        .stdout(predicate::str::contains("10.0.0.1"))
        .stdout(predicate::str::contains("acct1"))
        .stdout(predicate::str::contains("3.3.3.3"))
        .stdout(predicate::str::contains("broken").not());
}

#[test]
fn ssh_without_target_behaves_like_list() {
    let fx = fixture();
    add_project(&fx, "acct1", r#"{"public_ip":{"value":"3.3.3.3"}}"#);

    inframan(&fx)
        .arg("ssh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available instances:"))
        .stdout(predicate::str::contains("acct1"));
}

#[test]
fn ssh_bare_multi_instance_project_is_ambiguous() {
    let fx = fixture();
    add_project(
        &fx,
        "prod",
        r#"{"instances":{"value":{"web-1":"10.0.0.1","db-1":"10.0.0.2"}}}"#,
    );

    inframan(&fx)
        .args(["ssh", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[db-1, web-1]"));
}

#[test]
fn ssh_unknown_project_fails_with_not_found() {
    let fx = fixture();
    add_project(&fx, "acct1", r#"{"public_ip":{"value":"3.3.3.3"}}"#);

    inframan(&fx)
        .args(["ssh", "missing/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"missing\" does not exist"));
}

#[test]
fn ssh_unknown_instance_enumerates_available_names() {
    let fx = fixture();
    add_project(
        &fx,
        "prod",
        r#"{"instances":{"value":{"web-1":"10.0.0.1","db-1":"10.0.0.2"}}}"#,
    );

    inframan(&fx)
        .args(["ssh", "prod/cache-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("available: [db-1, web-1]"));
}

#[test]
fn ssh_connects_to_single_instance_project() {
    let fx = fixture();
    add_project(&fx, "acct1", r#"{"public_ip":{"value":"3.3.3.3"}}"#);

    inframan(&fx)
        .args(["ssh", "acct1", "--user", "nixos"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Connecting to acct1 (3.3.3.3) as nixos...",
        ))
        .stdout(predicate::str::contains("nixos@3.3.3.3"));
}

#[test]
fn ssh_resolves_named_instance() {
    let fx = fixture();
    add_project(
        &fx,
        "prod",
        r#"{"instances":{"value":{"web-1":"10.0.0.1","db-1":"10.0.0.2"}}}"#,
    );

    inframan(&fx)
        .args(["ssh", "prod/web-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Connecting to prod/web-1 (10.0.0.1) as root...",
        ))
        .stdout(predicate::str::contains("root@10.0.0.1"));
}

#[test]
fn ssh_session_exit_status_becomes_our_own() {
    let fx = fixture();
    add_project(&fx, "acct1", r#"{"public_ip":{"value":"3.3.3.3"}}"#);

    inframan(&fx)
        .args(["ssh", "acct1"])
        .env("STUB_SSH_EXIT", "5")
        .assert()
        .code(5);
}

#[test]
fn infra_requires_config_environment_variable() {
    let fx = fixture();
    inframan(&fx)
        .arg("infra")
        .assert()
        .failure()
        .stderr(predicate::str::contains("INFRA_CONFIG_JSON"));
}

#[test]
fn deploy_requires_module_environment_variable() {
    let fx = fixture();
    inframan(&fx)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NIXOS_MODULE_PATH"));
}
