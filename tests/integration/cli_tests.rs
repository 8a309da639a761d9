//! Integration tests for the CLI binary.
//!
//! Drives the `lcadm` binary against a temporary store file.
//!
//! This test is registered as a [[test]] in the lawcorp-cli crate so that
//! CARGO_BIN_EXE_lcadm is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `lcadm` binary.
fn lcadm_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lcadm"));
    cmd.env_remove("LAWCORP_STORE");
    cmd
}

fn lcadm(store: &Path, args: &[&str]) -> Output {
    lcadm_binary()
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("failed to execute lcadm")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "lcadm failed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A store with one group, one client, one case, a partner and an associate.
fn seeded_store(dir: &Path) -> std::path::PathBuf {
    let store = dir.join("firm.json");
    assert_ok(&lcadm(&store, &["init"]));
    assert_ok(&lcadm(&store, &["group", "add", "Litigation"]));
    assert_ok(&lcadm(
        &store,
        &["client", "add", "Acme Corp", "--industry", "Manufacturing"],
    ));
    assert_ok(&lcadm(
        &store,
        &[
            "person", "add", "--first", "Dana", "--last", "Whitfield", "--email",
            "dana@lawcorp.example", "--role", "partner", "--group", "Litigation",
            "--subject", "oid-dana",
        ],
    ));
    assert_ok(&lcadm(
        &store,
        &[
            "person", "add", "--first", "Sam", "--last", "Ortiz", "--email",
            "sam@lawcorp.example", "--role", "Associate", "--group", "1",
        ],
    ));
    assert_ok(&lcadm(
        &store,
        &[
            "case", "open", "--number", "LC-2024-001", "--title", "Acme v. Widgets",
            "--group", "Litigation", "--client", "1", "--opened", "2024-03-01",
        ],
    ));
    store
}

#[test]
fn cli_responds_to_help() {
    let output = lcadm_binary()
        .arg("--help")
        .output()
        .expect("failed to execute lcadm --help");

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(
        stdout.contains("lcadm") || stdout.contains("Usage"),
        "lcadm --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = lcadm_binary()
        .arg("--version")
        .output()
        .expect("failed to execute lcadm --version");

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = lcadm_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute lcadm");

    assert!(!output.status.success());
}

#[test]
fn init_refuses_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("firm.json");
    assert_ok(&lcadm(&store, &["init"]));
    let again = lcadm(&store, &["init"]);
    assert!(!again.status.success());
}

#[test]
fn commands_need_an_initialized_store() {
    let dir = tempfile::tempdir().unwrap();
    let output = lcadm(&dir.path().join("missing.json"), &["person", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("lcadm init"));
}

#[test]
fn onboarding_writes_one_audit_record_per_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    let list = lcadm(&store, &["person", "list"]);
    assert_ok(&list);
    let out = stdout(&list);
    assert!(out.contains("Dana Whitfield"));
    assert!(out.contains("Associate"));

    let audit = lcadm(&store, &["--json", "audit", "list"]);
    assert_ok(&audit);
    let records: serde_json::Value = serde_json::from_str(&stdout(&audit)).unwrap();
    let records = records.as_array().unwrap();
    // group, client, two people, one case
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r["channel"] == "cli"));
    assert!(records.iter().all(|r| r["actor_id"].is_null()));

    let verify = lcadm(&store, &["audit", "verify"]);
    assert_ok(&verify);
    assert!(stdout(&verify).contains("5 records"));
}

#[test]
fn partner_assigns_through_the_cli() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    let assign = lcadm(
        &store,
        &["case", "assign", "--case", "1", "--person", "2", "--role", "Lead", "--by", "1"],
    );
    assert_ok(&assign);
    assert!(stdout(&assign).contains("Sam Ortiz has been assigned as Lead on case 1."));

    // An associate cannot assign.
    let refused = lcadm(
        &store,
        &["case", "assign", "--case", "1", "--person", "1", "--role", "Reviewer", "--by", "2"],
    );
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr)
        .contains("Only partners can assign users to cases."));

    let audit = lcadm(&store, &["--json", "audit", "list", "--entity-id", "1"]);
    let records: serde_json::Value = serde_json::from_str(&stdout(&audit)).unwrap();
    let assign_records: Vec<_> = records
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["action"] == "AssignUser")
        .collect();
    assert_eq!(assign_records.len(), 1);
    assert_eq!(assign_records[0]["channel"], "cli");
    assert_eq!(assign_records[0]["actor_id"], 1);
}

#[test]
fn deactivated_people_drop_out_of_the_default_listing() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    assert_ok(&lcadm(&store, &["person", "deactivate", "2"]));

    let active = stdout(&lcadm(&store, &["person", "list"]));
    assert!(!active.contains("Sam Ortiz"));
    let all = stdout(&lcadm(&store, &["person", "list", "--all"]));
    assert!(all.contains("Sam Ortiz"));
}

#[test]
fn person_add_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    let bad_role = lcadm(
        &store,
        &["person", "add", "--first", "A", "--last", "B", "--email", "a@b", "--role", "Clerk"],
    );
    assert!(!bad_role.status.success());

    let bar_for_paralegal = lcadm(
        &store,
        &[
            "person", "add", "--first", "A", "--last", "B", "--email", "a@b", "--role",
            "Paralegal", "--bar-number", "123",
        ],
    );
    assert!(!bar_for_paralegal.status.success());

    let duplicate_subject = lcadm(
        &store,
        &[
            "person", "add", "--first", "A", "--last", "B", "--email", "a@b", "--role",
            "Intern", "--subject", "oid-dana",
        ],
    );
    assert!(!duplicate_subject.status.success());
}

#[test]
fn permissions_table_for_intern() {
    let output = lcadm_binary()
        .args(["permissions", "intern"])
        .output()
        .expect("failed to execute lcadm");
    assert_ok(&output);
    let out = stdout(&output);
    assert!(out.contains("cases_get"));
    assert!(out.contains("cases_search"));
    assert!(!out.contains("cases_update_status"));
    assert!(out.contains("privileged documents: redacted"));
}
