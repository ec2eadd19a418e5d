use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

fn planner(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dental-planner"))
        .arg("--store")
        .arg(store)
        .args(["--owner", "front-desk"])
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch dental-planner")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "dental-planner failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

#[test]
fn edits_persist_between_invocations() {
    let dir = TempDir::new().expect("temp dir");
    let store = dir.path();

    let painted = stdout(&planner(
        store,
        &["paint", "waiting-room", "1", "1", "--label", "Lobby"],
    ));
    assert_eq!(painted, "placed Waiting Room at 0,0\nSaved\n");
    assert!(store.join("front-desk.json").is_file());

    let map = stdout(&planner(store, &["show"]));
    assert!(
        map.lines().nth(1) == Some(" 0 W W W W W . . . . . . . . . ."),
        "first map row should show the waiting room, got:\n{map}"
    );
    assert!(map.contains("label 2,2 Lobby"));
}

#[test]
fn rejected_edits_leave_the_store_untouched() {
    let dir = TempDir::new().expect("temp dir");
    let store = dir.path();

    let output = stdout(&planner(store, &["erase", "4", "4"]));
    assert_eq!(output, "rejected: nothing to erase\n");
    assert!(!store.join("front-desk.json").exists());
}

#[test]
fn export_import_transfers_designs_between_owners() {
    let dir = TempDir::new().expect("temp dir");
    let store = dir.path();
    let _ = stdout(&planner(store, &["paint", "lab", "14", "14"]));
    let _ = stdout(&planner(store, &["wall", "door", "14", "14", "west"]));

    let exported = stdout(&planner(store, &["export"]));
    assert!(exported.starts_with("clinic:v1:15x15:"));

    let other = TempDir::new().expect("temp dir");
    let imported = stdout(&planner(other.path(), &["import", exported.trim()]));
    assert_eq!(imported, "imported 15x15 design\nSaved\n");
    assert_eq!(
        fs::read_to_string(store.join("front-desk.json")).expect("original document"),
        fs::read_to_string(other.path().join("front-desk.json")).expect("imported document"),
    );
}

#[test]
fn malformed_transfer_strings_fail() {
    let dir = TempDir::new().expect("temp dir");
    let output = planner(dir.path(), &["import", "floorplan:v1:15x15:e30"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("transfer prefix 'floorplan' is not supported"));
}
