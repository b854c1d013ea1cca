use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INFANTRY: &str = "SFGPUCI----K---";

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Command with --no-color and the test database
fn phaseplan_cmd(temp_dir: &TempDir) -> Command {
    let db_path = temp_dir.path().join("cli_test.db");
    let mut cmd = Command::cargo_bin("phaseplan").expect("Failed to find phaseplan binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    cmd
}

/// Runs a command that must succeed and returns its stdout.
fn run(temp_dir: &TempDir, args: &[&str]) -> String {
    let output = phaseplan_cmd(temp_dir)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("stdout is UTF-8")
}

/// Creates a unit and returns its ID.
fn create_unit(temp_dir: &TempDir, coordinates: &str) -> String {
    let output = run(temp_dir, &["unit", "create", INFANTRY, coordinates]);
    output
        .lines()
        .find_map(|line| line.strip_prefix("Created unit with ID: "))
        .expect("created unit ID in output")
        .trim()
        .to_string()
}

#[test]
fn test_cli_lists_missions_by_default() {
    let temp_dir = create_cli_test_environment();

    phaseplan_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No missions found."));
}

#[test]
fn test_cli_add_phase() {
    let temp_dir = create_cli_test_environment();

    phaseplan_cmd(&temp_dir)
        .args(["phase", "add", "Approach", "--start", "2024-05-01T06:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added phase 1: Approach"))
        .stdout(predicate::str::contains("No units in this phase."));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "add", "Assault"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Phase 2 of 2: Assault"));
}

#[test]
fn test_cli_phase_list_marks_current() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    run(&temp_dir, &["phase", "add", "Assault"]);

    phaseplan_cmd(&temp_dir)
        .args(["phase", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Approach\n"))
        .stdout(predicate::str::contains("2. Assault (current)"));
}

#[test]
fn test_cli_phase_navigation() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    run(&temp_dir, &["phase", "add", "Assault"]);

    phaseplan_cmd(&temp_dir)
        .args(["phase", "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already at the last phase."));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "back"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Phase 1 of 2: Approach"));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "back"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already at the first phase."));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "select", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Phase 2 of 2: Assault"));
}

#[test]
fn test_cli_select_phase_zero_is_rejected() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);

    phaseplan_cmd(&temp_dir)
        .args(["phase", "select", "0"])
        .assert()
        .failure();
}

#[test]
fn test_cli_unit_positions_per_phase() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    let id = create_unit(&temp_dir, "10,20");
    run(&temp_dir, &["phase", "add", "Assault"]);

    phaseplan_cmd(&temp_dir)
        .args(["unit", "move", &id, "15,25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated unit with ID:"))
        .stdout(predicate::str::contains("Position: `15,25`"));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "select", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Position: `10,20`"));

    phaseplan_cmd(&temp_dir)
        .args(["unit", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("#### Positions by phase"))
        .stdout(predicate::str::contains("`15,25`"));
}

#[test]
fn test_cli_create_unit_adds_first_phase() {
    let temp_dir = create_cli_test_environment();

    create_unit(&temp_dir, "10.5,-20");

    phaseplan_cmd(&temp_dir)
        .args(["phase", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Phase 1 (current)"));
}

#[test]
fn test_cli_create_unit_rejects_bad_coordinates() {
    let temp_dir = create_cli_test_environment();

    phaseplan_cmd(&temp_dir)
        .args(["unit", "create", INFANTRY, "ten,20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid control points"));
}

#[test]
fn test_cli_set_attribute() {
    let temp_dir = create_cli_test_environment();
    let id = create_unit(&temp_dir, "1,2");

    phaseplan_cmd(&temp_dir)
        .args(["unit", "set", &id, "uniquedesignation", "2/7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uniquedesignation: 2/7"));
}

#[test]
fn test_cli_delete_unit_from_middle_phase() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    let id = create_unit(&temp_dir, "1,2");
    run(&temp_dir, &["phase", "add", "Assault"]);
    run(&temp_dir, &["phase", "add", "Consolidate"]);
    run(&temp_dir, &["phase", "select", "2"]);

    phaseplan_cmd(&temp_dir)
        .args(["unit", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("from phase 'Assault'"))
        .stdout(predicate::str::contains("later phases continue as unit"));

    let units = run(&temp_dir, &["unit", "list"]);
    let headings = units.lines().filter(|line| line.starts_with("### ")).count();
    assert_eq!(headings, 2);
}

#[test]
fn test_cli_unknown_unit() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);

    phaseplan_cmd(&temp_dir)
        .args(["unit", "show", "6f1c1f0e-3f7a-4e55-9d59-3c0e2d5b7a10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Unit"));

    phaseplan_cmd(&temp_dir)
        .args(["unit", "show", "not-an-id"])
        .assert()
        .failure();
}

#[test]
fn test_cli_edit_phase() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);

    phaseplan_cmd(&temp_dir)
        .args(["phase", "edit", "1", "--name", "Infiltration"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated phase 'Infiltration'"))
        .stdout(predicate::str::contains("- Name: Infiltration"));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "edit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_cli_delete_phase() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    run(&temp_dir, &["phase", "add", "Assault"]);

    phaseplan_cmd(&temp_dir)
        .args(["phase", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted phase 'Approach'"))
        .stdout(predicate::str::contains("# Phase 1 of 1: Assault"));

    phaseplan_cmd(&temp_dir)
        .args(["phase", "delete", "5"])
        .assert()
        .failure();
}

#[test]
fn test_cli_missions_are_separate() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["--mission", "Alpha", "phase", "add", "One"]);
    run(&temp_dir, &["-m", "Bravo", "phase", "add", "Two"]);

    phaseplan_cmd(&temp_dir)
        .args(["mission", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Alpha"))
        .stdout(predicate::str::contains("## Bravo"));

    phaseplan_cmd(&temp_dir)
        .args(["-m", "Alpha", "mission", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Alpha"))
        .stdout(predicate::str::contains("1. One (0 units)"));
}

#[test]
fn test_cli_show_missing_mission() {
    let temp_dir = create_cli_test_environment();

    phaseplan_cmd(&temp_dir)
        .args(["-m", "Nowhere", "mission", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nowhere"));
}

#[test]
fn test_cli_export_and_import() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);
    create_unit(&temp_dir, "3,4");
    let export_path = temp_dir.path().join("mission.json");

    phaseplan_cmd(&temp_dir)
        .args(["mission", "export", "--output"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Exported mission"));

    let json = fs::read_to_string(&export_path).expect("exported file");
    assert!(json.contains("\"phase_list\""));

    phaseplan_cmd(&temp_dir)
        .args(["mission", "import"])
        .arg(&export_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    phaseplan_cmd(&temp_dir)
        .args(["mission", "import", "--name", "Copy"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported mission 'Copy' with 1 phases and 1 units",
        ));
}

#[test]
fn test_cli_import_rejects_garbage() {
    let temp_dir = create_cli_test_environment();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write file");

    phaseplan_cmd(&temp_dir)
        .args(["mission", "import"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a mission document"));
}

#[test]
fn test_cli_export_geomessages() {
    let temp_dir = create_cli_test_environment();
    let id = create_unit(&temp_dir, "3,4");

    phaseplan_cmd(&temp_dir)
        .args(["mission", "export", "--geomessages"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"_id\": \"{id}\"")))
        .stdout(predicate::str::contains("\"_control_points\": \"3,4\""));
}

#[test]
fn test_cli_delete_mission() {
    let temp_dir = create_cli_test_environment();
    run(&temp_dir, &["phase", "add", "Approach"]);

    phaseplan_cmd(&temp_dir)
        .args(["mission", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Deleted mission 'Default Mission'"));

    phaseplan_cmd(&temp_dir)
        .args(["mission", "delete"])
        .assert()
        .failure();
}
