//! Integration tests for the reef CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a small world and image list.
fn test_world() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("world.sav"),
        "\
background sand 0 0
obstacle rock 0 0
seaGrass kelp 2 2 1000
octo otto 4 4 1 300 100
atlantis city 0 4
",
    )
    .unwrap();
    fs::write(
        dir.path().join("imagelist"),
        "\
fish images/fish.bmp
octo images/octo1.bmp 255 255 255
octo images/octo2.bmp 255 255 255
",
    )
    .unwrap();
    dir
}

fn path_arg(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

fn reef() -> Command {
    Command::cargo_bin("reef").unwrap()
}

fn run_small(dir: &TempDir) -> Command {
    let mut cmd = reef();
    cmd.args([
        "run",
        "-w",
        &path_arg(dir, "world.sav"),
        "-i",
        &path_arg(dir, "imagelist"),
        "--rows",
        "5",
        "--cols",
        "5",
    ]);
    cmd
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_sample_files() {
    let parent = TempDir::new().unwrap();
    reef()
        .args(["init", "lagoon"])
        .current_dir(parent.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sample world in lagoon/"));

    assert!(parent.path().join("lagoon/world.sav").exists());
    assert!(parent.path().join("lagoon/imagelist").exists());
}

#[test]
fn init_fails_if_dir_exists() {
    let parent = TempDir::new().unwrap();
    fs::create_dir(parent.path().join("lagoon")).unwrap();

    reef()
        .args(["init", "lagoon"])
        .current_dir(parent.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_sample_passes_check() {
    let parent = TempDir::new().unwrap();
    reef()
        .args(["init", "lagoon"])
        .current_dir(parent.path())
        .assert()
        .success();

    reef()
        .arg("check")
        .current_dir(parent.path().join("lagoon"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All checks passed")
                .and(predicate::str::contains("sea grass"))
                .and(predicate::str::contains("atlantis")),
        );
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_census() {
    let dir = test_world();
    reef()
        .args([
            "check",
            "-w",
            &path_arg(&dir, "world.sav"),
            "-i",
            &path_arg(&dir, "imagelist"),
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("5 lines loaded, 4 entities, 3 image frames")
                .and(predicate::str::contains("octo (not full)"))
                .and(predicate::str::contains("All checks passed")),
        );
}

#[test]
fn check_skips_malformed_lines() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("world.sav"),
        "obstacle rock 0 0\nkelp k 1 1\nfish nemo 1\n",
    )
    .unwrap();

    reef()
        .args(["check", "-w", &path_arg(&dir, "world.sav")])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 lines skipped"))
        .stderr(
            predicate::str::contains("world.sav:2: unknown key")
                .and(predicate::str::contains("world.sav:3: fish expects 5 fields")),
        );
}

#[test]
fn check_fails_on_collision() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("world.sav"),
        "obstacle a 1 1\nobstacle b 1 1\n",
    )
    .unwrap();

    reef()
        .args(["check", "-w", &path_arg(&dir, "world.sav")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("position occupied: (1, 1)"));
}

#[test]
fn check_rejects_grid_sizes_out_of_range() {
    let dir = test_world();
    let world = path_arg(&dir, "world.sav");
    reef()
        .args(["check", "-w", &world, "--rows", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value '0' for '--rows"));
    reef()
        .args(["check", "-w", &world, "--cols", "100000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value '100000' for '--cols"));
}

#[test]
fn check_fails_on_missing_world() {
    let dir = TempDir::new().unwrap();
    reef()
        .args(["check", "-w", &path_arg(&dir, "nope.sav")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_summary() {
    let dir = test_world();
    run_small(&dir)
        .args(["-n", "20"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulation")
                .and(predicate::str::contains("Simulated time: 2000 ms"))
                .and(predicate::str::contains("Population")),
        );
}

#[test]
fn run_verbose_lists_events() {
    let dir = test_world();
    run_small(&dir)
        .args(["-n", "12", "--verbose"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Event Log")
                .and(predicate::str::contains("kelp spawned fish -- kelp")),
        );
}

#[test]
fn run_map_prints_grid() {
    let dir = test_world();
    run_small(&dir)
        .args(["-n", "0", "--map"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#....\n.....\n..g..\n.....\nA...o\n"));
}

#[test]
fn run_json_snapshot() {
    let dir = test_world();
    let output = run_small(&dir).args(["-n", "30", "--json"]).output().unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["time_ms"], 3000);
    assert_eq!(snapshot["steps"], 30);
    assert_eq!(snapshot["census"]["obstacle"], 1);
    let events = snapshot["events"].as_array().unwrap();
    assert!(events.iter().any(|e| e["kind"]["type"] == "fish_spawned"));
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let dir = test_world();
    let first = run_small(&dir)
        .args(["-n", "60", "--seed", "7", "--json"])
        .output()
        .unwrap();
    let second = run_small(&dir)
        .args(["-n", "60", "--seed", "7", "--json"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn run_header_reports_time_scale() {
    let dir = test_world();
    run_small(&dir)
        .args(["-n", "1", "--time-scale", "2.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("time scale=2.5)"));
}

#[test]
fn run_rejects_negative_time_scale() {
    let dir = test_world();
    run_small(&dir)
        .args(["--time-scale=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("time scale must be a non-negative number"));
}
