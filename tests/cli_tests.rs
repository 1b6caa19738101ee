//! End-to-end tests of the `gcp-filter` binary.
//!
//! Each test writes its inputs to a temporary directory, runs the binary and checks
//! the output file, stdout and the exit status.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GCP: &str = "EPSG:32633\n100.0\t200.0\t5.0\timgA\n100.002\t200.0\t5.0\timgB\n";
const CPS: &str = "EPSG:32633\n100.0\t200.0\t5.0\n";

fn workspace(gcp: &str, cps: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("gcp.txt"), gcp).expect("write gcp");
    std::fs::write(dir.path().join("cps.txt"), cps).expect("write cps");
    dir
}

fn path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn filter_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gcp-filter").expect("binary");
    cmd.arg("filter")
        .arg(path(dir, "gcp.txt"))
        .arg(path(dir, "cps.txt"))
        .arg("-o")
        .arg(path(dir, "out.txt"));
    cmd
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read output")
}

#[test]
fn test_filter_loose_tolerance() {
    let dir = workspace(GCP, CPS);

    filter_cmd(&dir)
        .args(["--tolerance", "0.005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched 2 rows from 2 total GCP data rows"))
        .stdout(predicate::str::contains("Control points matched: 1/1"))
        .stdout(predicate::str::contains(
            "CP1 (100.000, 200.000, 5.000): 2 pictures",
        ));

    assert_eq!(read(&path(&dir, "out.txt")), GCP);
}

#[test]
fn test_filter_default_tolerance() {
    let dir = workspace(GCP, CPS);

    filter_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched 1 rows from 2 total GCP data rows"));

    assert_eq!(
        read(&path(&dir, "out.txt")),
        "EPSG:32633\n100.0\t200.0\t5.0\timgA\n"
    );
}

#[test]
fn test_filter_json_summary() {
    let dir = workspace(GCP, CPS);

    let output = filter_cmd(&dir)
        .args(["--format", "json", "-t", "0.005"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["total_gcp_rows"], 2);
    assert_eq!(json["unique_control_points"], 1);
    assert_eq!(json["matched_rows"], 2);
    assert_eq!(json["matched_control_points"], 1);
    assert_eq!(json["statistics"]["breakdown"][0]["pictures"], 2);
    assert_eq!(json["config"]["tie_break"], "first");
}

#[test]
fn test_filter_tsv_breakdown() {
    let dir = workspace(
        "EPSG:32633\n1\t1\t1\t-\t-\tIMG_1\n1\t1\t1\t-\t-\tIMG_2\n",
        "EPSG:32633\n1\t1\t1\n",
    );

    filter_cmd(&dir)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "control_point\tx\ty\tz\tpictures\timages\n",
        ))
        .stdout(predicate::str::contains("CP1\t1\t1\t1\t2\tIMG_1,IMG_2"));
}

#[test]
fn test_filter_no_matches() {
    let dir = workspace("EPSG:32633\n0\t0\t0\n", CPS);

    filter_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No control points were matched (0/1)"));

    assert_eq!(read(&path(&dir, "out.txt")), "EPSG:32633\n");
}

#[test]
fn test_filter_malformed_row_warns() {
    let dir = workspace(
        "EPSG:32633\nabc\t200.0\t5.0\n100.0\t200.0\t5.0\timg\n",
        CPS,
    );

    filter_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Warning: skipping invalid GCP row: Line 2: X coordinate 'abc' is not a number",
        ))
        .stderr(predicate::str::contains("Skipping invalid GCP row"));

    assert_eq!(
        read(&path(&dir, "out.txt")),
        "EPSG:32633\n100.0\t200.0\t5.0\timg\n"
    );
}

#[test]
fn test_filter_idempotent() {
    let dir = workspace(GCP, CPS);

    filter_cmd(&dir).assert().success();
    let first = std::fs::read(path(&dir, "out.txt")).expect("first");
    filter_cmd(&dir).assert().success();
    let second = std::fs::read(path(&dir, "out.txt")).expect("second");

    assert_eq!(first, second);
}

#[test]
fn test_filter_grid_index_matches_linear() {
    let gcp = "EPSG:32633\n10.002\t10\t1\ta\n20.001\t19.999\t2\tb\n15\t15\t1\tc\n10.004\t10\t1\td\n";
    let cps = "EPSG:32633\n10\t10\t1\n10.004\t10\t1\n20\t20\t2\n";

    let linear = workspace(gcp, cps);
    filter_cmd(&linear).args(["-t", "0.005"]).assert().success();

    let grid = workspace(gcp, cps);
    filter_cmd(&grid)
        .args(["-t", "0.005", "--index", "grid"])
        .assert()
        .success();

    assert_eq!(
        read(&path(&linear, "out.txt")),
        read(&path(&grid, "out.txt"))
    );
}

#[test]
fn test_filter_missing_input_fails() {
    let dir = workspace(GCP, CPS);
    std::fs::remove_file(path(&dir, "cps.txt")).expect("remove");

    filter_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("control points file not found"));

    assert!(!path(&dir, "out.txt").exists());
}

#[test]
fn test_filter_negative_tolerance_fails() {
    let dir = workspace(GCP, CPS);

    filter_cmd(&dir)
        .args(["-t", "-0.001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tolerance must not be negative"));
}

#[test]
fn test_filter_empty_input_fails() {
    let dir = workspace("", CPS);

    filter_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("File is empty"));

    assert!(!path(&dir, "out.txt").exists());
}

#[test]
fn test_filter_unwritable_output_fails() {
    let dir = workspace(GCP, CPS);

    Command::cargo_bin("gcp-filter")
        .expect("binary")
        .arg("filter")
        .arg(path(&dir, "gcp.txt"))
        .arg(path(&dir, "cps.txt"))
        .arg("-o")
        .arg(path(&dir, "missing_dir").join("out.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write output"));
}

#[test]
fn test_filter_read_only_output_fails() {
    let dir = workspace(GCP, CPS);
    let out = path(&dir, "out.txt");
    std::fs::write(&out, "keep\n").expect("write out");
    let mut permissions = std::fs::metadata(&out).expect("metadata").permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(&out, permissions).expect("set read-only");

    filter_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination is read-only"));

    assert_eq!(read(&out), "keep\n");
}

#[test]
fn test_inspect() {
    let dir = workspace(GCP, "EPSG:32633\n1\t2\t3\n1\t2\t3\n4\t5\t6\n");

    Command::cargo_bin("gcp-filter")
        .expect("binary")
        .arg("inspect")
        .arg(path(&dir, "cps.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("CRS header: EPSG:32633"))
        .stdout(predicate::str::contains("Unique points: 2"))
        .stdout(predicate::str::contains("Duplicate rows: 1"))
        .stdout(predicate::str::contains(
            "Bounds: (1.000, 2.000, 3.000) to (4.000, 5.000, 6.000)",
        ));
}
