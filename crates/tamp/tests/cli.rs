//! Exit-code tests for the `tamp` binary.

use std::path::PathBuf;
use std::process::Command;

fn tamp() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tamp"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tamp-cli-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_no_arguments_prints_usage() {
    let out = tamp().output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("usage:"));
}

#[test]
fn test_two_arguments_prints_usage() {
    let out = tamp().args(["a.json", "b.json"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("<json_file>"));
}

#[test]
fn test_unreadable_config() {
    let out = tamp().arg("/definitely/not/here.json").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("usage:"));
}

#[test]
fn test_malformed_config() {
    let dir = scratch("malformed");
    let path = dir.join("bad.json");
    std::fs::write(&path, "{ \"sphere_radius\": ").unwrap();
    let out = tamp().arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("usage:"));
}

#[test]
fn test_small_moving_boundary_run() {
    let dir = scratch("run");
    let output_dir = dir.join("out");
    let config = serde_json::json!({
        "scenario": "moving_boundary",
        "sphere_radius": 0.5,
        "sphere_density": 2.5,
        "box_X": 6.0,
        "box_Y": 6.0,
        "box_Z": 20.0,
        "step_size": 2e-4,
        "time_end": 0.1,
        "normalStiffS2S": 1e5,
        "normalStiffS2W": 1e5,
        "normalDampS2S": 20.0,
        "normalDampS2W": 20.0,
        "tangentDampS2S": 10.0,
        "tangentDampS2W": 10.0,
        "write_mode": "csv",
        "verbose": 0,
        "output_dir": output_dir,
    });
    let path = dir.join("run.json");
    std::fs::write(&path, config.to_string()).unwrap();

    let out = tamp().arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));

    // 0.1 s at 50 fps
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("frame ")).count(), 5);
    assert!(output_dir.join("initial.csv").is_file());
    assert!(output_dir.join("step000004.csv").is_file());
    assert!(!output_dir.join("step000005.csv").exists());
    assert!(output_dir.join("frames.json").is_file());
}
