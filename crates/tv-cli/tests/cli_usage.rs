use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_trigger-comparison"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("trigger_comparison_usage_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

/// Smallest bundle the pipeline accepts: one L1 path and the Total.
fn minimal_bundle(dir: &std::path::Path, file: &str) -> PathBuf {
    let bits = json!({
        "name": "L1Paths",
        "bin_content": [40.0, 60.0],
        "labels": ["L1_A", "Total"],
        "entries": 100.0
    });
    let body = json!({ "histograms": { "TriggerBits/L1Paths": bits } });
    let p = dir.join(file);
    std::fs::write(&p, serde_json::to_vec(&body).unwrap()).unwrap();
    p
}

#[test]
fn help_exits_zero() {
    for flag in ["-help", "--help"] {
        let out = run(&[flag]);
        assert!(out.status.success(), "{flag} should exit 0");
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("--file1"), "stdout={stdout}");
        assert!(stdout.contains("-File1="), "stdout={stdout}");
    }
}

#[test]
fn too_few_arguments_print_usage() {
    for args in [&[][..], &["-File1=a.root"][..]] {
        let out = run(args);
        assert!(out.status.success(), "{args:?} should exit 0");
        assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
    }
}

#[test]
fn unwritable_output_file_fails() {
    let dir = tmp_dir("unwritable");
    let f1 = minimal_bundle(&dir, "run1.json");
    let f2 = minimal_bundle(&dir, "run2.json");
    let results = dir.join("no_such_dir").join("results.json");

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-file",
        results.to_string_lossy().as_ref(),
        "--output-dir",
        dir.to_string_lossy().as_ref(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("results.json"));
    // outputs written before the failure are still there
    assert!(dir.join("L1comparison.log").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unreadable_input_fails() {
    let dir = tmp_dir("unreadable");
    let f2 = minimal_bundle(&dir, "run2.json");
    let missing = dir.join("run1.json");

    let out = run(&[
        "--file1",
        missing.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-dir",
        dir.to_string_lossy().as_ref(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("run1.json"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_render_config_fails() {
    let dir = tmp_dir("bad_config");
    let f1 = minimal_bundle(&dir, "run1.json");
    let f2 = minimal_bundle(&dir, "run2.json");
    let cfg = dir.join("viz.yaml");
    std::fs::write(&cfg, "theme: neon\n").unwrap();

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--viz-config",
        cfg.to_string_lossy().as_ref(),
        "--output-dir",
        dir.to_string_lossy().as_ref(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown theme"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn themed_run_succeeds() {
    let dir = tmp_dir("themed");
    let f1 = minimal_bundle(&dir, "run1.json");
    let f2 = minimal_bundle(&dir, "run2.json");
    let cfg = dir.join("viz.yaml");
    std::fs::write(&cfg, "theme: cms\nexperiment:\n  status: Simulation\n").unwrap();

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--viz-config",
        cfg.to_string_lossy().as_ref(),
        "--output-dir",
        dir.to_string_lossy().as_ref(),
        "--output-file",
        dir.join("results.json").to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let svg = std::fs::read_to_string(dir.join("L1Pulls.svg")).unwrap();
    assert!(svg.contains(">CMS</text>"));
    assert!(svg.contains(">Simulation</text>"));

    std::fs::remove_dir_all(&dir).ok();
}
