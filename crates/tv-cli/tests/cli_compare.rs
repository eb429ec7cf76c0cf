use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_trigger-comparison"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("trigger_comparison_cli_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn combined_output(out: &Output) -> String {
    format!("{}{}", String::from_utf8_lossy(&out.stdout), String::from_utf8_lossy(&out.stderr))
}

fn trigger_bits(name: &str, labels: &[&str], counts: &[f64]) -> Value {
    json!({ "name": name, "bin_content": counts, "labels": labels, "entries": 1000.0 })
}

fn distribution(name: &str, counts: &[f64]) -> Value {
    let edges: Vec<f64> = (0..=counts.len()).map(|i| i as f64 - 0.5).collect();
    json!({ "name": name, "bin_content": counts, "bin_edges": edges })
}

const L1_LABELS: [&str; 4] = ["L1_SingleJet36", "L1_HTT200", "L1_Rare", "Total"];
const HLT_LABELS: [&str; 3] = ["HLT_Jet30", "HLT_Mu5", "Total"];
/// Object kinds with per-path histograms; photons only have the inclusive one.
const PER_PATH: [(&str, &str); 4] = [
    ("RecoJets", "JetMult"),
    ("RecoMuons", "MuonMult"),
    ("RecoElectrons", "ElecMult"),
    ("RecoMET", "MET"),
];
const GENERAL: [(&str, &str); 5] = [
    ("RecoJets", "JetMult"),
    ("RecoMuons", "MuonMult"),
    ("RecoElectrons", "ElecMult"),
    ("RecoPhotons", "PhotonMult"),
    ("RecoMET", "MET"),
];

/// A bundle of every object the comparison reads. `second` shifts the counts a little.
fn bundle(second: bool) -> serde_json::Map<String, Value> {
    let (l1, hlt, shape) = if second {
        (
            [620.0, 430.0, 90.0, 810.0],
            [380.0, 210.0, 490.0],
            [12.0, 18.0, 29.0, 22.0, 9.0],
        )
    } else {
        (
            [600.0, 450.0, 100.0, 800.0],
            [400.0, 200.0, 500.0],
            [10.0, 20.0, 30.0, 20.0, 10.0],
        )
    };

    let mut h = serde_json::Map::new();
    h.insert("TriggerBits/L1Paths".into(), trigger_bits("L1Paths", &L1_LABELS, &l1));
    h.insert("TriggerBits/HltPaths".into(), trigger_bits("HltPaths", &HLT_LABELS, &hlt));
    for (dir, hist) in GENERAL {
        h.insert(format!("{dir}/General/{hist}"), distribution(hist, &shape));
    }
    for (level, label) in [("L1", "L1_SingleJet36"), ("L1", "L1_HTT200"), ("HLT", "HLT_Jet30")] {
        for (dir, hist) in PER_PATH {
            let name = format!("{hist}_{label}");
            h.insert(format!("{dir}/{level}/{name}"), distribution(&name, &shape));
        }
    }
    h
}

fn write_bundle(dir: &Path, file: &str, histograms: serde_json::Map<String, Value>) -> PathBuf {
    let p = dir.join(file);
    let body = json!({ "histograms": histograms });
    std::fs::write(&p, serde_json::to_vec_pretty(&body).unwrap()).unwrap();
    p
}

fn read_json(p: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(p).unwrap()).unwrap()
}

#[test]
fn end_to_end_outputs() {
    let dir = tmp_dir("e2e");
    let f1 = write_bundle(&dir, "run1.json", bundle(false));
    let f2 = write_bundle(&dir, "run2.json", bundle(true));
    let out_dir = dir.join("plots");
    let results = dir.join("results.json");

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-file",
        results.to_string_lossy().as_ref(),
        "--output-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed: {}", combined_output(&out));

    for f in [
        "L1comparison.log",
        "HLTcomparison.log",
        "L1Eff_1.svg",
        "HLTEff_1.svg",
        "L1Pulls.svg",
        "L1Residuals.svg",
        "HLTPulls.svg",
        "HLTResiduals.svg",
        "JetMult.svg",
        "PhotonMult.svg",
        "JetMult_L1_SingleJet36.svg",
        "MET_L1_HTT200.svg",
        "JetMult_HLT_Jet30.svg",
        "compat_JetMult_L1.svg",
        "compat_MET_HLT.svg",
        "compatibility.json",
    ] {
        assert!(out_dir.join(f).exists(), "expected output: {f}");
    }
    // below the efficiency threshold in both inputs
    assert!(!out_dir.join("JetMult_L1_Rare.svg").exists());
    assert!(!out_dir.join("JetMult_HLT_Mu5.svg").exists());

    let log = std::fs::read_to_string(out_dir.join("L1comparison.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with("# L1 efficiency comparison: run1 vs run2"));
    assert_eq!(lines.len(), 1 + L1_LABELS.len());
    let jet = lines.iter().find(|l| l.starts_with("L1_SingleJet36")).unwrap();
    assert!(jet.contains("eff1=0.6000"), "{jet}");
    assert!(jet.contains("eff2=0.6200"), "{jet}");
    assert!(jet.contains("diff=+0.0200"), "{jet}");

    let svg = std::fs::read_to_string(out_dir.join("L1Eff_1.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">L1_HTT200</text>"));

    let v = read_json(&results);
    assert_eq!(v["schema_version"], "trigger_validation_results_v0");
    assert_eq!(v["meta"]["correlation"], "uncorrelated");
    assert_eq!(v["meta"]["inputs"][0]["label"], "run1");
    let sha = v["meta"]["inputs"][1]["sha256"].as_str().unwrap();
    assert_eq!(sha.len(), 64);
    assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(v["levels"][0]["level"], "L1");
    assert_eq!(v["levels"][0]["selected_paths"], json!(["L1_SingleJet36", "L1_HTT200"]));
    assert_eq!(v["levels"][1]["selected_paths"], json!(["HLT_Jet30"]));
    let residual = v["levels"][0]["pulls"]["residual"][0].as_f64().unwrap();
    assert!((residual - 0.02).abs() < 1e-12);

    let compat = read_json(&out_dir.join("compatibility.json"));
    assert!(compat["scores"]["JetMult"]["score"].as_f64().unwrap() >= 0.0);
    let keys: Vec<&str> =
        compat["summaries"].as_array().unwrap().iter().filter_map(|s| s["key"].as_str()).collect();
    assert_eq!(keys[0], "ElecMult_L1");
    assert!(keys.contains(&"JetMult_HLT"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn absent_summary_keys_produce_no_artifact() {
    let dir = tmp_dir("absent_keys");
    let f1 = write_bundle(&dir, "run1.json", bundle(false));
    let f2 = write_bundle(&dir, "run2.json", bundle(true));
    let out_dir = dir.join("plots");

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-file",
        dir.join("results.json").to_string_lossy().as_ref(),
        "--output-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed: {}", combined_output(&out));

    // No per-path photon histograms: the photon summaries have nothing to show.
    assert!(!out_dir.join("compat_PhotonMult_L1.svg").exists());
    assert!(!out_dir.join("compat_PhotonMult_HLT.svg").exists());
    assert!(out_dir.join("compat_ElecMult_L1.svg").exists());

    let compat = read_json(&out_dir.join("compatibility.json"));
    let skipped = compat["skipped_keys"].as_array().unwrap();
    assert!(skipped.contains(&json!("PhotonMult_L1")));
    assert!(skipped.contains(&json!("PhotonMult_HLT")));

    // the missing per-path photon objects were reported, not fatal
    assert!(combined_output(&out).contains("missing histogram object"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn mismatched_binning_skips_the_pair() {
    let dir = tmp_dir("mismatch");
    let f1 = write_bundle(&dir, "run1.json", bundle(false));
    let mut second = bundle(true);
    second.insert(
        "RecoJets/General/JetMult".into(),
        distribution("JetMult", &[12.0, 18.0, 29.0, 22.0]),
    );
    let f2 = write_bundle(&dir, "run2.json", second);
    let out_dir = dir.join("plots");

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-file",
        dir.join("results.json").to_string_lossy().as_ref(),
        "--output-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed: {}", combined_output(&out));
    assert!(combined_output(&out).contains("binning mismatch"));

    assert!(!out_dir.join("JetMult.svg").exists());
    assert!(out_dir.join("MuonMult.svg").exists());
    let compat = read_json(&out_dir.join("compatibility.json"));
    assert!(compat["scores"].get("JetMult").is_none());
    assert!(compat["scores"].get("MuonMult").is_some());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_trigger_bits_skip_the_level() {
    let dir = tmp_dir("missing_level");
    let f1 = write_bundle(&dir, "run1.json", bundle(false));
    let mut second = bundle(true);
    second.remove("TriggerBits/HltPaths");
    let f2 = write_bundle(&dir, "run2.json", second);
    let out_dir = dir.join("plots");
    let results = dir.join("results.json");

    let out = run(&[
        "--file1",
        f1.to_string_lossy().as_ref(),
        "--file2",
        f2.to_string_lossy().as_ref(),
        "--output-file",
        results.to_string_lossy().as_ref(),
        "--output-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed: {}", combined_output(&out));
    assert!(combined_output(&out).contains("missing histogram object: TriggerBits/HltPaths"));

    assert!(out_dir.join("L1comparison.log").exists());
    assert!(!out_dir.join("HLTcomparison.log").exists());
    assert!(!out_dir.join("JetMult_HLT_Jet30.svg").exists());

    let v = read_json(&results);
    assert_eq!(v["levels"].as_array().unwrap().len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn legacy_argument_syntax() {
    let dir = tmp_dir("legacy");
    let f1 = write_bundle(&dir, "run1.json", bundle(false));
    let f2 = write_bundle(&dir, "run2.json", bundle(true));
    let out_dir = dir.join("plots");
    let results = dir.join("legacy_results.json");

    let file1 = format!("-File1={}", f1.display());
    let file2 = format!("-File2={}", f2.display());
    let output = format!("-OutputFile={}", results.display());
    let out = run(&[
        &file1,
        &file2,
        &output,
        "--correlated",
        "--oldL1names",
        "--output-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(out.status.success(), "run should succeed: {}", combined_output(&out));

    let v = read_json(&results);
    assert_eq!(v["meta"]["correlation"], "correlated");
    assert_eq!(v["levels"][0]["pulls"]["correlation"], "correlated");

    // L1 summaries use the `_A` suffix, which these paths do not carry.
    assert!(!out_dir.join("compat_JetMult_L1.svg").exists());
    assert!(!out_dir.join("compat_JetMult_A.svg").exists());
    assert!(out_dir.join("compat_JetMult_HLT.svg").exists());
    let compat = read_json(&out_dir.join("compatibility.json"));
    assert!(compat["skipped_keys"].as_array().unwrap().contains(&json!("JetMult_A")));

    std::fs::remove_dir_all(&dir).ok();
}
