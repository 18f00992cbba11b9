use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("phyloxml").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

#[test]
fn parse_prints_the_phylogeny_as_json() {
    let exe = assert_cmd::cargo_bin!("cladeview");
    let output = Command::new(exe)
        .args(["parse", fixture("influenza.xml").to_string_lossy().as_ref()])
        .output()
        .expect("run cladeview");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["rooted"], true);
    assert_eq!(value["clades"].as_array().map(Vec::len), Some(9));
}

#[test]
fn layout_prints_cytoscape_elements() {
    let exe = assert_cmd::cargo_bin!("cladeview");
    let output = Command::new(exe)
        .args([
            "layout",
            "--preset",
            "compact",
            "--pretty",
            fixture("topology_only.xml").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run cladeview");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(9));
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(8));
    assert_eq!(value["nodes"][0]["position"]["x"], 30.0);
}

#[test]
fn export_writes_and_overwrites_the_document() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("tree.html");

    for _ in 0..2 {
        let exe = assert_cmd::cargo_bin!("cladeview");
        Command::new(exe)
            .args([
                "export",
                "--highlight",
                "A/Anhui/1/2005 H5N1",
                "--out",
                out.to_string_lossy().as_ref(),
                fixture("influenza.xml").to_string_lossy().as_ref(),
            ])
            .assert()
            .success();
    }

    let html = fs::read_to_string(&out).expect("read html");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"[name *= \"A/Anhui/1/2005_H5N1\"]"#));
    assert_eq!(html.matches("<!DOCTYPE html>").count(), 1);
}

#[test]
fn export_defaults_to_the_fixed_file_name() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let exe = assert_cmd::cargo_bin!("cladeview");
    Command::new(exe)
        .current_dir(tmp.path())
        .args(["export", fixture("influenza.xml").to_string_lossy().as_ref()])
        .assert()
        .success();
    assert!(tmp.path().join("phylogenetic_tree.html").exists());
}

#[test]
fn usage_errors_exit_with_code_two() {
    let exe = assert_cmd::cargo_bin!("cladeview");
    Command::new(exe)
        .args(["--preset", "narrow", "tree.xml"])
        .assert()
        .code(2);

    let exe = assert_cmd::cargo_bin!("cladeview");
    Command::new(exe).args(["--port"]).assert().code(2);
}

#[test]
fn startup_failures_exit_with_code_one() {
    let exe = assert_cmd::cargo_bin!("cladeview");
    let output = Command::new(exe)
        .args(["layout", fixture("broken.xml").to_string_lossy().as_ref()])
        .output()
        .expect("run cladeview");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed PhyloXML"), "stderr: {stderr}");

    let exe = assert_cmd::cargo_bin!("cladeview");
    Command::new(exe)
        .args(["layout", repo_root().join("no-such.xml").to_string_lossy().as_ref()])
        .assert()
        .code(1);
}
