//! Tests for the boxcat CLI tool including:
//! - Default run from a file and from stdin
//! - Parameter flags (--box-type, --time-unit)
//! - Output to file (-o)
//! - Metadata printing
//! - Failure exit codes

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

// ============================================================================
// Helper functions
// ============================================================================

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run boxcat with given arguments and return (exit_code, stdout, stderr).
fn run_boxcat(args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_boxcat"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute boxcat");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn last_view_boxes(output: &str) -> Vec<Value> {
    let doc: Value = serde_json::from_str(output).unwrap();
    let views = doc["views"].as_array().unwrap();
    views
        .last()
        .unwrap()["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["@type"].as_str().unwrap().contains("/BoundingBox/"))
        .map(|a| a["properties"]["coordinates"].clone())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_default_run() {
    let path = fixture_path("two_frames.mmif");
    let (code, stdout, stderr) = run_boxcat(&[path.to_str().unwrap()], None);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        last_view_boxes(&stdout),
        vec![
            json!([[10, 20], [90, 20], [10, 70], [90, 70]]),
            json!([[5, 5], [25, 5], [5, 15], [25, 15]]),
        ]
    );
}

#[test]
fn test_stdin_run() {
    let input = std::fs::read_to_string(fixture_path("two_frames.mmif")).unwrap();
    let (code, stdout, _) = run_boxcat(&["-"], Some(&input));
    assert_eq!(code, 0);
    assert_eq!(last_view_boxes(&stdout).len(), 2);
}

#[test]
fn test_box_type_and_time_unit() {
    let path = fixture_path("two_frames.mmif");
    let (code, stdout, _) = run_boxcat(
        &[
            "--box-type",
            "face",
            "--time-unit",
            "seconds",
            path.to_str().unwrap(),
        ],
        None,
    );
    assert_eq!(code, 0);
    assert_eq!(
        last_view_boxes(&stdout),
        vec![json!([[0, 0], [200, 0], [0, 200], [200, 200]])]
    );

    let doc: Value = serde_json::from_str(&stdout).unwrap();
    let view = doc["views"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(view["annotations"][0]["properties"]["timeUnit"], json!("seconds"));
    assert_eq!(view["annotations"][0]["properties"]["timePoint"], json!(30));
    assert_eq!(view["annotations"][1]["properties"]["boxType"], json!("face"));
}

#[test]
fn test_output_file_and_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mmif");
    let path = fixture_path("two_frames.mmif");
    let (code, stdout, _) = run_boxcat(
        &[
            "-p",
            "-o",
            out.to_str().unwrap(),
            path.to_str().unwrap(),
        ],
        None,
    );
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.lines().count() > 10);
    assert_eq!(last_view_boxes(&written).len(), 2);
}

#[test]
fn test_metadata_flag() {
    let (code, stdout, _) = run_boxcat(&["--metadata"], None);
    assert_eq!(code, 0);
    let metadata: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(metadata["name"], json!("BoundingBox Concatenation"));
}

#[test]
fn test_dangling_reference_fails() {
    let input = json!({
        "metadata": {"mmif": "http://mmif.clams.ai/1.0.0"},
        "views": [{
            "id": "v_0",
            "metadata": {"contains": {}},
            "annotations": [{
                "@type": "http://mmif.clams.ai/vocabulary/Alignment/v1",
                "properties": {"id": "al_1", "source": "tp_1", "target": "bb_1"}
            }]
        }]
    })
    .to_string();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mmif");
    let (code, stdout, stderr) = run_boxcat(&["-o", out.to_str().unwrap(), "-"], Some(&input));
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("annotation not found: v_0:tp_1"), "stderr: {}", stderr);
    assert!(!out.exists());
}

#[test]
fn test_missing_file_fails() {
    let (code, _, stderr) = run_boxcat(&["/nonexistent/input.mmif"], None);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("Error: failed to read /nonexistent/input.mmif"));
}

#[test]
fn test_invalid_time_unit_is_rejected_by_clap() {
    let path = fixture_path("two_frames.mmif");
    let (code, _, _) = run_boxcat(&["--time-unit", "hours", path.to_str().unwrap()], None);
    assert_eq!(code, 2);
}

#[test]
fn test_empty_box_type_fails() {
    let path = fixture_path("two_frames.mmif");
    let (code, stdout, stderr) = run_boxcat(&["--box-type", "", path.to_str().unwrap()], None);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("invalid parameter `boxType`"), "stderr: {}", stderr);
}

#[test]
fn test_invocation_parameters_are_recorded() {
    let path = fixture_path("two_frames.mmif");
    let (code, stdout, _) = run_boxcat(&["-u", "seconds", path.to_str().unwrap()], None);
    assert_eq!(code, 0);
    let doc: Value = serde_json::from_str(&stdout).unwrap();
    let view = doc["views"].as_array().unwrap().last().unwrap();
    assert_eq!(
        view["metadata"]["parameters"],
        json!({"timeUnit": "seconds", "boxType": "text"})
    );
}
