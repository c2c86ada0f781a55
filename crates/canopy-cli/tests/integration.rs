//! Integration tests for canopy CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the canopy binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_canopy"))
}

/// A scratch file path unique to this test process.
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("canopy-it-{}-{}", std::process::id(), name))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Two trees on top of each other, one far away.
const OVERLAPPING_SCENE: &str = r#"{
    "width": 800,
    "height": 600,
    "trees": [
        {"x": 200, "y": 300, "rotation": 0},
        {"x": 210, "y": 300, "rotation": 15},
        {"x": 650, "y": 500, "rotation": 0}
    ]
}"#;

const APART_SCENE: &str = r#"{
    "width": 800,
    "height": 600,
    "trees": [
        {"x": 100, "y": 150},
        {"x": 500, "y": 450}
    ]
}"#;

#[test]
fn help_lists_commands() {
    let output = run(&["help"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    for command in ["scatter", "check", "render", "benchmark", "template"] {
        assert!(stderr.contains(command), "Help should mention '{}'", command);
    }
}

#[test]
fn unknown_command_fails() {
    let output = run(&["plant"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown command"));
}

#[test]
fn scatter_is_reproducible_with_seed() {
    let first = run(&["scatter", "-n", "12", "--seed", "7"]);
    let second = run(&["scatter", "-n", "12", "--seed", "7"]);
    assert!(first.status.success());

    let a: serde_json::Value = serde_json::from_slice(&first.stdout).expect("scatter should emit JSON");
    let b: serde_json::Value = serde_json::from_slice(&second.stdout).expect("scatter should emit JSON");

    assert_eq!(a["seed"], 7);
    assert_eq!(a["trees"].as_array().map(Vec::len), Some(12));
    assert_eq!(a["trees"], b["trees"]);
    assert!(a["generated"].is_string(), "Scene should carry a timestamp");
}

#[test]
fn scatter_then_check_round_trip() {
    let scene = scratch("scatter.json");
    let output = run(&[
        "scatter", "-n", "5", "--seed", "3", "-w", "1000", "--height", "700", "-o",
        scene.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(scene.exists(), "Output file should be written");

    let output = run(&["check", scene.to_str().unwrap()]);
    fs::remove_file(&scene).ok();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Trees: 5"));
    assert!(stdout.contains("Bounding square:"));
    // Whatever the layout, the exit code agrees with the status line.
    let collided = stdout.contains("Collision detected!");
    assert_eq!(output.status.code(), Some(if collided { 2 } else { 0 }));
}

#[test]
fn check_reports_overlapping_trees() {
    let scene = scratch("overlap.json");
    fs::write(&scene, OVERLAPPING_SCENE).unwrap();

    let output = run(&["check", scene.to_str().unwrap()]);
    fs::remove_file(&scene).ok();

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tree 1 <-> Tree 2"));
    assert!(stdout.contains("Collision detected! Move the trees apart."));
}

#[test]
fn check_json_output() {
    let scene = scratch("apart.json");
    fs::write(&scene, APART_SCENE).unwrap();

    let output = run(&["check", scene.to_str().unwrap(), "--json"]);
    fs::remove_file(&scene).ok();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should be valid JSON");
    assert_eq!(json["status"], "No collisions detected.");
    assert_eq!(json["report"]["any_collision"], false);
    assert_eq!(json["trees"][1]["label"], "Tree 2");
    assert!(json["report"]["bounding_square"]["side"].as_f64().unwrap() > 0.0);
}

#[test]
fn check_rejects_missing_file() {
    let output = run(&["check", "/nonexistent/scene.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn render_svg_then_check_svg() {
    let scene = scratch("render.json");
    let svg = scratch("render.svg");
    fs::write(&scene, OVERLAPPING_SCENE).unwrap();

    let output = run(&["render", scene.to_str().unwrap(), "-o", svg.to_str().unwrap()]);
    assert!(output.status.success());

    let content = fs::read_to_string(&svg).unwrap();
    assert!(content.contains("<svg"));
    assert_eq!(content.matches("class=\"tree colliding\"").count(), 2);
    assert!(content.contains("id=\"bounding-square\""));

    // The snapshot carries enough to be checked again.
    let output = run(&["check", svg.to_str().unwrap()]);
    fs::remove_file(&scene).ok();
    fs::remove_file(&svg).ok();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Trees: 3"));
}

#[test]
fn render_png() {
    let scene = scratch("png.json");
    let png = scratch("out.png");
    fs::write(&scene, APART_SCENE).unwrap();

    let output = run(&[
        "render",
        scene.to_str().unwrap(),
        "--png",
        png.to_str().unwrap(),
        "--png-scale",
        "0.5",
    ]);
    let bytes = fs::read(&png).unwrap_or_default();
    fs::remove_file(&scene).ok();
    fs::remove_file(&png).ok();

    assert!(output.status.success());
    assert!(bytes.starts_with(b"\x89PNG"), "Should write a PNG file");
}

#[test]
fn scatter_reads_yaml_config() {
    let config = scratch("stage.yaml");
    fs::write(&config, "width: 400\nheight: 300\ntree_count: 4\ntree_height: 60\nseed: 11\n").unwrap();

    let output = run(&["scatter", "-c", config.to_str().unwrap()]);
    fs::remove_file(&config).ok();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["width"], 400.0);
    assert_eq!(json["tree_height"], 60.0);
    assert_eq!(json["seed"], 11);
    assert_eq!(json["trees"].as_array().map(Vec::len), Some(4));
}

#[test]
fn template_shows_builtin_tree() {
    let output = run(&["template"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("built-in tree (15 vertices)"));
}

#[test]
fn template_imports_path_data() {
    let output = run(&["template", "--path", "M 0,-80 L 40,0 L -40,0 Z", "--height", "100", "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["units"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["height"], 100.0);
}

#[test]
fn template_rejects_degenerate_path() {
    let output = run(&["template", "--path", "M 0,0 L 10,0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn benchmark_prints_summary() {
    let output = run(&["benchmark", "-n", "30", "-i", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CANOPY BENCHMARK: 30 TREES"));
    assert!(stdout.contains("Pairs per pass: 435"));
}

#[test]
fn custom_template_flows_through_scene_files() {
    let scene = scratch("triangles.json");
    let svg = scratch("triangles.svg");
    let output = run(&[
        "scatter", "-n", "6", "--seed", "5", "--template-path", "M 0,-80 L 40,0 L -40,0 Z",
        "-o", scene.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&scene).unwrap()).unwrap();
    assert_eq!(json["template"].as_array().map(Vec::len), Some(3));

    let output = run(&["render", scene.to_str().unwrap(), "-o", svg.to_str().unwrap()]);
    assert!(output.status.success());
    let content = fs::read_to_string(&svg).unwrap();
    assert!(content.contains("data-template="));

    // Each tree polygon in the snapshot is a triangle.
    let polygon = content
        .lines()
        .find(|line| line.contains("class=\"tree"))
        .expect("Snapshot should contain trees");
    let points = polygon.split("points=\"").nth(1).unwrap().split('"').next().unwrap();
    assert_eq!(points.split_whitespace().count(), 3);

    let output = run(&["check", svg.to_str().unwrap()]);
    fs::remove_file(&scene).ok();
    fs::remove_file(&svg).ok();
    assert!(String::from_utf8_lossy(&output.stdout).contains("Trees: 6"));
}

#[test]
fn check_rejects_nan_pose_in_svg() {
    let svg = scratch("nan.svg");
    fs::write(
        &svg,
        r#"<svg width="400" height="300"><polygon class="tree" data-index="0" data-x="NaN" data-y="2"/></svg>"#,
    )
    .unwrap();

    let output = run(&["check", svg.to_str().unwrap()]);
    fs::remove_file(&svg).ok();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("non-finite pose"));
}
