//! Check command implementation.
//!
//! Loads a scene, runs one collision pass and reports which trees overlap
//! along with the bounding square. Exit status is 2 when anything collides
//! so the command can gate scripts.

use serde::Serialize;

use canopy::{CollisionReport, Stage, Tree};

use super::common::{fail, load_scene};

/// Exit status when the scene has at least one colliding pair.
pub const COLLISION_EXIT_CODE: i32 = 2;

#[derive(Serialize)]
struct CheckOutput<'a> {
    status: &'static str,
    trees: &'a [Tree],
    report: &'a CollisionReport,
}

/// Execute the check command.
pub fn cmd_check(args: &[String]) {
    let mut scene_path: Option<&str> = None;
    let mut json = false;

    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-" => {
                if scene_path.is_none() {
                    scene_path = Some("-");
                }
            }
            path if !path.starts_with('-') => {
                if scene_path.is_none() {
                    scene_path = Some(path);
                }
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
            }
        }
    }

    let scene_path = scene_path.unwrap_or_else(|| {
        eprintln!("Error: scene file required (use '-' for stdin)");
        print_usage();
        std::process::exit(1);
    });

    let scene = load_scene(scene_path).unwrap_or_else(|e| fail(e));
    let stage = scene.to_stage().unwrap_or_else(|e| fail(e));
    let report = stage.report();

    if json {
        let output = CheckOutput {
            status: report.status_message(),
            trees: stage.trees(),
            report,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => fail(e),
        }
    } else {
        print_report(&stage);
    }

    if report.any_collision {
        std::process::exit(COLLISION_EXIT_CODE);
    }
}

fn print_report(stage: &Stage) {
    let report = stage.report();
    println!("Trees: {}", stage.trees().len());
    println!(
        "Colliding: {} ({} pair{})",
        report.colliding_count(),
        report.colliding_pairs.len(),
        if report.colliding_pairs.len() == 1 { "" } else { "s" }
    );
    for &(a, b) in &report.colliding_pairs {
        if let (Some(a), Some(b)) = (stage.tree(a), stage.tree(b)) {
            println!("  {} <-> {}", a.label, b.label);
        }
    }
    match report.display_side() {
        Some(side) => println!("Bounding square: {:.1} px", side),
        None => println!("Bounding square: none"),
    }
    println!("{}", report.status_message());
}

fn print_usage() {
    eprintln!("Usage: canopy check <scene.json|scene.svg> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json    Print trees and the full report as JSON");
    eprintln!();
    eprintln!("Exits with status {} when any trees collide.", COLLISION_EXIT_CODE);
}
