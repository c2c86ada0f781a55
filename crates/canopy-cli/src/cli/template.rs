//! Template command implementation.
//!
//! Prints a silhouette's unit outline and derived sizes, either for the
//! built-in tree or for one imported from an SVG file or path data. Useful
//! for checking a custom outline before scattering with it.

use std::path::PathBuf;

use serde::Serialize;

use canopy::{transform_pose, Pose, TREE_HEIGHT};

use super::common::{fail, flag_value};
use super::config::StageConfig;

#[derive(Serialize)]
struct TemplateSummary<'a> {
    source: &'a str,
    height: f64,
    width: f64,
    radius: f64,
    clockwise: bool,
    units: &'a [(f64, f64)],
}

/// Execute the template command.
pub fn cmd_template(args: &[String]) {
    let mut svg_path: Option<&str> = None;
    let mut path_data: Option<&str> = None;
    let mut height = TREE_HEIGHT;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--svg" => {
                i += 1;
                svg_path = args.get(i).map(String::as_str);
            }
            "--path" => {
                i += 1;
                path_data = args.get(i).map(String::as_str);
            }
            "-t" | "--height" => {
                i += 1;
                height = flag_value(args, i, "--height");
            }
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
            }
        }
        i += 1;
    }

    let source = match (svg_path, path_data) {
        (Some(path), _) => path,
        (None, Some(_)) => "path data",
        (None, None) => "built-in tree",
    };
    let config = StageConfig {
        tree_height: height,
        template_path: path_data.map(str::to_string),
        template_svg: svg_path.map(PathBuf::from),
        ..StageConfig::default()
    };
    let silhouette = config.silhouette().unwrap_or_else(|e| fail(e));

    // Upright at the origin, in stage pixels.
    let outline = transform_pose(&Pose::new(0.0, 0.0, 0.0), &silhouette);

    let summary = TemplateSummary {
        source,
        height,
        width: silhouette.width(),
        radius: silhouette.radius(),
        clockwise: outline.is_clockwise(),
        units: silhouette.template().units(),
    };

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{}", s),
            Err(e) => fail(e),
        }
        return;
    }

    println!("Template: {} ({} vertices)", summary.source, summary.units.len());
    println!(
        "Height: {:.1} px  Width: {:.1} px  Radius: {:.1} px",
        summary.height, summary.width, summary.radius
    );
    println!("Winding: {}", if summary.clockwise { "clockwise" } else { "counter-clockwise" });
    println!("Unit outline:");
    for (ux, uy) in summary.units {
        println!("  {:>8.4} {:>8.4}", ux, uy);
    }
}

fn print_usage() {
    eprintln!("Usage: canopy template [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --svg <file>          Import the first shape of an SVG file");
    eprintln!("  --path <d>            Import SVG path data");
    eprintln!("  -t, --height <px>     Tree height in pixels (default: 96)");
    eprintln!("  --json                Print as JSON");
    eprintln!();
    eprintln!("Outlines are drawn with the tree origin at (0,0), y pointing down.");
}
