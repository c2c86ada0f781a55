//! Scatter command implementation.

use std::path::PathBuf;

use chrono::Local;
use log::debug;

use canopy::Scene;

use super::common::{fail, flag_value, write_output, SceneFile};
use super::config::StageConfig;

/// Execute the scatter command.
pub fn cmd_scatter(args: &[String]) {
    let mut config_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut count: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut width: Option<f64> = None;
    let mut height: Option<f64> = None;
    let mut tree_height: Option<f64> = None;
    let mut template_path: Option<String> = None;
    let mut template_svg: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                config_path = args.get(i).map(String::as_str);
            }
            "-o" | "--output" => {
                i += 1;
                output_path = args.get(i).map(String::as_str);
            }
            "-n" | "--count" => {
                i += 1;
                count = Some(flag_value(args, i, "--count"));
            }
            "--seed" => {
                i += 1;
                seed = Some(flag_value(args, i, "--seed"));
            }
            "-w" | "--width" => {
                i += 1;
                width = Some(flag_value(args, i, "--width"));
            }
            "--height" => {
                i += 1;
                height = Some(flag_value(args, i, "--height"));
            }
            "-t" | "--tree-height" => {
                i += 1;
                tree_height = Some(flag_value(args, i, "--tree-height"));
            }
            "--template-path" => {
                i += 1;
                template_path = args.get(i).cloned();
            }
            "--template-svg" => {
                i += 1;
                template_svg = args.get(i).cloned();
            }
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

    let mut config = match config_path {
        Some(path) => StageConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => StageConfig::default(),
    };

    // Flags win over the config file.
    if let Some(n) = count {
        config.tree_count = n;
    }
    if let Some(w) = width {
        config.width = w;
    }
    if let Some(h) = height {
        config.height = h;
    }
    if let Some(h) = tree_height {
        config.tree_height = h;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    // A template flag replaces whichever template the config named.
    if template_path.is_some() || template_svg.is_some() {
        config.template_path = template_path;
        config.template_svg = template_svg.map(PathBuf::from);
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    debug!("scatter config: {:?}, seed {}", config, seed);

    let mut stage = config.stage().unwrap_or_else(|e| fail(e));
    let report = stage.scatter(config.tree_count, seed).clone();

    let file = SceneFile {
        generated: Some(Local::now().to_rfc3339()),
        seed: Some(seed),
        scene: Scene::from_stage(&stage),
    };
    let json = serde_json::to_string_pretty(&file).unwrap_or_else(|e| fail(e));

    eprintln!(
        "Scattered {} trees on {}x{} (seed {})",
        config.tree_count, config.width, config.height, seed
    );
    eprintln!("{}", report.status_message());

    if let Err(e) = write_output(output_path, &json) {
        fail(e);
    }
}

fn print_usage() {
    eprintln!("Usage: canopy scatter [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --count <n>        Number of trees (default: 10)");
    eprintln!("  --seed <n>             Random seed (default: random)");
    eprintln!("  -w, --width <px>       Stage width (default: 800)");
    eprintln!("  --height <px>          Stage height (default: 600)");
    eprintln!("  -t, --tree-height <px> Tree height (default: 96)");
    eprintln!("  --template-path <d>    Custom silhouette from SVG path data");
    eprintln!("  --template-svg <file>  Custom silhouette from an SVG file");
    eprintln!("  -c, --config <file>    YAML stage config (flags override it)");
    eprintln!("  -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!();
    eprintln!("Writes a JSON scene that 'check' and 'render' can read.");
}
