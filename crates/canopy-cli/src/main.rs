//! canopy - scatter tree silhouettes on a stage and check them for overlaps
//!
//! Usage:
//!   canopy scatter [-n N] [--seed S]      Generate a random scene (JSON)
//!   canopy check <scene>                  Report collisions in a scene
//!   canopy render <scene> [-o out.svg]    Draw a scene as SVG or PNG
//!   canopy benchmark [-n N]               Time the collision pass
//!   canopy template [--svg file]          Inspect a silhouette outline

use std::env;

mod cli;

use cli::{cmd_benchmark, cmd_check, cmd_render, cmd_scatter, cmd_template};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "scatter" => cmd_scatter(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "render" => cmd_render(&args[2..]),
        "benchmark" => cmd_benchmark(&args[2..]),
        "template" => cmd_template(&args[2..]),
        "help" | "--help" | "-h" => print_usage(&args[0]),
        unknown => {
            eprintln!("Unknown command: {}", unknown);
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("canopy - tree silhouettes with live collision detection");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} scatter [options]                 Scatter trees on a stage", prog);
    eprintln!("  {} check <scene> [--json]            Check a scene for collisions", prog);
    eprintln!("  {} render <scene> [options]          Render a scene to SVG/PNG", prog);
    eprintln!("  {} benchmark [options]               Time collision passes", prog);
    eprintln!("  {} template [options]                Show a silhouette outline", prog);
    eprintln!();
    eprintln!("Scatter options:");
    eprintln!("  -n, --count <n>        Number of trees (default: 10)");
    eprintln!("  --seed <n>             Random seed (default: random)");
    eprintln!("  -w, --width <px>       Stage width (default: 800)");
    eprintln!("  --height <px>          Stage height (default: 600)");
    eprintln!("  -t, --tree-height <px> Tree height (default: 96)");
    eprintln!("  -c, --config <file>    YAML stage config");
    eprintln!("  -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!();
    eprintln!("Scenes are JSON files written by 'scatter' or SVG files written by 'render'.");
    eprintln!("'check' exits with status 2 when any trees collide.");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for engine diagnostics.");
}
