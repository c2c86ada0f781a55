//! Benchmark command implementation.

use std::time::Instant;

use canopy::{Stage, TREE_HEIGHT};

use super::common::{fail, flag_value};

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) {
    let mut count: usize = 200;
    let mut iterations: usize = 20;
    let mut seed: u64 = 42;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--count" => {
                i += 1;
                count = flag_value(args, i, "--count");
            }
            "-i" | "--iterations" => {
                i += 1;
                iterations = flag_value(args, i, "--iterations");
            }
            "--seed" => {
                i += 1;
                seed = flag_value(args, i, "--seed");
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

    if iterations == 0 {
        fail("--iterations must be at least 1");
    }

    // Roughly a tree and a half of room per tree, so some overlap but not all.
    let side = ((count.max(1) as f64).sqrt() * TREE_HEIGHT * 1.5).max(TREE_HEIGHT * 2.0);
    let mut stage = Stage::new(side, side);

    println!("Scattering {} trees on {:.0}x{:.0} (seed {})", count, side, side, seed);
    let start_scatter = Instant::now();
    stage.scatter(count, seed);
    println!("Scattered in {:?}", start_scatter.elapsed());

    println!("\nRunning {} collision passes...", iterations);
    let start = Instant::now();
    for _ in 0..iterations {
        stage.recompute();
    }
    let elapsed = start.elapsed();

    let report = stage.report();
    let pairs = count * count.saturating_sub(1) / 2;
    let per_pass_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  CANOPY BENCHMARK: {} TREES", count);
    println!("═══════════════════════════════════════════════");
    println!("  Pairs per pass: {}", pairs);
    println!("  Colliding trees: {}", report.colliding_count());
    println!("  Colliding pairs: {}", report.colliding_pairs.len());
    println!("  Time: {:?}", elapsed);
    println!("  Avg per pass: {:.3}ms", per_pass_ms);
    if pairs > 0 {
        println!("  Avg per pair: {:.3}µs", per_pass_ms * 1000.0 / pairs as f64);
    }
    println!("═══════════════════════════════════════════════");
}

fn print_usage() {
    eprintln!("Usage: canopy benchmark [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --count <n>         Number of trees (default: 200)");
    eprintln!("  -i, --iterations <n>    Collision passes to time (default: 20)");
    eprintln!("  --seed <n>              Scatter seed (default: 42)");
    eprintln!();
    eprintln!("Benchmarks the all-pairs collision pass.");
}
