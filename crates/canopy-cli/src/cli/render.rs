//! Render command implementation.

use resvg::usvg;
use thiserror::Error;
use tiny_skia::{Pixmap, Transform};

use canopy::scene_to_svg;

use super::common::{fail, flag_value, load_scene, write_output};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse generated SVG: {0}")]
    Svg(String),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("failed to write PNG: {0}")]
    Png(String),
}

/// Rasterize an SVG document to a PNG file at `scale` pixels per unit.
pub fn render_png(svg: &str, width: f64, height: f64, scale: f32, path: &str) -> Result<(), RenderError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

    let px_width = (width * scale as f64).ceil().max(1.0) as u32;
    let px_height = (height * scale as f64).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(px_width, px_height).ok_or(RenderError::Pixmap {
        width: px_width,
        height: px_height,
    })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.save_png(path).map_err(|e| RenderError::Png(e.to_string()))
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) {
    let mut scene_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut png_path: Option<&str> = None;
    let mut png_scale: f32 = 1.0;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                output_path = args.get(i).map(String::as_str);
            }
            "--png" => {
                i += 1;
                png_path = args.get(i).map(String::as_str);
            }
            "--png-scale" => {
                i += 1;
                png_scale = flag_value(args, i, "--png-scale");
            }
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
        i += 1;
    }

    let scene_path = scene_path.unwrap_or_else(|| {
        eprintln!("Error: scene file required (use '-' for stdin)");
        print_usage();
        std::process::exit(1);
    });
    if !(png_scale.is_finite() && png_scale > 0.0) {
        fail(format!("--png-scale must be positive, got {}", png_scale));
    }

    let scene = load_scene(scene_path).unwrap_or_else(|e| fail(e));
    let stage = scene.to_stage().unwrap_or_else(|e| fail(e));
    let svg = scene_to_svg(&stage);

    if let Some(path) = png_path {
        if let Err(e) = render_png(&svg, stage.width(), stage.height(), png_scale, path) {
            fail(e);
        }
        eprintln!("Wrote: {}", path);
        // PNG only, unless an SVG output was asked for too.
        if output_path.is_none() {
            return;
        }
    }

    if let Err(e) = write_output(output_path, &svg) {
        fail(e);
    }
}

fn print_usage() {
    eprintln!("Usage: canopy render <scene.json|scene.svg> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>    SVG output file (- for stdout, default: stdout)");
    eprintln!("  --png <file>           Rasterize to PNG instead");
    eprintln!("  --png-scale <k>        PNG pixels per stage pixel (default: 1)");
    eprintln!();
    eprintln!("Colliding trees are drawn in red; the bounding square is dashed.");
}
