//! Common utilities shared across CLI commands.

use std::fmt::Display;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use canopy::{scene_from_svg, Scene};

use super::config::ConfigError;

/// A scene as written to disk by `scatter`.
///
/// Plain `Scene` JSON (no `generated`/`seed`) loads just as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub scene: Scene,
}

/// Load a scene from a JSON or SVG file, or JSON on stdin for `-`.
pub fn load_scene(path: &str) -> Result<Scene, ConfigError> {
    let scene = if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        parse_json_scene(&buffer)?
    } else {
        let content = fs::read_to_string(path)?;
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("json") => parse_json_scene(&content)?,
            Some("svg") => {
                scene_from_svg(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("(none)").to_string(),
                ))
            }
        }
    };
    check_scene(&scene)?;
    Ok(scene)
}

fn parse_json_scene(content: &str) -> Result<Scene, ConfigError> {
    let file: SceneFile =
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(file.scene)
}

/// Scenes come from outside; bad numbers are input errors, not panics.
fn check_scene(scene: &Scene) -> Result<(), ConfigError> {
    scene.validate().map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Write to a file, or stdout for `None`/`-`.
pub fn write_output(output_path: Option<&str>, content: &str) -> Result<(), io::Error> {
    match output_path {
        Some("-") | None => {
            println!("{}", content);
        }
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote: {}", path);
        }
    }
    Ok(())
}

/// Parse the value following a flag, exiting on a missing or bad value.
pub fn flag_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let Some(raw) = args.get(i) else {
        fail(format!("{} needs a value", flag));
    };
    raw.parse()
        .unwrap_or_else(|_| fail(format!("invalid value for {}: {}", flag, raw)))
}

/// Print `Error: ...` and exit with status 1.
pub fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
