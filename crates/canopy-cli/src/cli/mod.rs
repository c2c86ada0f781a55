//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `scatter` - Generate a random scene
//! - `check` - Report collisions and the bounding square for a scene
//! - `render` - Draw a scene as SVG, optionally rasterized to PNG
//! - `benchmark` - Time repeated collision passes
//! - `template` - Inspect the built-in or an imported silhouette

pub mod benchmark;
pub mod check;
pub mod common;
pub mod config;
pub mod render;
pub mod scatter;
pub mod template;

pub use benchmark::cmd_benchmark;
pub use check::cmd_check;
pub use render::cmd_render;
pub use scatter::cmd_scatter;
pub use template::cmd_template;
