//! # canopy
//!
//! Tree silhouettes on a 2D stage, with live overlap detection and a
//! bounding-square readout.
//!
//! ## Rust Lesson #1: Modules
//!
//! Every file under `src/` is declared here. `pub mod` makes it part of the
//! public API; `pub use` re-exports the handful of names most callers need
//! so they can write `canopy::recompute` instead of
//! `canopy::collision::recompute`.

pub mod collision;
pub mod error;
pub mod geometry;
pub mod intersect;
pub mod scene;
pub mod shape;
pub mod stage;
pub mod svg;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use collision::{recompute, CollisionEngine, CollisionReport, Tree};
pub use error::{GeometryError, SceneError};
pub use geometry::{BoundingBox, BoundingSquare, Point, Polygon};
pub use intersect::{
    classify_overlap, orient, point_in_polygon, polygons_intersect, segments_intersect, Overlap,
};
pub use scene::{poses_from_svg, scene_from_svg, scene_to_svg, Scene};
pub use shape::{ShapeTemplate, Silhouette, TREE_HEIGHT, TREE_SHAPE_UNITS};
pub use stage::{Stage, StageError};
pub use svg::{template_from_path_data, template_from_svg, SvgError};
pub use transform::{transform_pose, Pose};
