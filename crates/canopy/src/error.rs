//! Errors raised while building geometry from caller-supplied data.

use thiserror::Error;

/// A point list that cannot describe a polygon.
///
/// The built-in tree template never produces these. They surface when a
/// caller supplies its own silhouette (see [`crate::shape::ShapeTemplate::new`]
/// and the SVG importers) or builds a [`crate::geometry::Polygon`] by hand.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer than three vertices.
    #[error("polygon needs at least 3 points, got {points}")]
    InvalidPolygon { points: usize },

    /// A NaN or infinite coordinate.
    #[error("non-finite coordinate at vertex {index}")]
    NonFiniteCoordinate { index: usize },
}

/// Scene data that cannot be placed on a stage.
///
/// Scenes are read from files, so these are input errors. The stage and
/// pose transform assume they have been ruled out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Stage width, stage height or tree height that is not a positive number.
    #[error("{name} must be positive, got {value}")]
    InvalidSize { name: &'static str, value: f64 },

    /// A NaN or infinite coordinate or rotation.
    #[error("tree at index {index} has a non-finite pose")]
    NonFinitePose { index: usize },

    #[error("bad tree template: {0}")]
    Template(#[from] GeometryError),
}
