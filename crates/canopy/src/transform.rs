//! Tree pose and the unit-space → stage-space transform.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};
use crate::shape::Silhouette;

/// Where a tree stands and how it is turned.
///
/// `x`/`y` locate the silhouette origin on the stage. `rotation` is in
/// degrees, clockwise on screen, and may be any real number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// Rotation folded into `[0, 360)`.
    #[inline]
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.rotation.is_finite()
    }
}

/// Place a silhouette at a pose, producing its stage-space outline.
///
/// Each unit vertex is scaled by the silhouette height with y negated
/// (unit y points up, stage y points down), rotated by the pose angle and
/// translated to the pose position. The output has one point per template
/// vertex, in template order.
///
/// # Panics
///
/// On a NaN or infinite pose. Those only come from a caller bug.
pub fn transform_pose(pose: &Pose, silhouette: &Silhouette) -> Polygon {
    assert!(pose.is_finite(), "non-finite tree pose: {pose:?}");

    let height = silhouette.height();
    let (sin, cos) = pose.rotation.to_radians().sin_cos();

    let points = silhouette
        .template()
        .units()
        .iter()
        .map(|&(ux, uy)| {
            let px = ux * height;
            let py = -uy * height;
            Point::new(
                pose.x + px * cos - py * sin,
                pose.y + px * sin + py * cos,
            )
        })
        .collect();

    Polygon::from_trusted(points)
}
