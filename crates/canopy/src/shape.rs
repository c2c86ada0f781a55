//! The tree silhouette.
//!
//! Coordinates are fractions of the tree height, origin at the base of the
//! crown (where the trunk meets the lowest branches), y pointing up.

use crate::error::GeometryError;
use crate::geometry::Point;

/// Nominal tree height in stage pixels.
pub const TREE_HEIGHT: f64 = 96.0;

/// Element width as a fraction of height.
pub const TREE_WIDTH_RATIO: f64 = 0.7;

/// Origin height within the element box, measured from the top.
const ORIGIN_FROM_TOP: f64 = 0.8;

/// Evergreen outline: tip, three tiers of branches, trunk notch.
pub const TREE_SHAPE_UNITS: [(f64, f64); 15] = [
    (0.0, 0.8),
    (0.125, 0.5),
    (0.0625, 0.5),
    (0.2, 0.25),
    (0.1, 0.25),
    (0.35, 0.0),
    (0.075, 0.0),
    (0.075, -0.2),
    (-0.075, -0.2),
    (-0.075, 0.0),
    (-0.35, 0.0),
    (-0.1, 0.25),
    (-0.2, 0.25),
    (-0.0625, 0.5),
    (-0.125, 0.5),
];

/// Ordered unit-space outline shared by every tree on a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTemplate {
    units: Vec<(f64, f64)>,
}

impl ShapeTemplate {
    /// The built-in 15-vertex evergreen.
    pub fn tree() -> Self {
        Self {
            units: TREE_SHAPE_UNITS.to_vec(),
        }
    }

    /// A custom outline. Needs at least three finite pairs.
    pub fn new(units: Vec<(f64, f64)>) -> Result<Self, GeometryError> {
        if units.len() < 3 {
            return Err(GeometryError::InvalidPolygon {
                points: units.len(),
            });
        }
        if let Some(index) = units
            .iter()
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(GeometryError::NonFiniteCoordinate { index });
        }
        Ok(Self { units })
    }

    #[inline]
    pub fn units(&self) -> &[(f64, f64)] {
        &self.units
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false: a template has at least three vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for ShapeTemplate {
    fn default() -> Self {
        Self::tree()
    }
}

/// A template scaled to a pixel height.
///
/// This is everything the stage needs to know about how big a tree is:
/// the pose transform scales by `height`, the stage clamps against
/// `width()`/`origin()`, and `radius()` bounds how far any vertex can
/// reach from the origin at any rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    template: ShapeTemplate,
    height: f64,
}

impl Silhouette {
    pub fn new(template: ShapeTemplate, height: f64) -> Self {
        assert!(
            height.is_finite() && height > 0.0,
            "silhouette height must be positive, got {height}"
        );
        Self { template, height }
    }

    /// Built-in tree at [`TREE_HEIGHT`].
    pub fn standard() -> Self {
        Self::new(ShapeTemplate::tree(), TREE_HEIGHT)
    }

    #[inline]
    pub fn template(&self) -> &ShapeTemplate {
        &self.template
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.height * TREE_WIDTH_RATIO
    }

    /// Origin position inside the element box, from its top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.width() / 2.0, self.height * ORIGIN_FROM_TOP)
    }

    /// Largest distance from the origin to any vertex, in pixels.
    pub fn radius(&self) -> f64 {
        self.template
            .units()
            .iter()
            .map(|(x, y)| (x * self.height).hypot(y * self.height))
            .fold(0.0, f64::max)
    }
}

impl Default for Silhouette {
    fn default() -> Self {
        Self::standard()
    }
}
