//! Core geometry types for canopy.
//!
//! ## Rust Lesson #2: Structs & Derives
//!
//! The `#[derive(...)]` attribute auto-generates common functionality:
//! - `Debug` = printable with `{:?}`
//! - `Clone` / `Copy` = duplicable (Copy only for small stack values)
//! - `PartialEq` = comparable with `==`
//! - `Serialize` / `Deserialize` = convertible to and from JSON via serde

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A 2D point in stage coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Same point shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// A simple polygon, implicitly closed.
///
/// The vertex list never repeats the first point: edge `i` runs from
/// vertex `i` to vertex `(i + 1) % len`. A `Polygon` always has at least
/// three finite vertices; [`Polygon::new`] refuses anything else.
///
/// ## Rust Lesson #3: Private Fields
///
/// `points` is not `pub`, so the only way to get a `Polygon` is through a
/// constructor that checks the invariant. Code that receives a `&Polygon`
/// never has to re-check the vertex count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, validating vertex count and coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::InvalidPolygon {
                points: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Build a polygon whose invariant the caller already guarantees.
    pub(crate) fn from_trusted(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 3, "polygon with {} points", points.len());
        Self { points }
    }

    /// Convenience constructor for an axis-aligned rectangle.
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, GeometryError> {
        Self::new(vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ])
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Iterate edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounding box of the vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        // A Polygon is never empty, so the fold always sees a point.
        let first = BoundingBox::at(self.points[0]);
        self.points[1..].iter().fold(first, |bb, &p| bb.including(p))
    }

    /// Same polygon moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Polygon {
        Polygon::from_trusted(self.points.iter().map(|p| p.offset(dx, dy)).collect())
    }

    /// Signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding in a y-up frame. In stage
    /// coordinates (y down) the sign flips visually.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }
}

// ============================================================================
// BOUNDING BOX / SQUARE
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Degenerate box around a single point.
    pub fn at(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Union box over a set of polygons, `None` when there are none.
    pub fn enclosing<'a, I>(polygons: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Polygon>,
    {
        polygons
            .into_iter()
            .map(Polygon::bounding_box)
            .reduce(|a, b| a.union(&b))
    }

    /// Grow to include `p`.
    #[inline]
    pub fn including(self, p: Point) -> Self {
        Self::new(
            self.min_x.min(p.x),
            self.min_y.min(p.y),
            self.max_x.max(p.x),
            self.max_y.max(p.y),
        )
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// False only when the boxes are strictly separated on some axis.
    /// Touching boxes overlap.
    #[inline]
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.max_x < other.min_x
            || other.max_x < self.min_x
            || self.max_y < other.min_y
            || other.max_y < self.min_y)
    }

    /// Smallest square containing this box. See [`BoundingSquare`].
    pub fn to_square(&self) -> BoundingSquare {
        BoundingSquare::around(self)
    }
}

/// Axis-aligned square around a [`BoundingBox`].
///
/// The square sits flush with the box along its longer dimension and is
/// centered on the shorter one: a 100×40 box yields a 100×100 square whose
/// left edge is the box's `min_x` and whose top is `min_y - 30`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSquare {
    pub left: f64,
    pub top: f64,
    pub side: f64,
}

impl BoundingSquare {
    pub fn around(bb: &BoundingBox) -> Self {
        let width = bb.width();
        let height = bb.height();
        let side = width.max(height);
        if width >= height {
            Self {
                left: bb.min_x,
                top: bb.min_y - (side - height) / 2.0,
                side,
            }
        } else {
            Self {
                left: bb.min_x - (side - width) / 2.0,
                top: bb.min_y,
                side,
            }
        }
    }

    /// Side length rounded to one decimal place, for display.
    pub fn display_side(&self) -> f64 {
        (self.side * 10.0).round() / 10.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
