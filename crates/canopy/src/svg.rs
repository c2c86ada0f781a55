//! Custom silhouettes from SVG.
//!
//! A silhouette is drawn in pixel space with the tree origin at `(0, 0)`
//! and y pointing down, the way it would sit on the stage unrotated. The
//! importers turn the first subpath into a unit-space [`ShapeTemplate`] by
//! dividing by the tree height and flipping y.
//!
//! ## Curve Flattening
//!
//! Paths may contain Bézier curves (cubic and quadratic). The collision
//! kernel only knows straight edges, so curves are flattened into line
//! segments with lyon_geom at a fixed pixel tolerance.

use log::warn;
use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use thiserror::Error;

use crate::error::{GeometryError, SceneError};
use crate::geometry::Point;
use crate::shape::ShapeTemplate;

/// Error type for silhouette import.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("no path found in SVG")]
    NoShape,

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Tolerance for curve flattening, in pixels.
/// Lower = more points, smoother curves, more edge tests per pair.
const CURVE_TOLERANCE: f64 = 0.1;

/// Consecutive points closer than this are merged.
const DEDUP_DISTANCE: f64 = 1e-6;

/// Build a template from SVG path data (`d` attribute syntax).
///
/// Relative commands, arcs and shorthand curves are all accepted; they are
/// normalized by svgtypes before flattening.
pub fn template_from_path_data(d: &str, height: f64) -> Result<ShapeTemplate, SvgError> {
    let mut outline = Outline::default();

    for segment in svgtypes::SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|e| SvgError::Parse(e.to_string()))?;
        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => outline.move_to(x, y),
            svgtypes::SimplePathSegment::LineTo { x, y } => outline.line_to(x, y),
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                outline.quad_to(x1, y1, x, y)
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => outline.cubic_to(x1, y1, x2, y2, x, y),
            svgtypes::SimplePathSegment::ClosePath => outline.close(),
        }
    }

    outline.into_template(height)
}

/// Build a template from the first path element of an SVG document.
///
/// Uses usvg for complete SVG resolution, so `<rect>`, `<polygon>`,
/// `<circle>` and friends all work. Coordinates are read in the element's
/// own user space; transforms on the element or its groups are ignored.
pub fn template_from_svg(svg_content: &str, height: f64) -> Result<ShapeTemplate, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let path = first_path(tree.root()).ok_or(SvgError::NoShape)?;

    let mut outline = Outline::default();
    for segment in path.data().segments() {
        match segment {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => outline.move_to(p.x.into(), p.y.into()),
            usvg::tiny_skia_path::PathSegment::LineTo(p) => outline.line_to(p.x.into(), p.y.into()),
            usvg::tiny_skia_path::PathSegment::QuadTo(c, p) => {
                outline.quad_to(c.x.into(), c.y.into(), p.x.into(), p.y.into())
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(c1, c2, p) => outline.cubic_to(
                c1.x.into(),
                c1.y.into(),
                c2.x.into(),
                c2.y.into(),
                p.x.into(),
                p.y.into(),
            ),
            usvg::tiny_skia_path::PathSegment::Close => outline.close(),
        }
    }

    outline.into_template(height)
}

/// Depth-first search for the first path in document order.
fn first_path(group: &usvg::Group) -> Option<&usvg::Path> {
    for child in group.children() {
        match child {
            usvg::Node::Path(path) => return Some(path),
            usvg::Node::Group(inner) => {
                if let Some(path) = first_path(inner) {
                    return Some(path);
                }
            }
            // Ignore text, images, etc.
            _ => {}
        }
    }
    None
}

// ============================================================================
// OUTLINE BUILDER
// ============================================================================

/// Collects the first subpath of a path as flattened points.
#[derive(Default)]
struct Outline {
    points: Vec<Point>,
    last: Option<Point>,
    /// Set once the first subpath has ended; later commands are dropped.
    finished: bool,
    dropped_subpaths: usize,
}

impl Outline {
    fn move_to(&mut self, x: f64, y: f64) {
        if !self.points.is_empty() {
            // A second subpath: holes and islands have no meaning for a
            // single silhouette.
            self.finished = true;
            self.dropped_subpaths += 1;
            return;
        }
        self.push(Point::new(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.finished {
            return;
        }
        self.push(Point::new(x, y));
    }

    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        if self.finished {
            return;
        }
        let Some(from) = self.last else {
            self.push(Point::new(x, y));
            return;
        };
        let curve = QuadraticBezierSegment {
            from: point(from.x, from.y),
            ctrl: point(cx, cy),
            to: point(x, y),
        };
        let mut flat = Vec::new();
        curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
            flat.push(Point::new(segment.to.x, segment.to.y));
        });
        flat.into_iter().for_each(|p| self.push(p));
    }

    fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        if self.finished {
            return;
        }
        let Some(from) = self.last else {
            self.push(Point::new(x, y));
            return;
        };
        let curve = CubicBezierSegment {
            from: point(from.x, from.y),
            ctrl1: point(c1x, c1y),
            ctrl2: point(c2x, c2y),
            to: point(x, y),
        };
        let mut flat = Vec::new();
        curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
            flat.push(Point::new(segment.to.x, segment.to.y));
        });
        flat.into_iter().for_each(|p| self.push(p));
    }

    fn close(&mut self) {
        if !self.points.is_empty() {
            self.finished = true;
        }
    }

    fn push(&mut self, p: Point) {
        self.last = Some(p);
        self.points.push(p);
    }

    fn into_template(mut self, height: f64) -> Result<ShapeTemplate, SvgError> {
        if self.dropped_subpaths > 0 {
            warn!(
                "silhouette path has {} extra subpath(s); only the first is used",
                self.dropped_subpaths
            );
        }

        // Remove duplicate consecutive points that can occur from curve
        // flattening, and an explicit return to the start before `Z`.
        self.points.dedup_by(|a, b| a.distance(*b) < DEDUP_DISTANCE);
        if self.points.len() > 1 {
            let first = self.points[0];
            if self.points.last().is_some_and(|p| p.distance(first) < DEDUP_DISTANCE) {
                self.points.pop();
            }
        }

        let units = self
            .points
            .iter()
            .map(|p| (p.x / height, -p.y / height))
            .collect();
        Ok(ShapeTemplate::new(units)?)
    }
}

// ============================================================================
// TESTS
// ============================================================================
