//! Polygon overlap tests.
//!
//! This is the HOT PATH: every recompute runs `polygons_intersect` once per
//! pair of trees, and each call may test 15 × 15 edge pairs.
//!
//! All tests are boundary inclusive. Two outlines that merely touch, share
//! an edge, or overlap along a collinear stretch count as intersecting.

use crate::geometry::{Point, Polygon};

/// Tolerance for collinearity and on-segment checks.
///
/// A point counts as on a segment's line when its distance from that line
/// is at most `COLLINEAR_EPSILON * (1 + segment length)`, and as within the
/// segment's extent under the same slack. Both checks use one bound, so a
/// point near an endpoint gets the same allowance as one near the middle.
pub const COLLINEAR_EPSILON: f64 = 1e-9;

/// Slack for a segment of length `len`.
#[inline]
fn slack(len: f64) -> f64 {
    COLLINEAR_EPSILON * (1.0 + len)
}

// ============================================================================
// ORIENTATION
// ============================================================================

/// Cross product of `(b - a)` and `(c - a)`.
///
/// Zero when the three points are collinear; the sign gives the turn
/// direction from `a → b` towards `c`.
#[inline]
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Sign of [`orient`] with near-collinear results snapped to zero.
#[inline]
fn orientation_sign(a: Point, b: Point, c: Point) -> i8 {
    let cross = orient(a, b, c);
    // |cross| / |b - a| is the distance of c from the line through a, b.
    let len = a.distance(b);
    if cross.abs() <= len * slack(len) {
        0
    } else if cross > 0.0 {
        1
    } else {
        -1
    }
}

/// Whether `q` lies within the bounding box of segment `p → r`.
///
/// Only meaningful once `q` is known to be collinear with the segment.
#[inline]
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    let tol = slack(p.distance(r));
    q.x >= p.x.min(r.x) - tol
        && q.x <= p.x.max(r.x) + tol
        && q.y >= p.y.min(r.y) - tol
        && q.y <= p.y.max(r.y) + tol
}

// ============================================================================
// SEGMENT-SEGMENT INTERSECTION
// ============================================================================

/// Whether segments `[p1, p2]` and `[q1, q2]` cross or touch.
///
/// Unlike a parametric line-line solve, this never divides, so parallel and
/// collinear segments need no special casing beyond the on-segment checks.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation_sign(p1, p2, q1);
    let o2 = orientation_sign(p1, p2, q2);
    let o3 = orientation_sign(q1, q2, p1);
    let o4 = orientation_sign(q1, q2, p2);

    // General case: each segment straddles the other's line.
    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases: an endpoint lies on the other segment.
    (o1 == 0 && on_segment(p1, q1, p2))
        || (o2 == 0 && on_segment(p1, q2, p2))
        || (o3 == 0 && on_segment(q1, p1, q2))
        || (o4 == 0 && on_segment(q1, p2, q2))
}

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a closed vertex ring using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside. Points exactly on an edge may
/// land either way.
#[inline]
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let (px, py) = (point.x, point.y);
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

// ============================================================================
// POLYGON-POLYGON INTERSECTION
// ============================================================================

/// How two polygons relate, and which test decided it.
///
/// ## Rust Lesson #4: Enums as Results
///
/// A `bool` says *whether* two trees overlap. An enum also says *why*,
/// which is handy when debugging a surprising collision, and still costs
/// nothing at runtime: it is a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// No shared point.
    Disjoint,
    /// Some pair of edges crosses or touches.
    Boundary,
    /// No edges meet, but one polygon lies inside the other.
    Containment,
}

impl Overlap {
    #[inline]
    pub fn intersects(self) -> bool {
        self != Overlap::Disjoint
    }
}

/// Classify the overlap of two polygons.
///
/// Three stages, cheapest first:
/// 1. bounding boxes strictly separated → `Disjoint`
/// 2. any edge of `a` meets any edge of `b` → `Boundary`
/// 3. first vertex of either polygon inside the other → `Containment`
///
/// Stage 3 must come after stage 2: full containment produces no edge
/// crossings at all.
pub fn classify_overlap(a: &Polygon, b: &Polygon) -> Overlap {
    if !a.bounding_box().overlaps(&b.bounding_box()) {
        return Overlap::Disjoint;
    }

    for (p1, p2) in a.edges() {
        for (q1, q2) in b.edges() {
            if segments_intersect(p1, p2, q1, q2) {
                return Overlap::Boundary;
            }
        }
    }

    if point_in_polygon(a.points()[0], b.points()) || point_in_polygon(b.points()[0], a.points()) {
        return Overlap::Containment;
    }

    Overlap::Disjoint
}

/// Whether two polygons share any point (boundary inclusive).
#[inline]
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    classify_overlap(a, b).intersects()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::rect(x, y, x + side, y + side).unwrap()
    }

    #[test]
    fn orient_signs() {
        assert!(orient(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)) > 0.0);
        assert!(orient(p(0.0, 0.0), p(1.0, 0.0), p(0.0, -1.0)) < 0.0);
        assert_eq!(orient(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)), 0.0);
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)));
    }

    #[test]
    fn parallel_segments_miss() {
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 5.0), p(10.0, 5.0)));
    }

    #[test]
    fn touching_endpoints_intersect() {
        assert!(segments_intersect(p(0.0, 0.0), p(5.0, 5.0), p(5.0, 5.0), p(10.0, 0.0)));
    }

    #[test]
    fn t_junction_intersects() {
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 7.0)));
    }

    #[test]
    fn collinear_overlap_intersects() {
        assert!(segments_intersect(p(0.0, 0.0), p(6.0, 0.0), p(4.0, 0.0), p(10.0, 0.0)));
    }

    #[test]
    fn collinear_gap_misses() {
        assert!(!segments_intersect(p(0.0, 0.0), p(4.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)));
    }

    #[test]
    fn zero_length_segment_on_other() {
        assert!(segments_intersect(p(3.0, 0.0), p(3.0, 0.0), p(0.0, 0.0), p(10.0, 0.0)));
        assert!(!segments_intersect(p(3.0, 1.0), p(3.0, 1.0), p(0.0, 0.0), p(10.0, 0.0)));
    }

    #[test]
    fn near_collinear_point_on_middle_touches() {
        let (a, b) = (p(0.0, 0.0), p(10.0, 0.0));
        assert!(segments_intersect(a, b, p(5.0, 1e-12), p(5.0, 10.0)));
        assert!(!segments_intersect(a, b, p(5.0, 1e-6), p(5.0, 10.0)));
    }

    #[test]
    fn near_collinear_point_at_endpoint_touches() {
        // Same allowance at the start point as in the middle.
        let (a, b) = (p(0.0, 0.0), p(10.0, 0.0));
        assert!(segments_intersect(a, b, p(-1e-12, 1e-12), p(-10.0, 5.0)));
        assert!(segments_intersect(b, a, p(-1e-12, 1e-12), p(-10.0, 5.0)));
        assert!(!segments_intersect(a, b, p(-1e-3, 1e-3), p(-10.0, 5.0)));
    }

    #[test]
    fn tolerance_holds_across_scales() {
        for k in [1e-3, 1.0, 1e3, 1e6] {
            let (a, b) = (p(0.0, 0.0), p(10.0 * k, 0.0));
            let top = p(5.0 * k, 10.0 * k);
            // Rounding-sized offset: still touching.
            assert!(segments_intersect(a, b, p(5.0 * k, 1e-14 * k), top), "scale {k}");
            // A visible gap: apart.
            assert!(!segments_intersect(a, b, p(5.0 * k, 1e-3 * k), top), "scale {k}");
        }
    }

    #[test]
    fn point_inside_square() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(p(5.0, 5.0), sq.points()));
        assert!(!point_in_polygon(p(15.0, 5.0), sq.points()));
        assert!(!point_in_polygon(p(-1.0, 5.0), sq.points()));
    }

    #[test]
    fn point_in_degenerate_ring_is_false() {
        assert!(!point_in_polygon(p(0.0, 0.0), &[p(0.0, 0.0), p(1.0, 1.0)]));
    }

    #[test]
    fn identical_polygons_intersect() {
        let a = square(0.0, 0.0, 10.0);
        assert!(polygons_intersect(&a, &a.translated(0.0, 0.0)));
    }

    #[test]
    fn shared_edge_counts() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        assert_eq!(classify_overlap(&a, &b), Overlap::Boundary);
    }

    #[test]
    fn diagonal_separation_rejected() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(2.0, 2.0, 1.0);
        assert_eq!(classify_overlap(&a, &b), Overlap::Disjoint);
    }

    #[test]
    fn containment_detected() {
        let big = square(0.0, 0.0, 10.0);
        let small = square(4.0, 4.0, 2.0);
        assert_eq!(classify_overlap(&big, &small), Overlap::Containment);
        assert_eq!(classify_overlap(&small, &big), Overlap::Containment);
    }

    #[test]
    fn boxes_overlap_but_shapes_do_not() {
        // Two right triangles facing away from each other inside
        // overlapping boxes.
        let a = Polygon::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)]).unwrap();
        let b = Polygon::new(vec![p(10.0, 10.0), p(10.0, 4.0), p(4.0, 10.0)]).unwrap();
        assert!(a.bounding_box().overlaps(&b.bounding_box()));
        assert!(!polygons_intersect(&a, &b));
    }
}
