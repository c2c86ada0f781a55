//! All-pairs collision pass over a set of trees.
//!
//! Every pass rebuilds each tree's outline from its current pose, tests
//! every unordered pair, and computes the bounding box and square of the
//! whole set. Nothing is cached between passes: a pass is O(N²) pair tests
//! and is meant for stages with at most a few hundred trees.

use log::{debug, trace};
use serde::Serialize;

use crate::geometry::{BoundingBox, BoundingSquare, Polygon};
use crate::intersect::polygons_intersect;
use crate::shape::Silhouette;
use crate::transform::{transform_pose, Pose};

/// A tree on the stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub index: usize,
    pub label: String,
    pub pose: Pose,
    /// Set by the most recent collision pass.
    pub colliding: bool,
}

impl Tree {
    /// A tree labelled `"Tree {index + 1}"`.
    pub fn new(index: usize, pose: Pose) -> Self {
        Self {
            index,
            label: format!("Tree {}", index + 1),
            pose,
            colliding: false,
        }
    }
}

/// Result of one collision pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CollisionReport {
    /// One flag per tree, in input order.
    pub per_tree: Vec<bool>,
    pub any_collision: bool,
    /// Every overlapping pair `(i, j)` with `i < j`.
    pub colliding_pairs: Vec<(usize, usize)>,
    /// `None` when there are no trees.
    pub bounding_box: Option<BoundingBox>,
    pub bounding_square: Option<BoundingSquare>,
}

impl CollisionReport {
    /// Square side rounded to one decimal, if there is a square.
    pub fn display_side(&self) -> Option<f64> {
        self.bounding_square.map(|sq| sq.display_side())
    }

    /// One-line status for the stage header.
    pub fn status_message(&self) -> &'static str {
        if self.any_collision {
            "Collision detected! Move the trees apart."
        } else {
            "No collisions detected."
        }
    }

    pub fn colliding_count(&self) -> usize {
        self.per_tree.iter().filter(|&&c| c).count()
    }
}

/// Runs collision passes for one silhouette.
///
/// The engine holds no trees: callers own the tree collection and hand it
/// in for each pass.
#[derive(Debug, Clone, Default)]
pub struct CollisionEngine {
    silhouette: Silhouette,
}

impl CollisionEngine {
    pub fn new(silhouette: Silhouette) -> Self {
        Self { silhouette }
    }

    #[inline]
    pub fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    /// Stage-space outline of one pose.
    #[inline]
    pub fn polygon(&self, pose: &Pose) -> Polygon {
        transform_pose(pose, &self.silhouette)
    }

    /// Outlines for every tree, index for index.
    pub fn polygons(&self, trees: &[Tree]) -> Vec<Polygon> {
        trees.iter().map(|t| self.polygon(&t.pose)).collect()
    }

    /// Whether two outlines overlap (boundary inclusive).
    #[inline]
    pub fn test_overlap(&self, a: &Polygon, b: &Polygon) -> bool {
        polygons_intersect(a, b)
    }

    /// Run a full pass, rewriting every tree's `colliding` flag.
    pub fn recompute(&self, trees: &mut [Tree]) -> CollisionReport {
        let polygons = self.polygons(trees);

        for tree in trees.iter_mut() {
            tree.colliding = false;
        }

        let mut colliding_pairs = Vec::new();
        for i in 0..polygons.len() {
            for j in (i + 1)..polygons.len() {
                if self.test_overlap(&polygons[i], &polygons[j]) {
                    trace!("{} overlaps {}", trees[i].label, trees[j].label);
                    trees[i].colliding = true;
                    trees[j].colliding = true;
                    colliding_pairs.push((i, j));
                }
            }
        }

        let bounding_box = BoundingBox::enclosing(&polygons);
        let bounding_square = bounding_box.as_ref().map(BoundingBox::to_square);

        debug!(
            "collision pass: {} trees, {} overlapping pairs",
            trees.len(),
            colliding_pairs.len()
        );

        CollisionReport {
            per_tree: trees.iter().map(|t| t.colliding).collect(),
            any_collision: !colliding_pairs.is_empty(),
            colliding_pairs,
            bounding_box,
            bounding_square,
        }
    }
}

/// Run a collision pass with the standard tree silhouette.
pub fn recompute(trees: &mut [Tree]) -> CollisionReport {
    CollisionEngine::default().recompute(trees)
}
