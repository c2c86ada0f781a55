//! A bounded stage that owns its trees.
//!
//! The stage is the state a front end manipulates: it keeps trees inside
//! its bounds, tracks which tree is selected, and reruns the collision pass
//! after every change so `report()` always matches the current poses.
//!
//! ## Rust Lesson #5: Owning State Instead of Globals
//!
//! A browser widget would keep `trees`, `selectedTree` and friends as
//! module-level variables. Here they are fields of one value. Two stages
//! never share anything, tests can build as many as they like, and the
//! borrow checker guarantees nobody mutates a pose halfway through a
//! collision pass.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::collision::{CollisionEngine, CollisionReport, Tree};
use crate::geometry::Point;
use crate::shape::Silhouette;
use crate::transform::Pose;

/// Errors from stage operations that name a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("no tree at index {index} (stage has {count})")]
    NoSuchTree { index: usize, count: usize },

    #[error("no tree is selected")]
    NothingSelected,
}

/// A rectangular stage of trees.
#[derive(Debug, Clone)]
pub struct Stage {
    width: f64,
    height: f64,
    engine: CollisionEngine,
    trees: Vec<Tree>,
    selected: Option<usize>,
    report: CollisionReport,
}

impl Stage {
    /// An empty stage using the standard tree silhouette.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_silhouette(width, height, Silhouette::standard())
    }

    pub fn with_silhouette(width: f64, height: f64, silhouette: Silhouette) -> Self {
        Self {
            width,
            height,
            engine: CollisionEngine::new(silhouette),
            trees: Vec::new(),
            selected: None,
            report: CollisionReport::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn engine(&self) -> &CollisionEngine {
        &self.engine
    }

    #[inline]
    pub fn silhouette(&self) -> &Silhouette {
        self.engine.silhouette()
    }

    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    /// Result of the most recent collision pass.
    #[inline]
    pub fn report(&self) -> &CollisionReport {
        &self.report
    }

    pub fn selected(&self) -> Option<&Tree> {
        self.selected.and_then(|i| self.trees.get(i))
    }

    /// Select a tree, or clear the selection with `None`.
    pub fn select(&mut self, index: Option<usize>) -> Result<(), StageError> {
        if let Some(i) = index {
            self.check_index(i)?;
        }
        self.selected = index;
        Ok(())
    }

    // ========================================================================
    // BOUNDS
    // ========================================================================

    /// Allowed range for a tree origin, as `(min, max)` corners.
    ///
    /// The tree's element box (silhouette width × height, origin inside it)
    /// must stay on the stage. When the stage is smaller than one tree the
    /// minimum wins.
    pub fn origin_bounds(&self) -> (Point, Point) {
        let s = self.silhouette();
        let origin = s.origin();
        let min = origin;
        let max = Point::new(
            (self.width - (s.width() - origin.x)).max(min.x),
            (self.height - (s.height() - origin.y)).max(min.y),
        );
        (min, max)
    }

    /// Clamp an origin position into [`Stage::origin_bounds`].
    pub fn clamp(&self, x: f64, y: f64) -> Point {
        let (min, max) = self.origin_bounds();
        Point::new(x.clamp(min.x, max.x), y.clamp(min.y, max.y))
    }

    // ========================================================================
    // MUTATIONS (each ends with a collision pass)
    // ========================================================================

    /// Rerun the collision pass over the current poses.
    pub fn recompute(&mut self) -> &CollisionReport {
        self.report = self.engine.recompute(&mut self.trees);
        &self.report
    }

    /// Add a tree at a pose (position clamped). Returns its index.
    pub fn add_tree(&mut self, pose: Pose) -> usize {
        let index = self.trees.len();
        let at = self.clamp(pose.x, pose.y);
        self.trees
            .push(Tree::new(index, Pose::new(at.x, at.y, pose.rotation)));
        self.recompute();
        index
    }

    /// Move a tree's origin, clamped to the stage.
    pub fn move_tree(&mut self, index: usize, x: f64, y: f64) -> Result<&CollisionReport, StageError> {
        self.check_index(index)?;
        let at = self.clamp(x, y);
        let pose = &mut self.trees[index].pose;
        pose.x = at.x;
        pose.y = at.y;
        Ok(self.recompute())
    }

    /// Set a tree's rotation in degrees.
    pub fn rotate_tree(&mut self, index: usize, degrees: f64) -> Result<&CollisionReport, StageError> {
        self.check_index(index)?;
        self.trees[index].pose.rotation = degrees;
        Ok(self.recompute())
    }

    /// Set the selected tree's rotation in degrees.
    pub fn rotate_selected(&mut self, degrees: f64) -> Result<&CollisionReport, StageError> {
        let index = self.selected.ok_or(StageError::NothingSelected)?;
        self.rotate_tree(index, degrees)
    }

    /// Change the stage size, pulling every tree back inside.
    pub fn resize(&mut self, width: f64, height: f64) -> &CollisionReport {
        self.width = width;
        self.height = height;
        for i in 0..self.trees.len() {
            let pose = self.trees[i].pose;
            let at = self.clamp(pose.x, pose.y);
            self.trees[i].pose.x = at.x;
            self.trees[i].pose.y = at.y;
        }
        self.recompute()
    }

    /// Replace every tree with `count` randomly placed ones.
    ///
    /// Positions are uniform over the allowed origin range; rotations are
    /// whole degrees in `[0, 360)`. The first tree (if any) is selected.
    pub fn reset<R: Rng>(&mut self, count: usize, rng: &mut R) -> &CollisionReport {
        let (min, max) = self.origin_bounds();
        self.trees = (0..count)
            .map(|i| {
                let x = random_between(rng, min.x, max.x);
                let y = random_between(rng, min.y, max.y);
                let rotation = random_between(rng, 0.0, 360.0).floor();
                Tree::new(i, Pose::new(x, y, rotation))
            })
            .collect();
        self.selected = if count > 0 { Some(0) } else { None };
        debug!("stage reset with {} trees on {}x{}", count, self.width, self.height);
        self.recompute()
    }

    /// [`Stage::reset`] with a seeded generator, for reproducible layouts.
    pub fn scatter(&mut self, count: usize, seed: u64) -> &CollisionReport {
        let mut rng = StdRng::seed_from_u64(seed);
        self.reset(count, &mut rng)
    }

    fn check_index(&self, index: usize) -> Result<(), StageError> {
        if index < self.trees.len() {
            Ok(())
        } else {
            Err(StageError::NoSuchTree {
                index,
                count: self.trees.len(),
            })
        }
    }
}

/// Uniform in `[min, max)`, or `min` for an empty range.
fn random_between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_element_on_stage() {
        let stage = Stage::new(800.0, 600.0);
        let s = stage.silhouette();
        let p = stage.clamp(-100.0, 10_000.0);
        assert_eq!(p.x, s.origin().x);
        assert_eq!(p.y, 600.0 - (s.height() - s.origin().y));
    }

    #[test]
    fn tiny_stage_clamps_to_minimum() {
        let stage = Stage::new(10.0, 10.0);
        let p = stage.clamp(500.0, 500.0);
        assert_eq!(p, stage.silhouette().origin());
    }

    #[test]
    fn scatter_is_deterministic() {
        let mut a = Stage::new(800.0, 600.0);
        let mut b = Stage::new(800.0, 600.0);
        a.scatter(10, 7);
        b.scatter(10, 7);
        assert_eq!(a.trees(), b.trees());
    }

    #[test]
    fn scatter_respects_bounds_and_whole_degrees() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.scatter(50, 99);
        let (min, max) = stage.origin_bounds();
        for tree in stage.trees() {
            assert!(tree.pose.x >= min.x && tree.pose.x <= max.x);
            assert!(tree.pose.y >= min.y && tree.pose.y <= max.y);
            assert!((0.0..360.0).contains(&tree.pose.rotation));
            assert_eq!(tree.pose.rotation, tree.pose.rotation.floor());
        }
        assert_eq!(stage.selected().map(|t| t.index), Some(0));
        assert_eq!(stage.report().per_tree.len(), 50);
    }

    #[test]
    fn reset_to_zero_clears_selection() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.scatter(3, 1);
        let report = stage.scatter(0, 1);
        assert!(report.bounding_box.is_none());
        assert!(stage.selected().is_none());
    }

    #[test]
    fn add_tree_clamps_and_labels() {
        let mut stage = Stage::new(800.0, 600.0);
        let index = stage.add_tree(Pose::new(-50.0, 300.0, 12.0));
        let tree = stage.tree(index).unwrap();
        assert_eq!(tree.label, "Tree 1");
        assert_eq!(tree.pose.x, stage.silhouette().origin().x);
        assert_eq!(tree.pose.rotation, 12.0);
        assert!(stage.tree(index + 1).is_none());
    }

    #[test]
    fn move_tree_recomputes() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_tree(Pose::new(200.0, 200.0, 0.0));
        stage.add_tree(Pose::new(600.0, 400.0, 0.0));
        assert!(!stage.report().any_collision);

        let report = stage.move_tree(1, 210.0, 200.0).unwrap();
        assert!(report.any_collision);
        assert!(stage.trees().iter().all(|t| t.colliding));
    }

    #[test]
    fn rotate_selected_recomputes() {
        let mut stage = Stage::new(800.0, 600.0);
        // Side by side, branch tips just clear of each other upright.
        stage.add_tree(Pose::new(200.0, 300.0, 0.0));
        stage.add_tree(Pose::new(270.0, 300.0, 0.0));
        assert!(!stage.report().any_collision);

        // Lay the first tree on its side, tip pointing at the second.
        stage.select(Some(0)).unwrap();
        let report = stage.rotate_selected(90.0).unwrap();
        assert!(report.any_collision);
    }

    #[test]
    fn rotate_without_selection_fails() {
        let mut stage = Stage::new(800.0, 600.0);
        assert_eq!(stage.rotate_selected(10.0).unwrap_err(), StageError::NothingSelected);
    }

    #[test]
    fn unknown_index_is_an_error() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_tree(Pose::new(100.0, 100.0, 0.0));
        assert_eq!(
            stage.move_tree(3, 0.0, 0.0).unwrap_err(),
            StageError::NoSuchTree { index: 3, count: 1 }
        );
        assert!(stage.select(Some(1)).is_err());
    }

    #[test]
    fn resize_pulls_trees_inside() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.add_tree(Pose::new(700.0, 500.0, 0.0));
        stage.resize(300.0, 200.0);
        let (_, max) = stage.origin_bounds();
        let pose = stage.trees()[0].pose;
        assert_eq!((pose.x, pose.y), (max.x, max.y));
    }
}
