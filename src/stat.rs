//! Per-node statistics aggregated bottom-up during construction.

use crate::points::PointSet;
use crate::r#type::CoordNum;

/// Auxiliary data attached to every tree node, opaque to the tree core.
///
/// Statistics are computed post-order: leaves from their own point range, internal nodes by
/// merging their two children. They are never recomputed after construction.
///
/// In a spill tree a point inside an overlap slab is referenced by both children, so a
/// statistic that counts points will count it twice at the parent. Order-insensitive,
/// duplication-insensitive aggregates such as bounding extents are unaffected.
pub trait NodeStatistic<N: CoordNum>: Sized + Send + Sync {
    /// Compute the statistic for a leaf's points.
    fn of_leaf(points: &PointSet<N>, indices: &[u32]) -> Self;

    /// Combine two children's statistics into the parent's.
    fn merge(&self, other: &Self) -> Self;
}

impl<N: CoordNum> NodeStatistic<N> for () {
    fn of_leaf(_points: &PointSet<N>, _indices: &[u32]) -> Self {}

    fn merge(&self, _other: &Self) -> Self {}
}

/// The per-dimension bounding extent of a subtree's points.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingExtent<N: CoordNum> {
    mins: Vec<N>,
    maxs: Vec<N>,
}

impl<N: CoordNum> BoundingExtent<N> {
    /// The smallest coordinate along `axis` in this subtree.
    pub fn min(&self, axis: usize) -> N {
        self.mins[axis]
    }

    /// The largest coordinate along `axis` in this subtree.
    pub fn max(&self, axis: usize) -> N {
        self.maxs[axis]
    }

    /// The dimension of the extent.
    pub fn dim(&self) -> usize {
        self.mins.len()
    }
}

impl<N: CoordNum> NodeStatistic<N> for BoundingExtent<N> {
    fn of_leaf(points: &PointSet<N>, indices: &[u32]) -> Self {
        let dim = points.dim();
        let mut mins = vec![N::max_value(); dim];
        let mut maxs = vec![N::min_value(); dim];
        for &i in indices {
            let point = points.point(i as usize);
            for axis in 0..dim {
                mins[axis] = mins[axis].min(point[axis]);
                maxs[axis] = maxs[axis].max(point[axis]);
            }
        }
        Self { mins, maxs }
    }

    fn merge(&self, other: &Self) -> Self {
        let mins = self
            .mins
            .iter()
            .zip(&other.mins)
            .map(|(&a, &b)| a.min(b))
            .collect();
        let maxs = self
            .maxs
            .iter()
            .zip(&other.maxs)
            .map(|(&a, &b)| a.max(b))
            .collect();
        Self { mins, maxs }
    }
}
