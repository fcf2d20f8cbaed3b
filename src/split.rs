//! Splitting strategies for recursive partitioning.

use crate::error::{Result, SpillIndexError};
use crate::hyperplane::{AxisHyperplane, Hyperplane, ProjectionHyperplane, Side};
use crate::points::PointSet;
use crate::r#type::CoordNum;

/// The outcome of one split: the bounding plane and the two children's index sets.
///
/// In a spill split the children may share indices (points inside the slab appear in both),
/// but each child is always strictly smaller than the parent range.
#[derive(Debug)]
pub struct SplitAssignment<P> {
    /// The plane separating the children.
    pub plane: P,
    /// Original point indices assigned to the left child.
    pub left: Vec<u32>,
    /// Original point indices assigned to the right child.
    pub right: Vec<u32>,
}

/// Decides how to partition a node's index range.
pub trait Splitter<N: CoordNum> {
    /// The hyperplane type this splitter produces.
    type Plane: Hyperplane<N>;

    /// Partition `indices` into two strictly smaller children.
    ///
    /// Called only for ranges above the leaf threshold, so `indices.len() >= 2`.
    /// `overlap_fraction` in `[0, 1)` scales the slab half-width relative to the extent
    /// along the split direction; zero produces a disjoint split. When the chosen plane
    /// cannot make progress (all points on one side), implementations fall back to
    /// deterministic index-order bisection.
    fn split(
        points: &PointSet<N>,
        indices: &[u32],
        overlap_fraction: N,
    ) -> Result<SplitAssignment<Self::Plane>>;
}

/// Splits at the midpoint of the extent along the widest coordinate axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSplitter;

impl<N: CoordNum> Splitter<N> for MidpointSplitter {
    type Plane = AxisHyperplane<N>;

    fn split(
        points: &PointSet<N>,
        indices: &[u32],
        overlap_fraction: N,
    ) -> Result<SplitAssignment<Self::Plane>> {
        let (axis, min, max) = widest_axis(points, indices);
        let two = N::one() + N::one();
        let value = min + (max - min) / two;
        let margin = overlap_fraction * (max - min) / two;
        partition(points, indices, AxisHyperplane::new(axis, value, margin))
    }
}

/// Splits at the median projection along the widest coordinate axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianSplitter;

impl<N: CoordNum> Splitter<N> for MedianSplitter {
    type Plane = AxisHyperplane<N>;

    fn split(
        points: &PointSet<N>,
        indices: &[u32],
        overlap_fraction: N,
    ) -> Result<SplitAssignment<Self::Plane>> {
        let (axis, min, max) = widest_axis(points, indices);
        let mut projections: Vec<N> = indices
            .iter()
            .map(|&i| points.coord(i as usize, axis))
            .collect();
        projections.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let value = projections[projections.len() / 2];
        let two = N::one() + N::one();
        let margin = overlap_fraction * (max - min) / two;
        partition(points, indices, AxisHyperplane::new(axis, value, margin))
    }
}

/// Splits along the dominant direction estimated from the farthest point pair, at the mean
/// projection.
///
/// Produces [`ProjectionHyperplane`]s, so it is only sound together with the Euclidean
/// metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionSplitter;

impl<N: CoordNum> Splitter<N> for ProjectionSplitter {
    type Plane = ProjectionHyperplane<N>;

    fn split(
        points: &PointSet<N>,
        indices: &[u32],
        overlap_fraction: N,
    ) -> Result<SplitAssignment<Self::Plane>> {
        let dim = points.dim();
        let base = points.point(indices[0] as usize);

        // the farthest point from an arbitrary anchor approximates the spread direction
        let mut far = indices[0];
        let mut far_sq = N::zero();
        for &i in indices {
            let point = points.point(i as usize);
            let mut sq = N::zero();
            for (&x, &y) in point.iter().zip(base) {
                let d = x - y;
                sq = sq + d * d;
            }
            if sq > far_sq {
                far_sq = sq;
                far = i;
            }
        }

        let mut normal = vec![N::zero(); dim];
        if far_sq > N::zero() {
            let far_point = points.point(far as usize);
            let norm = far_sq.sqrt();
            for axis in 0..dim {
                normal[axis] = (far_point[axis] - base[axis]) / norm;
            }
        } else {
            // all points coincide; partitioning falls through to the bisection fallback
            normal[0] = N::one();
        }

        let mut min = N::max_value();
        let mut max = N::min_value();
        let mut sum = N::zero();
        for &i in indices {
            let mut p = N::zero();
            for (&n, &x) in normal.iter().zip(points.point(i as usize)) {
                p = p + n * x;
            }
            min = min.min(p);
            max = max.max(p);
            sum = sum + p;
        }
        let value = sum / N::from(indices.len()).unwrap();
        let two = N::one() + N::one();
        let margin = overlap_fraction * (max - min) / two;
        partition(points, indices, ProjectionHyperplane::new(normal, value, margin))
    }
}

/// Per-axis extent scan; returns the widest axis with its min and max (ties pick the
/// lowest axis).
fn widest_axis<N: CoordNum>(points: &PointSet<N>, indices: &[u32]) -> (usize, N, N) {
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

    let mut best = 0;
    for axis in 1..dim {
        if maxs[axis] - mins[axis] > maxs[best] - mins[best] {
            best = axis;
        }
    }
    (best, mins[best], maxs[best])
}

/// Classify every index against `plane`; slab points are assigned to both children.
///
/// Falls back to [`bisect`] when either child would equal the parent range.
fn partition<N: CoordNum, P: Hyperplane<N>>(
    points: &PointSet<N>,
    indices: &[u32],
    plane: P,
) -> Result<SplitAssignment<P>> {
    let mut left = Vec::with_capacity(indices.len() / 2 + 1);
    let mut right = Vec::with_capacity(indices.len() / 2 + 1);
    for &i in indices {
        match plane.classify(points.point(i as usize)) {
            Side::Left => left.push(i),
            Side::Right => right.push(i),
            Side::Both => {
                left.push(i);
                right.push(i);
            }
        }
    }

    // every point lands in at least one child, so construction terminates iff both
    // children are strictly smaller than the parent
    if left.len() == indices.len() || right.len() == indices.len() {
        // index-order halves ignore the plane, so widen its slab over the range's whole
        // projection extent to keep the region bounds sound for both halves
        let mut min = N::max_value();
        let mut max = N::min_value();
        for &i in indices {
            let p = plane.project(points.point(i as usize));
            min = min.min(p);
            max = max.max(p);
        }
        let two = N::one() + N::one();
        let half = (max - min) / two;
        return bisect(indices, plane.repositioned(min + half, half));
    }
    Ok(SplitAssignment { plane, left, right })
}

/// Deterministic index-order bisection, the fallback for degenerate splits.
fn bisect<P>(indices: &[u32], plane: P) -> Result<SplitAssignment<P>> {
    if indices.len() < 2 {
        return Err(SpillIndexError::Construction {
            count: indices.len(),
            reason: "cannot bisect a range of fewer than two points".to_string(),
        });
    }
    let mid = indices.len() / 2;
    Ok(SplitAssignment {
        plane,
        left: indices[..mid].to_vec(),
        right: indices[mid..].to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn points_1d(coords: &[f64]) -> PointSet<f64> {
        PointSet::from_flat(coords.to_vec(), 1).unwrap()
    }

    #[test]
    fn midpoint_splits_disjointly() {
        let points = points_1d(&[0.0, 1.0, 10.0, 11.0]);
        let SplitAssignment { plane, left, right } =
            <MidpointSplitter as Splitter<f64>>::split(&points, &[0, 1, 2, 3], 0.0).unwrap();
        assert_eq!(left, vec![0, 1]);
        assert_eq!(right, vec![2, 3]);
        assert_eq!(plane.value(), 5.5);
        assert_eq!(plane.margin(), 0.0);
    }

    #[test]
    fn midpoint_spill_duplicates_slab_points() {
        let points = points_1d(&[0.0, 5.0, 6.0, 11.0]);
        // extent 11, midpoint 5.5, margin 2.75: both 5 and 6 land in the slab
        let SplitAssignment { left, right, .. } =
            <MidpointSplitter as Splitter<f64>>::split(&points, &[0, 1, 2, 3], 0.5).unwrap();
        assert_eq!(left, vec![0, 1, 2]);
        assert_eq!(right, vec![1, 2, 3]);
    }

    #[test]
    fn identical_points_bisect() {
        let points = points_1d(&[7.0; 6]);
        let SplitAssignment { left, right, .. } =
            <MidpointSplitter as Splitter<f64>>::split(&points, &[0, 1, 2, 3, 4, 5], 0.0)
                .unwrap();
        assert_eq!(left, vec![0, 1, 2]);
        assert_eq!(right, vec![3, 4, 5]);
    }

    #[test]
    fn median_split_makes_progress_on_skewed_data() {
        // one far outlier; the median keeps the halves balanced
        let points = points_1d(&[0.0, 0.1, 0.2, 0.3, 100.0]);
        let SplitAssignment { left, right, .. } =
            <MedianSplitter as Splitter<f64>>::split(&points, &[0, 1, 2, 3, 4], 0.0).unwrap();
        assert!(!left.is_empty() && left.len() < 5);
        assert!(!right.is_empty() && right.len() < 5);
    }

    #[test]
    fn projection_splitter_separates_diagonal_clusters() {
        let points =
            PointSet::from_flat(vec![0.0, 0.0, 1.0, 1.0, 10.0, 10.0, 11.0, 11.0], 2).unwrap();
        let SplitAssignment { left, right, .. } =
            <ProjectionSplitter as Splitter<f64>>::split(&points, &[0, 1, 2, 3], 0.0).unwrap();
        assert_eq!(left, vec![0, 1]);
        assert_eq!(right, vec![2, 3]);
    }
}
