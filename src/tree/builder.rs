use std::marker::PhantomData;

use crate::error::{Result, SpillIndexError};
use crate::metric::{DistanceMetric, Euclidean};
use crate::points::PointSet;
use crate::r#type::CoordNum;
use crate::split::{SplitAssignment, Splitter};
use crate::stat::NodeStatistic;
use crate::tree::index::{HyperplaneTree, OrdinaryTree, SpillTree};
use crate::tree::node::{SplitNode, TreeNode};
use crate::variant::{Ordinary, Spill, TreeVariant};

const DEFAULT_LEAF_SIZE: usize = 16;

/// Subtrees below this size are always built sequentially.
#[cfg(feature = "rayon")]
const PARALLEL_MIN_POINTS: usize = 1024;

/// A builder to create an [`OrdinaryTree`] or a [`SpillTree`].
///
/// Add points one at a time, then pick a splitting strategy when finishing:
///
/// ```
/// use spill_index::split::MidpointSplitter;
/// use spill_index::tree::TreeBuilder;
///
/// let mut builder = TreeBuilder::<f64>::new(2).leaf_size(2);
/// builder.add(&[0.0, 0.0]);
/// builder.add(&[1.0, 0.0]);
/// builder.add(&[10.0, 0.0]);
/// builder.add(&[11.0, 0.0]);
/// let tree = builder.finish::<MidpointSplitter>().unwrap();
/// assert_eq!(tree.num_items(), 4);
/// ```
pub struct TreeBuilder<N: CoordNum, M: DistanceMetric<N> = Euclidean, S: NodeStatistic<N> = ()> {
    coords: Vec<N>,
    dim: usize,
    leaf_size: usize,
    overlap_fraction: N,
    metric: M,
    statistic: PhantomData<S>,
}

impl<N: CoordNum> TreeBuilder<N> {
    /// Create a new builder for points of the given dimension, with the Euclidean metric
    /// and no per-node statistic.
    pub fn new(dim: usize) -> Self {
        Self {
            coords: Vec::new(),
            dim,
            leaf_size: DEFAULT_LEAF_SIZE,
            overlap_fraction: N::zero(),
            metric: Euclidean,
            statistic: PhantomData,
        }
    }
}

impl<N, M, S> TreeBuilder<N, M, S>
where
    N: CoordNum,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
{
    /// Replace the metric the finished tree measures distances with.
    pub fn with_metric<M2: DistanceMetric<N>>(self, metric: M2) -> TreeBuilder<N, M2, S> {
        TreeBuilder {
            coords: self.coords,
            dim: self.dim,
            leaf_size: self.leaf_size,
            overlap_fraction: self.overlap_fraction,
            metric,
            statistic: PhantomData,
        }
    }

    /// Select the statistic aggregated over every node during construction.
    pub fn with_statistic<S2: NodeStatistic<N>>(self) -> TreeBuilder<N, M, S2> {
        TreeBuilder {
            coords: self.coords,
            dim: self.dim,
            leaf_size: self.leaf_size,
            overlap_fraction: self.overlap_fraction,
            metric: self.metric,
            statistic: PhantomData,
        }
    }

    /// Set the maximum number of points per leaf.
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Set the slab width of every spill split, as a fraction in `[0, 1)` of the node's
    /// extent along its split direction. Only meaningful for [`finish_spill`][Self::finish_spill].
    pub fn overlap_fraction(mut self, fraction: N) -> Self {
        self.overlap_fraction = fraction;
        self
    }

    /// Add a point. Returns the index later query results refer to it by.
    pub fn add(&mut self, point: &[N]) -> u32 {
        assert_eq!(
            point.len(),
            self.dim,
            "Added a point of dimension {} to a builder of dimension {}.",
            point.len(),
            self.dim
        );
        let index = (self.coords.len() / self.dim) as u32;
        self.coords.extend_from_slice(point);
        index
    }

    /// Consume this builder, partitioning disjointly with the chosen splitter.
    pub fn finish<Sp: Splitter<N>>(self) -> Result<OrdinaryTree<N, Sp::Plane, M, S>> {
        if self.overlap_fraction != N::zero() {
            return Err(SpillIndexError::Configuration(
                "an ordinary tree cannot have a nonzero overlap fraction; use finish_spill"
                    .to_string(),
            ));
        }
        self.finish_variant::<Sp, Ordinary>()
    }

    /// Consume this builder, partitioning with overlap slabs of the configured fraction.
    pub fn finish_spill<Sp: Splitter<N>>(self) -> Result<SpillTree<N, Sp::Plane, M, S>> {
        self.finish_variant::<Sp, Spill>()
    }

    fn finish_variant<Sp: Splitter<N>, V: TreeVariant>(
        self,
    ) -> Result<HyperplaneTree<N, Sp::Plane, M, S, V>> {
        if self.leaf_size < 1 {
            return Err(SpillIndexError::Configuration(
                "leaf size must be at least 1".to_string(),
            ));
        }
        if self.overlap_fraction < N::zero() || self.overlap_fraction >= N::one() {
            return Err(SpillIndexError::Configuration(format!(
                "overlap fraction {:?} outside [0, 1)",
                self.overlap_fraction
            )));
        }

        let points = PointSet::from_flat(self.coords, self.dim)?;
        if points.is_empty() {
            return Err(SpillIndexError::Configuration(
                "cannot build a tree over an empty point set".to_string(),
            ));
        }

        let all: Vec<u32> = (0..points.len() as u32).collect();
        let mut indices = Vec::with_capacity(points.len());
        let root = build_node::<N, Sp, S>(
            &points,
            all,
            &mut indices,
            self.leaf_size,
            self.overlap_fraction,
        )?;

        Ok(HyperplaneTree {
            points,
            indices,
            root,
            metric: self.metric,
            leaf_size: self.leaf_size,
            overlap_fraction: self.overlap_fraction,
            variant: PhantomData,
        })
    }
}

/// Recursively partition `node_indices`, appending every leaf's range to `out`.
///
/// Children are appended consecutively, so a node's range is exactly the concatenation of
/// its children's ranges. Statistics are aggregated post-order, after both children exist.
fn build_node<N, Sp, S>(
    points: &PointSet<N>,
    node_indices: Vec<u32>,
    out: &mut Vec<u32>,
    leaf_size: usize,
    overlap_fraction: N,
) -> Result<TreeNode<Sp::Plane, S>>
where
    N: CoordNum,
    Sp: Splitter<N>,
    S: NodeStatistic<N>,
{
    if node_indices.len() <= leaf_size {
        let stat = S::of_leaf(points, &node_indices);
        let begin = out.len() as u32;
        let count = node_indices.len() as u32;
        out.extend_from_slice(&node_indices);
        return Ok(TreeNode {
            begin,
            count,
            stat,
            split: None,
        });
    }

    let SplitAssignment { plane, left, right } =
        Sp::split(points, &node_indices, overlap_fraction)?;
    drop(node_indices);

    #[cfg(feature = "rayon")]
    let (left_node, right_node) = if left.len().min(right.len()) >= PARALLEL_MIN_POINTS {
        let left_len = left.len();
        let right_len = right.len();
        let (left_result, right_result) = rayon::join(
            move || {
                let mut buf = Vec::with_capacity(left_len);
                build_node::<N, Sp, S>(points, left, &mut buf, leaf_size, overlap_fraction)
                    .map(|node| (node, buf))
            },
            move || {
                let mut buf = Vec::with_capacity(right_len);
                build_node::<N, Sp, S>(points, right, &mut buf, leaf_size, overlap_fraction)
                    .map(|node| (node, buf))
            },
        );
        let (mut left_node, left_buf) = left_result?;
        let (mut right_node, right_buf) = right_result?;
        left_node.shift(out.len() as u32);
        out.extend_from_slice(&left_buf);
        right_node.shift(out.len() as u32);
        out.extend_from_slice(&right_buf);
        (left_node, right_node)
    } else {
        (
            build_node::<N, Sp, S>(points, left, out, leaf_size, overlap_fraction)?,
            build_node::<N, Sp, S>(points, right, out, leaf_size, overlap_fraction)?,
        )
    };

    #[cfg(not(feature = "rayon"))]
    let (left_node, right_node) = (
        build_node::<N, Sp, S>(points, left, out, leaf_size, overlap_fraction)?,
        build_node::<N, Sp, S>(points, right, out, leaf_size, overlap_fraction)?,
    );

    let stat = left_node.stat.merge(&right_node.stat);
    let begin = left_node.begin;
    let count = left_node.count + right_node.count;
    Ok(TreeNode {
        begin,
        count,
        stat,
        split: Some(Box::new(SplitNode {
            plane,
            left: left_node,
            right: right_node,
        })),
    })
}
