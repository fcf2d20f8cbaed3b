use std::marker::PhantomData;

use crate::hyperplane::{AxisHyperplane, Hyperplane};
use crate::metric::{DistanceMetric, Euclidean};
use crate::points::PointSet;
use crate::r#type::CoordNum;
use crate::stat::NodeStatistic;
use crate::tree::node::TreeNode;
use crate::tree::traversal::NodeRef;
use crate::variant::{Ordinary, Spill, TreeVariant};

/// An immutable hyperplane-splitting binary tree over a fixed point set.
///
/// Built via [`TreeBuilder`][crate::tree::TreeBuilder]. The tree owns the point set, an
/// index buffer mapping node-local positions to original point indices, and the node
/// hierarchy. Queries are read-only, so a built tree can be shared freely across threads.
///
/// Most users want one of the [`OrdinaryTree`] or [`SpillTree`] aliases.
#[derive(Debug)]
pub struct HyperplaneTree<
    N: CoordNum,
    P: Hyperplane<N> = AxisHyperplane<N>,
    M: DistanceMetric<N> = Euclidean,
    S: NodeStatistic<N> = (),
    V: TreeVariant = Ordinary,
> {
    pub(crate) points: PointSet<N>,
    pub(crate) indices: Vec<u32>,
    pub(crate) root: TreeNode<P, S>,
    pub(crate) metric: M,
    pub(crate) leaf_size: usize,
    pub(crate) overlap_fraction: N,
    pub(crate) variant: PhantomData<V>,
}

/// An ordinary tree: disjoint partitions, exact backtracking search by default.
pub type OrdinaryTree<N, P = AxisHyperplane<N>, M = Euclidean, S = ()> =
    HyperplaneTree<N, P, M, S, Ordinary>;

/// A spill tree: overlapping partitions, defeatist search by default.
pub type SpillTree<N, P = AxisHyperplane<N>, M = Euclidean, S = ()> =
    HyperplaneTree<N, P, M, S, Spill>;

impl<N, P, M, S, V> HyperplaneTree<N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    /// The number of points the tree was built over.
    pub fn num_items(&self) -> u32 {
        self.points.len() as u32
    }

    /// The dimension of the indexed points.
    pub fn dim(&self) -> usize {
        self.points.dim()
    }

    /// The maximum number of points per leaf.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The configured slab width as a fraction of each split's extent. Zero for ordinary
    /// trees.
    pub fn overlap_fraction(&self) -> N {
        self.overlap_fraction
    }

    /// The point set this tree indexes.
    pub fn points(&self) -> &PointSet<N> {
        &self.points
    }

    /// The underlying index buffer mapping node-local positions to original point
    /// indices. An ordinary tree's buffer is a permutation of `0..num_items`; a spill
    /// tree's buffer references slab points once per covering leaf.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The metric this tree measures distances with.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Whether this instantiation uses overlapping partitions.
    pub fn is_spill(&self) -> bool {
        V::IS_SPILL
    }

    /// Access the root node for manual traversal and statistic access.
    pub fn root(&self) -> NodeRef<'_, N, P, M, S, V> {
        NodeRef::from_root(self)
    }
}
