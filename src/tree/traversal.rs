//! Utilities to traverse the tree structure by hand.

use crate::hyperplane::Hyperplane;
use crate::metric::DistanceMetric;
use crate::r#type::CoordNum;
use crate::stat::NodeStatistic;
use crate::tree::index::HyperplaneTree;
use crate::tree::node::TreeNode;
use crate::variant::TreeVariant;

/// A read-only view of one tree node, for manual traversal and statistic access.
///
/// Obtained from [`HyperplaneTree::root`]; algorithms built atop the tree walk children
/// from there and read each node's statistic, hyperplane, and point range.
#[derive(Debug)]
pub struct NodeRef<'a, N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    tree: &'a HyperplaneTree<N, P, M, S, V>,
    node: &'a TreeNode<P, S>,
}

impl<N, P, M, S, V> Clone for NodeRef<'_, N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, P, M, S, V> Copy for NodeRef<'_, N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
}

impl<'a, N, P, M, S, V> NodeRef<'a, N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    pub(crate) fn from_root(tree: &'a HyperplaneTree<N, P, M, S, V>) -> Self {
        Self {
            tree,
            node: &tree.root,
        }
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The number of point references under this node. In a spill tree slab points are
    /// counted once per covering child.
    pub fn num_points(&self) -> usize {
        self.node.count as usize
    }

    /// The original point indices under this node, in tree order.
    pub fn indices(&self) -> &'a [u32] {
        &self.tree.indices[self.node.range()]
    }

    /// The statistic aggregated over this node's subtree during construction.
    pub fn statistic(&self) -> &'a S {
        &self.node.stat
    }

    /// The hyperplane separating this node's children; `None` at leaves.
    pub fn hyperplane(&self) -> Option<&'a P> {
        self.node.split.as_deref().map(|split| &split.plane)
    }

    /// The child holding points left of the split; `None` at leaves.
    pub fn left_child(&self) -> Option<NodeRef<'a, N, P, M, S, V>> {
        self.node.split.as_deref().map(|split| NodeRef {
            tree: self.tree,
            node: &split.left,
        })
    }

    /// The child holding points right of the split; `None` at leaves.
    pub fn right_child(&self) -> Option<NodeRef<'a, N, P, M, S, V>> {
        self.node.split.as_deref().map(|split| NodeRef {
            tree: self.tree,
            node: &split.right,
        })
    }
}
