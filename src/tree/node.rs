use std::ops::Range;

/// One node of the tree: a contiguous range into the shared index buffer, the statistic
/// aggregated over that range, and the split that produced its children.
///
/// A node's range spans exactly its two children's ranges, which are written
/// consecutively during construction. In a spill tree a point inside an overlap slab is
/// referenced by both children's ranges.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TreeNode<P, S> {
    pub(crate) begin: u32,
    pub(crate) count: u32,
    pub(crate) stat: S,
    pub(crate) split: Option<Box<SplitNode<P, S>>>,
}

/// The split owned by an internal node; present iff the node has children.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitNode<P, S> {
    pub(crate) plane: P,
    pub(crate) left: TreeNode<P, S>,
    pub(crate) right: TreeNode<P, S>,
}

impl<P, S> TreeNode<P, S> {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    #[inline]
    pub(crate) fn range(&self) -> Range<usize> {
        self.begin as usize..(self.begin + self.count) as usize
    }

    /// Shift every range in this subtree by `delta` index slots. Used when a subtree was
    /// built into a private buffer that is then spliced into the shared one.
    #[cfg(feature = "rayon")]
    pub(crate) fn shift(&mut self, delta: u32) {
        self.begin += delta;
        if let Some(split) = &mut self.split {
            split.left.shift(delta);
            split.right.shift(delta);
        }
    }
}
