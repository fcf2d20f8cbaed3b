use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::{Result, SpillIndexError};
use crate::hyperplane::{Hyperplane, Side};
use crate::metric::DistanceMetric;
use crate::r#type::CoordNum;
use crate::stat::NodeStatistic;
use crate::tree::index::HyperplaneTree;
use crate::tree::node::TreeNode;
use crate::variant::TreeVariant;

/// How a query traverses the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Descend into exactly one child per node, never backtrack. Costs one root-to-leaf
    /// path; the result is approximate.
    Defeatist,
    /// Best-first descent with distance-bound pruning. Exact when it runs to completion
    /// within the visit budget.
    Backtracking,
}

/// A single query result: an original point index and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<N: CoordNum> {
    /// The index the point was added to the builder with.
    pub index: u32,
    /// The metric distance from the query point.
    pub distance: N,
}

impl<N: CoordNum> Eq for Neighbor<N> {}

impl<N: CoordNum> Ord for Neighbor<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // We don't allow NaN. This should only panic on NaN.
        // Distance ties break toward the lowest index for determinism.
        self.distance
            .partial_cmp(&other.distance)
            .unwrap()
            .then(self.index.cmp(&other.index))
    }
}

impl<N: CoordNum> PartialOrd for Neighbor<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The outcome of a single-nearest query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestResult<N: CoordNum> {
    /// The nearest point found.
    pub index: u32,
    /// Its distance from the query.
    pub distance: N,
    /// `true` iff a backtracking search ran to completion, certifying the result.
    pub exact: bool,
}

/// The outcome of a k-nearest query.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnResult<N: CoordNum> {
    /// At most `k` neighbors in ascending distance order (ties in ascending index
    /// order), deduplicated by original point index.
    pub neighbors: Vec<Neighbor<N>>,
    /// `true` iff a backtracking search ran to completion, certifying the result.
    pub exact: bool,
}

/// A pending subtree and the lower bound on distances inside it.
struct Candidate<'a, N: CoordNum, P, S> {
    bound: N,
    node: &'a TreeNode<P, S>,
}

impl<N: CoordNum, P, S> PartialEq for Candidate<'_, N, P, S> {
    fn eq(&self, other: &Self) -> bool {
        self.bound == other.bound
    }
}

impl<N: CoordNum, P, S> Eq for Candidate<'_, N, P, S> {}

impl<N: CoordNum, P, S> Ord for Candidate<'_, N, P, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // We don't allow NaN. This should only panic on NaN.
        self.bound.partial_cmp(&other.bound).unwrap()
    }
}

impl<N: CoordNum, P, S> PartialOrd for Candidate<'_, N, P, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N, P, M, S, V> HyperplaneTree<N, P, M, S, V>
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    /// Find the single nearest neighbor using the variant's default mode, unbudgeted.
    pub fn nearest(&self, query: &[N]) -> Result<NearestResult<N>> {
        self.nearest_with(query, V::default_mode(), None)
    }

    /// Find the single nearest neighbor with an explicit mode and node-visit budget.
    ///
    /// Budget exhaustion is not an error: the best point seen so far is returned with
    /// `exact = false`.
    pub fn nearest_with(
        &self,
        query: &[N],
        mode: QueryMode,
        visit_budget: Option<usize>,
    ) -> Result<NearestResult<N>> {
        let knn = self.k_nearest_with(query, 1, mode, visit_budget)?;
        // the point set is never empty and k >= 1, so at least one neighbor exists
        let nearest = knn.neighbors[0];
        Ok(NearestResult {
            index: nearest.index,
            distance: nearest.distance,
            exact: knn.exact,
        })
    }

    /// Find the `k` nearest neighbors using the variant's default mode, unbudgeted.
    pub fn k_nearest(&self, query: &[N], k: usize) -> Result<KnnResult<N>> {
        self.k_nearest_with(query, k, V::default_mode(), None)
    }

    /// Find the `k` nearest neighbors with an explicit mode and node-visit budget.
    ///
    /// Returns up to `k` neighbors in ascending distance order, deduplicated by original
    /// index; asking for more neighbors than the tree holds returns every point.
    pub fn k_nearest_with(
        &self,
        query: &[N],
        k: usize,
        mode: QueryMode,
        visit_budget: Option<usize>,
    ) -> Result<KnnResult<N>> {
        self.check_query(query)?;
        if k == 0 {
            return Ok(KnnResult {
                neighbors: vec![],
                exact: true,
            });
        }
        match mode {
            QueryMode::Defeatist => Ok(self.defeatist_knn(query, k)),
            QueryMode::Backtracking => Ok(self.backtracking_knn(query, k, visit_budget)),
        }
    }

    /// All points within `radius` of `query`, in ascending index order, deduplicated.
    pub fn within(&self, query: &[N], radius: N) -> Result<Vec<u32>> {
        self.check_query(query)?;
        let mut result = vec![];
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match &node.split {
                None => {
                    for &index in &self.indices[node.range()] {
                        let distance = self.metric.distance(query, self.points.point(index as usize));
                        if distance <= radius {
                            result.push(index);
                        }
                    }
                }
                Some(split) => {
                    if split.plane.region_distance(query, Side::Left) <= radius {
                        stack.push(&split.left);
                    }
                    if split.plane.region_distance(query, Side::Right) <= radius {
                        stack.push(&split.right);
                    }
                }
            }
        }
        result.sort_unstable();
        if V::IS_SPILL {
            result.dedup();
        }
        Ok(result)
    }

    fn check_query(&self, query: &[N]) -> Result<()> {
        if query.len() != self.points.dim() {
            return Err(SpillIndexError::DimensionMismatch {
                query_dim: query.len(),
                tree_dim: self.points.dim(),
            });
        }
        Ok(())
    }

    fn defeatist_knn(&self, query: &[N], k: usize) -> KnnResult<N> {
        let mut node = &self.root;
        while let Some(split) = &node.split {
            node = match split.plane.classify(query) {
                Side::Left => &split.left,
                Side::Right => &split.right,
                // inside the slab: take the side of the inner plane the projection
                // falls on
                Side::Both => {
                    if split.plane.project(query) < split.plane.value() {
                        &split.left
                    } else {
                        &split.right
                    }
                }
            };
        }

        let mut best = BinaryHeap::with_capacity(k + 1);
        self.scan_leaf(node, query, k, &mut best);
        KnnResult {
            neighbors: best.into_sorted_vec(),
            exact: false,
        }
    }

    fn backtracking_knn(&self, query: &[N], k: usize, visit_budget: Option<usize>) -> KnnResult<N> {
        let mut best: BinaryHeap<Neighbor<N>> = BinaryHeap::with_capacity(k + 1);
        let mut candidates = BinaryHeap::new();
        candidates.push(Reverse(Candidate {
            bound: N::zero(),
            node: &self.root,
        }));

        let mut visits = 0usize;
        let mut exhausted = false;

        while let Some(Reverse(Candidate { bound, node })) = candidates.pop() {
            if best.len() == k {
                // the closest pending bound cannot beat the current kth distance; a
                // strict comparison keeps equal-distance, lower-index ties reachable
                if let Some(worst) = best.peek() {
                    if bound > worst.distance {
                        break;
                    }
                }
            }
            visits += 1;
            if let Some(budget) = visit_budget {
                if visits > budget {
                    exhausted = true;
                    break;
                }
            }

            match &node.split {
                None => self.scan_leaf(node, query, k, &mut best),
                Some(split) => {
                    for (side, child) in [(Side::Left, &split.left), (Side::Right, &split.right)] {
                        let child_bound = bound.max(split.plane.region_distance(query, side));
                        if best.len() == k {
                            if let Some(worst) = best.peek() {
                                if child_bound > worst.distance {
                                    continue;
                                }
                            }
                        }
                        candidates.push(Reverse(Candidate {
                            bound: child_bound,
                            node: child,
                        }));
                    }
                }
            }
        }

        if best.is_empty() {
            // a tiny budget can stop the search before the first leaf; fall back to a
            // single descent so the partial result is never empty
            return KnnResult {
                neighbors: self.defeatist_knn(query, k).neighbors,
                exact: false,
            };
        }
        KnnResult {
            neighbors: best.into_sorted_vec(),
            exact: !exhausted,
        }
    }

    /// Fold a leaf's points into the running best-k max-heap.
    fn scan_leaf(
        &self,
        node: &TreeNode<P, S>,
        query: &[N],
        k: usize,
        best: &mut BinaryHeap<Neighbor<N>>,
    ) {
        for &index in &self.indices[node.range()] {
            // spill ranges can reference a slab point twice; count it once
            if V::IS_SPILL && best.iter().any(|neighbor| neighbor.index == index) {
                continue;
            }
            let distance = self.metric.distance(query, self.points.point(index as usize));
            let candidate = Neighbor { index, distance };
            if best.len() < k {
                best.push(candidate);
            } else if let Some(worst) = best.peek() {
                if candidate < *worst {
                    best.pop();
                    best.push(candidate);
                }
            }
        }
    }
}
