//! The metric space-partitioning tree: construction, queries, and manual traversal.

mod builder;
mod index;
mod node;
mod query;
mod traversal;

pub use builder::TreeBuilder;
pub use index::{HyperplaneTree, OrdinaryTree, SpillTree};
pub use query::{KnnResult, NearestResult, Neighbor, QueryMode};
pub use traversal::NodeRef;

#[cfg(test)]
mod test;
