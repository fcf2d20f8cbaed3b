use crate::tree::QueryMode;

/// Compile-time tag distinguishing overlapping (spill) trees from disjoint ones.
///
/// Generic consumers branch on [`TreeVariant::IS_SPILL`] to decide whether query results
/// need deduplication and which search mode to default to. The constant is resolved per
/// instantiation, so disjoint trees pay nothing for the spill bookkeeping.
///
/// This trait is sealed; the only variants are [`Ordinary`] and [`Spill`].
pub trait TreeVariant: private::Sealed + Send + Sync + 'static {
    /// Whether a point may be referenced by both children of a split.
    const IS_SPILL: bool;

    /// The search mode queries use when none is given.
    fn default_mode() -> QueryMode;
}

/// Marker for disjoint partitioning: every point lives in exactly one leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordinary;

impl TreeVariant for Ordinary {
    const IS_SPILL: bool = false;

    fn default_mode() -> QueryMode {
        QueryMode::Backtracking
    }
}

/// Marker for overlapping partitioning: slab points are referenced by both children,
/// trading memory for faster approximate descent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spill;

impl TreeVariant for Spill {
    const IS_SPILL: bool = true;

    fn default_mode() -> QueryMode {
        QueryMode::Defeatist
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Ordinary {}
    impl Sealed for super::Spill {}
}
