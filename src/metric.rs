//! Pluggable distance metrics.

use crate::r#type::CoordNum;

/// A distance between two points of equal dimension.
///
/// Implementations must be symmetric and non-negative. The axis-orthogonal hyperplanes in
/// this crate additionally assume the metric dominates the per-coordinate difference
/// (`|a[i] - b[i]| <= distance(a, b)` for every axis), which holds for all three metrics
/// shipped here; see [`Hyperplane`][crate::hyperplane::Hyperplane] for why that matters.
pub trait DistanceMetric<N: CoordNum>: Send + Sync {
    /// Compute the distance between `a` and `b`.
    fn distance(&self, a: &[N], b: &[N]) -> N;
}

/// Straight-line (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl<N: CoordNum> DistanceMetric<N> for Euclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        debug_assert_eq!(a.len(), b.len());
        let mut acc = N::zero();
        for (&x, &y) in a.iter().zip(b) {
            let d = x - y;
            acc = acc + d * d;
        }
        acc.sqrt()
    }
}

/// Taxicab (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl<N: CoordNum> DistanceMetric<N> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        debug_assert_eq!(a.len(), b.len());
        let mut acc = N::zero();
        for (&x, &y) in a.iter().zip(b) {
            acc = acc + (x - y).abs();
        }
        acc
    }
}

/// Maximum-coordinate (L∞) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl<N: CoordNum> DistanceMetric<N> for Chebyshev {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        debug_assert_eq!(a.len(), b.len());
        let mut acc = N::zero();
        for (&x, &y) in a.iter().zip(b) {
            acc = acc.max((x - y).abs());
        }
        acc
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distances() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_eq!(Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Chebyshev.distance(&a, &b), 4.0);
    }

    #[test]
    fn symmetric() {
        let a = [1.0, -2.0, 0.5];
        let b = [-3.0, 7.0, 2.5];
        assert_eq!(Euclidean.distance(&a, &b), Euclidean.distance(&b, &a));
        assert_eq!(Manhattan.distance(&a, &b), Manhattan.distance(&b, &a));
        assert_eq!(Chebyshev.distance(&a, &b), Chebyshev.distance(&b, &a));
    }
}
