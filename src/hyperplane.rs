//! Splitting surfaces and point classification.

use crate::r#type::CoordNum;

/// Which side(s) of a splitting surface a point falls on.
///
/// `Both` only occurs for spill splits, where the surface is a pair of parallel planes
/// bounding a slab of half-width `margin` and points inside the slab belong to both
/// children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Strictly left of the (left) plane.
    Left,
    /// Strictly right of the (right) plane.
    Right,
    /// Inside the overlap slab.
    Both,
}

/// A node's splitting surface.
///
/// Classification is a pure function of the stored parameters: reclassifying a point that
/// was assigned during construction yields the same side(s). The region distance reported
/// for a side must lower-bound the metric distance from a point to anything stored under
/// that side; for the axis-orthogonal plane this holds for any metric that dominates the
/// per-coordinate difference.
pub trait Hyperplane<N: CoordNum>: Send + Sync {
    /// Scalar projection of a point onto the split direction.
    fn project(&self, point: &[N]) -> N;

    /// The split value along the projection direction.
    fn value(&self) -> N;

    /// The slab half-width; zero for ordinary splits.
    fn margin(&self) -> N;

    /// A copy of this plane repositioned to `value` with slab half-width `margin`.
    ///
    /// The bisection fallback uses this to widen the slab over a degenerate range's whole
    /// projection extent, keeping the region bounds sound for arbitrary halves.
    fn repositioned(&self, value: N, margin: N) -> Self
    where
        Self: Sized;

    /// Classify a point against the plane (pair of planes when `margin > 0`).
    ///
    /// Ties on a boundary resolve away from `Left`, so classification is deterministic.
    #[inline]
    fn classify(&self, point: &[N]) -> Side {
        let p = self.project(point);
        if p < self.value() - self.margin() {
            Side::Left
        } else if p > self.value() + self.margin() {
            Side::Right
        } else if self.margin() > N::zero() {
            Side::Both
        } else {
            Side::Right
        }
    }

    /// Lower bound on how far `point` must move to reach any point stored under `side`.
    ///
    /// Zero when the point could already lie on that side.
    #[inline]
    fn region_distance(&self, point: &[N], side: Side) -> N {
        let p = self.project(point);
        match side {
            // the left child holds projections up to value + margin
            Side::Left => (p - (self.value() + self.margin())).max(N::zero()),
            // the right child holds projections down to value - margin
            Side::Right => ((self.value() - self.margin()) - p).max(N::zero()),
            Side::Both => N::zero(),
        }
    }
}

/// An axis-orthogonal splitting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHyperplane<N: CoordNum> {
    axis: usize,
    value: N,
    margin: N,
}

impl<N: CoordNum> AxisHyperplane<N> {
    /// Create a plane orthogonal to `axis` at `value`, with slab half-width `margin`.
    pub fn new(axis: usize, value: N, margin: N) -> Self {
        Self {
            axis,
            value,
            margin,
        }
    }

    /// The coordinate axis this plane is orthogonal to.
    pub fn axis(&self) -> usize {
        self.axis
    }
}

impl<N: CoordNum> Hyperplane<N> for AxisHyperplane<N> {
    #[inline]
    fn project(&self, point: &[N]) -> N {
        point[self.axis]
    }

    #[inline]
    fn value(&self) -> N {
        self.value
    }

    #[inline]
    fn margin(&self) -> N {
        self.margin
    }

    fn repositioned(&self, value: N, margin: N) -> Self {
        Self {
            axis: self.axis,
            value,
            margin,
        }
    }
}

/// A splitting plane with an arbitrary unit normal.
///
/// The projection-difference bound this plane reports is a valid metric lower bound for the
/// Euclidean metric only; pair it with [`Euclidean`][crate::metric::Euclidean].
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionHyperplane<N: CoordNum> {
    normal: Vec<N>,
    value: N,
    margin: N,
}

impl<N: CoordNum> ProjectionHyperplane<N> {
    /// Create a plane with the given unit `normal` at projection `value`, with slab
    /// half-width `margin`.
    pub fn new(normal: Vec<N>, value: N, margin: N) -> Self {
        Self {
            normal,
            value,
            margin,
        }
    }

    /// The unit normal of the plane.
    pub fn normal(&self) -> &[N] {
        &self.normal
    }
}

impl<N: CoordNum> Hyperplane<N> for ProjectionHyperplane<N> {
    #[inline]
    fn project(&self, point: &[N]) -> N {
        debug_assert_eq!(point.len(), self.normal.len());
        let mut acc = N::zero();
        for (&n, &p) in self.normal.iter().zip(point) {
            acc = acc + n * p;
        }
        acc
    }

    #[inline]
    fn value(&self) -> N {
        self.value
    }

    #[inline]
    fn margin(&self) -> N {
        self.margin
    }

    fn repositioned(&self, value: N, margin: N) -> Self {
        Self {
            normal: self.normal.clone(),
            value,
            margin,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify_without_margin() {
        let plane = AxisHyperplane::new(0, 5.0, 0.0);
        assert_eq!(plane.classify(&[4.9, 0.0]), Side::Left);
        assert_eq!(plane.classify(&[5.1, 0.0]), Side::Right);
        // ties resolve to the right
        assert_eq!(plane.classify(&[5.0, 0.0]), Side::Right);
    }

    #[test]
    fn classify_with_margin() {
        let plane = AxisHyperplane::new(1, 5.0, 1.0);
        assert_eq!(plane.classify(&[0.0, 3.9]), Side::Left);
        assert_eq!(plane.classify(&[0.0, 6.1]), Side::Right);
        assert_eq!(plane.classify(&[0.0, 4.0]), Side::Both);
        assert_eq!(plane.classify(&[0.0, 5.5]), Side::Both);
        assert_eq!(plane.classify(&[0.0, 6.0]), Side::Both);
    }

    #[test]
    fn region_distance_bounds() {
        let plane = AxisHyperplane::new(0, 5.0, 1.0);
        // a point at 8 must travel at least 2 to reach the left region (<= 6)
        assert_eq!(plane.region_distance(&[8.0], Side::Left), 2.0);
        assert_eq!(plane.region_distance(&[8.0], Side::Right), 0.0);
        assert_eq!(plane.region_distance(&[1.0], Side::Right), 3.0);
        assert_eq!(plane.region_distance(&[4.5], Side::Left), 0.0);
        assert_eq!(plane.region_distance(&[4.5], Side::Both), 0.0);
    }

    #[test]
    fn projection_plane_classifies_along_normal() {
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let plane = ProjectionHyperplane::new(vec![inv_sqrt2, inv_sqrt2], 0.0, 0.0);
        assert_eq!(plane.classify(&[-1.0, -1.0]), Side::Left);
        assert_eq!(plane.classify(&[1.0, 1.0]), Side::Right);
        // projection of (1, 1) onto the diagonal is sqrt(2)
        let p = plane.project(&[1.0, 1.0]);
        assert!((p - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
