//! An immutable set of D-dimensional points backed by a flat coordinate buffer.

use crate::error::{Result, SpillIndexError};
use crate::r#type::CoordNum;

/// The point set a tree is built over.
///
/// Coordinates are stored row-major: point `i` occupies `coords[i * dim..(i + 1) * dim]`.
/// The buffer is never mutated after construction; trees reorder references to points
/// through their index buffer, never the points themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<N: CoordNum> {
    coords: Vec<N>,
    dim: usize,
}

impl<N: CoordNum> PointSet<N> {
    /// Wrap a flat, row-major coordinate buffer.
    pub fn from_flat(coords: Vec<N>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(SpillIndexError::Configuration(
                "point dimension must be at least 1".to_string(),
            ));
        }
        if coords.len() % dim != 0 {
            return Err(SpillIndexError::Configuration(format!(
                "coordinate buffer length {} is not a multiple of dimension {}",
                coords.len(),
                dim
            )));
        }
        Ok(Self { coords, dim })
    }

    /// The number of points in the set.
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    /// Returns `true` if the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The dimension every point in the set shares.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The coordinates of point `index`.
    #[inline]
    pub fn point(&self, index: usize) -> &[N] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }

    /// A single coordinate of point `index`.
    #[inline]
    pub fn coord(&self, index: usize, axis: usize) -> N {
        self.coords[index * self.dim + axis]
    }

    /// Iterate over all points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &[N]> {
        self.coords.chunks_exact(self.dim)
    }
}
