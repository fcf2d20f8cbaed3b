#![doc = include_str!("../README.md")]

mod error;
pub mod hyperplane;
pub mod metric;
pub mod points;
pub mod split;
pub mod stat;
pub mod tree;
mod r#type;
mod variant;

pub use error::{Result, SpillIndexError};
pub use r#type::CoordNum;
pub use variant::{Ordinary, Spill, TreeVariant};

#[cfg(test)]
pub(crate) mod test;
