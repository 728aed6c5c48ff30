//! Spatial data structures and queries.
//!
//! - [`SegmentIndex`] - a mutable grid index over tagged segments with
//!   envelope range queries

mod segment_index;

pub use segment_index::{SegmentIndex, DEFAULT_CELL_SIZE, MAX_CELLS_PER_SEGMENT};

use crate::bounds::Aabb2;
use num_traits::Float;

/// A trait for objects that have an axis-aligned envelope.
pub trait Bounded<F: Float> {
    /// Returns the axis-aligned bounding box of this object.
    fn bounds(&self) -> Aabb2<F>;
}

impl<F: Float> Bounded<F> for Aabb2<F> {
    fn bounds(&self) -> Aabb2<F> {
        *self
    }
}
