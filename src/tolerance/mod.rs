//! Geometric predicates.
//!
//! Tolerances are always explicit. The intersection classification used by
//! the simplifier works on exact orientation signs.

mod predicates;

pub use predicates::{
    has_interior_intersection, intersect_segments, orient2d, Orientation, SegmentIntersection,
};
