//! topo-simplify - Topology-preserving polyline simplification
//!
//! Douglas-Peucker simplification for batches of polylines that never lets
//! a simplified line cross itself or any other line in the batch. Candidate
//! shortcuts are checked against shared grid indexes of the original and
//! already-accepted segments, and rejected shortcuts are refined further.
//!
//! # Example
//!
//! ```
//! use topo_simplify::{simplify_polylines, Point2};
//!
//! let lines = vec![
//!     vec![Point2::new(0.0, 0.0), Point2::new(5.0, 1.0), Point2::new(10.0, 0.0)],
//!     vec![Point2::new(4.0, -1.0), Point2::new(5.5, -0.2), Point2::new(6.0, 0.5)],
//! ];
//!
//! let simplified = simplify_polylines(&lines, 1.5).unwrap();
//! assert_eq!(simplified[0].len(), 3);
//! assert_eq!(simplified[1].len(), 2);
//! ```

pub mod bounds;
pub mod error;
pub mod primitives;
pub mod simplify;
pub mod spatial;
pub mod tolerance;

pub use bounds::Aabb2;
pub use error::SimplifyError;
pub use primitives::{Point2, Segment2, Vec2};
pub use simplify::{
    simplify_polyline, simplify_polylines, LineId, SegmentKey, SimplifyOptions, TaggedLine,
    TaggedLineSimplifier, TaggedLinesSimplifier, TaggedSegment,
};
pub use spatial::SegmentIndex;
pub use tolerance::{has_interior_intersection, SegmentIntersection};
