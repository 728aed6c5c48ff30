//! Error types for simplification operations.

use crate::simplify::LineId;
use thiserror::Error;

/// Errors that can occur while building or simplifying tagged lines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
    /// A line needs at least two coordinates to form a segment.
    #[error("line has {found} coordinate(s), at least 2 are required")]
    TooFewCoordinates {
        /// Number of coordinates supplied.
        found: usize,
    },

    /// The distance tolerance is negative or NaN.
    #[error("distance tolerance must be non-negative, got {tolerance}")]
    InvalidTolerance {
        /// The rejected tolerance, widened to `f64`.
        tolerance: f64,
    },

    /// The minimum output size is below 2 or larger than the line.
    #[error("minimum size {minimum} is invalid for a line of {len} coordinates")]
    InvalidMinimumSize {
        /// Requested minimum number of output points.
        minimum: usize,
        /// Number of coordinates in the line.
        len: usize,
    },

    /// A segment lookup was outside `[0, segment_count)`.
    #[error("segment index {index} out of range for a line with {count} segments")]
    SegmentOutOfRange {
        /// Requested segment index.
        index: usize,
        /// Number of segments in the line.
        count: usize,
    },

    /// The line already holds a simplified result.
    #[error("line {line} has already been simplified")]
    AlreadySimplified {
        /// Identity of the offending line.
        line: LineId,
    },

    /// The segment index grid cell size is not positive and finite.
    #[error("segment index cell size must be positive and finite")]
    InvalidCellSize,
}
