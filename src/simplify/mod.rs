//! Topology-preserving polyline simplification.
//!
//! Douglas-Peucker style simplification that refuses any shortcut which
//! would make a line cross itself or another line of the same batch.
//!
//! - [`TaggedLine`] - a polyline with identity-tagged segments and a result
//! - [`TaggedLineSimplifier`] - simplifies one line against shared indexes
//! - [`TaggedLinesSimplifier`] - simplifies a batch of lines together
//! - [`simplify_polyline`] / [`simplify_polylines`] - one-call helpers over
//!   plain point slices

mod batch;
mod line_simplifier;
mod options;
mod tagged;

pub use batch::TaggedLinesSimplifier;
pub use line_simplifier::TaggedLineSimplifier;
pub use options::SimplifyOptions;
pub use tagged::{LineId, SegmentKey, TaggedLine, TaggedSegment};

use crate::error::SimplifyError;
use crate::primitives::Point2;
use num_traits::Float;

/// Simplifies a single polyline without letting it cross itself.
///
/// Closed lines (first point equal to last) keep at least 4 points.
///
/// # Example
///
/// ```
/// use topo_simplify::{simplify_polyline, Point2};
///
/// let line = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.1),
///     Point2::new(2.0, -0.1),
///     Point2::new(3.0, 5.0),
///     Point2::new(4.0, 6.0),
///     Point2::new(5.0, 7.0),
/// ];
///
/// let simplified = simplify_polyline(&line, 1.0).unwrap();
/// assert_eq!(simplified.first(), line.first());
/// assert_eq!(simplified.last(), line.last());
/// assert!(simplified.len() < line.len());
/// ```
pub fn simplify_polyline<F: Float>(
    points: &[Point2<F>],
    tolerance: F,
) -> Result<Vec<Point2<F>>, SimplifyError> {
    let mut simplified = simplify_polylines(&[points], tolerance)?;
    Ok(simplified.pop().unwrap_or_default())
}

/// Simplifies several polylines together so that none of the results
/// crosses itself or another result.
///
/// Lines are processed in the given order.
pub fn simplify_polylines<F, P>(
    lines: &[P],
    tolerance: F,
) -> Result<Vec<Vec<Point2<F>>>, SimplifyError>
where
    F: Float,
    P: AsRef<[Point2<F>]>,
{
    let mut tagged = lines
        .iter()
        .map(|line| TaggedLine::with_default_minimum(line.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()?;

    TaggedLinesSimplifier::new(tolerance)?.simplify(&mut tagged)?;

    Ok(tagged.iter().map(TaggedLine::result_coordinates).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_simplify_polyline_straightens() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.05), (2.0, -0.05), (3.0, 0.0)]);
        let simplified = simplify_polyline(&line, 0.1).unwrap();
        assert_eq!(simplified, pts(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_simplify_polyline_keeps_corner() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (2.0, 2.0)]);
        let simplified = simplify_polyline(&line, 0.5).unwrap();
        assert_eq!(simplified, pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]));
    }

    #[test]
    fn test_simplify_closed_ring_guarded_at_top() {
        let ring = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]);
        // The whole-ring chord is refused, its two halves are not
        let simplified = simplify_polyline(&ring, 10.0).unwrap();
        assert_eq!(simplified, pts(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]));
    }

    #[test]
    fn test_simplify_polyline_errors() {
        assert_eq!(
            simplify_polyline(&pts(&[(0.0, 0.0)]), 1.0).unwrap_err(),
            SimplifyError::TooFewCoordinates { found: 1 }
        );
        assert!(matches!(
            simplify_polyline(&pts(&[(0.0, 0.0), (1.0, 1.0)]), -0.5),
            Err(SimplifyError::InvalidTolerance { .. })
        ));
    }

    #[test]
    fn test_simplify_polylines_preserves_order() {
        let lines = vec![
            pts(&[(0.0, 0.0), (1.0, 0.01), (2.0, 0.0)]),
            pts(&[(0.0, 3.0), (1.0, 3.01), (2.0, 3.0)]),
        ];
        let simplified = simplify_polylines(&lines, 0.1).unwrap();
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], pts(&[(0.0, 0.0), (2.0, 0.0)]));
        assert_eq!(simplified[1], pts(&[(0.0, 3.0), (2.0, 3.0)]));
    }

    #[test]
    fn test_simplify_polyline_f32() {
        let line: Vec<Point2<f32>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.2),
            Point2::new(2.0, 0.0),
        ];
        let simplified = simplify_polyline(&line, 0.5f32).unwrap();
        assert_eq!(simplified.len(), 2);
    }
}
