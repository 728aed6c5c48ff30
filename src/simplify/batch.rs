//! Simplification of a collection of lines against shared indexes.

use super::line_simplifier::TaggedLineSimplifier;
use super::options::SimplifyOptions;
use super::tagged::TaggedLine;
use crate::error::SimplifyError;
use crate::spatial::{Bounded, SegmentIndex};
use log::debug;
use num_traits::Float;

/// Simplifies a batch of [`TaggedLine`]s so that no simplified line crosses
/// itself or any other line of the batch.
///
/// All lines share one input index, populated with every original segment
/// before any line is touched, and one output index of accepted chords.
/// Lines are processed in slice order. A line processed later sees earlier
/// lines fully simplified and later lines still unsimplified, so the order
/// can change which vertices survive.
///
/// # Example
///
/// ```
/// use topo_simplify::simplify::{TaggedLine, TaggedLinesSimplifier};
/// use topo_simplify::Point2;
///
/// let mut lines = vec![
///     TaggedLine::new(
///         vec![Point2::new(0.0, 0.0), Point2::new(5.0, 1.0), Point2::new(10.0, 0.0)],
///         2,
///     )
///     .unwrap(),
///     TaggedLine::new(
///         vec![Point2::new(4.0, -1.0), Point2::new(5.5, -0.2), Point2::new(6.0, 0.5)],
///         2,
///     )
///     .unwrap(),
/// ];
///
/// TaggedLinesSimplifier::new(1.5).unwrap().simplify(&mut lines).unwrap();
///
/// // The first chord would cross the second line, so its apex survives
/// assert_eq!(lines[0].result_size(), 2);
/// assert_eq!(lines[1].result_size(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaggedLinesSimplifier<F> {
    options: SimplifyOptions<F>,
}

impl<F: Float> TaggedLinesSimplifier<F> {
    /// Creates a batch simplifier with the given distance tolerance.
    pub fn new(tolerance: F) -> Result<Self, SimplifyError> {
        Self::with_options(SimplifyOptions::with_tolerance(tolerance))
    }

    /// Creates a batch simplifier from options.
    pub fn with_options(options: SimplifyOptions<F>) -> Result<Self, SimplifyError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options in effect.
    pub fn options(&self) -> SimplifyOptions<F> {
        self.options
    }

    /// Simplifies every line, in order, filling their result lists.
    ///
    /// Fails before building any index if a line already holds a result.
    pub fn simplify(&self, lines: &mut [TaggedLine<F>]) -> Result<(), SimplifyError> {
        if let Some(done) = lines.iter().find(|line| line.result_size() > 0) {
            return Err(SimplifyError::AlreadySimplified { line: done.id() });
        }

        let cell_size = self
            .options
            .cell_size
            .unwrap_or_else(|| suggested_cell_size(lines));
        let mut input_index = SegmentIndex::with_cell_size(cell_size)?;
        let mut output_index = SegmentIndex::with_cell_size(cell_size)?;

        for line in lines.iter() {
            for segment in line.segments() {
                input_index.add(*segment);
            }
        }
        debug!(
            "simplifying {} lines ({} segments), cell size {:?}",
            lines.len(),
            input_index.len(),
            cell_size.to_f64()
        );

        let tolerance = self.options.tolerance;
        for line in lines.iter_mut() {
            TaggedLineSimplifier::new(&mut input_index, &mut output_index, tolerance)?
                .simplify(line)?;
        }
        Ok(())
    }
}

/// Mean envelope extent of the non-degenerate input segments, or 1.
fn suggested_cell_size<F: Float>(lines: &[TaggedLine<F>]) -> F {
    let (sum, count) = lines
        .iter()
        .flat_map(|line| line.segments())
        .map(|segment| segment.bounds().extent())
        .filter(|extent| *extent > F::zero() && extent.is_finite())
        .fold((F::zero(), 0usize), |(sum, count), extent| (sum + extent, count + 1));

    match F::from(count) {
        Some(n) if count > 0 => {
            let mean = sum / n;
            if mean > F::zero() && mean.is_finite() {
                mean
            } else {
                F::one()
            }
        }
        _ => F::one(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Point2, Segment2};
    use crate::simplify::simplify_polyline;
    use crate::tolerance::has_interior_intersection;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn apex_line() -> Vec<Point2<f64>> {
        pts(&[(0.0, 0.0), (5.0, 1.0), (10.0, 0.0)])
    }

    /// Crosses below the apex line's chord, never touching the line itself.
    fn dipping_line() -> Vec<Point2<f64>> {
        pts(&[(4.0, -1.0), (5.5, -0.2), (6.0, 0.5)])
    }

    /// Every pair of result segments across all lines, checked by brute force.
    fn interior_intersections(lines: &[TaggedLine<f64>]) -> usize {
        let segments: Vec<Segment2<f64>> = lines
            .iter()
            .flat_map(|line| line.result().iter().copied())
            .collect();
        let mut count = 0;
        for i in 0..segments.len() {
            for j in i + 1..segments.len() {
                if has_interior_intersection(segments[i], segments[j]) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_cross_line_rejection() {
        let tolerance = 1.5;

        // Alone, each line collapses to its chord and the chords cross
        let a = simplify_polyline(&apex_line(), tolerance).unwrap();
        let b = simplify_polyline(&dipping_line(), tolerance).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
        assert!(has_interior_intersection(
            Segment2::new(a[0], a[1]),
            Segment2::new(b[0], b[1])
        ));

        // Together, the apex survives
        let mut lines = vec![
            TaggedLine::new(apex_line(), 2).unwrap(),
            TaggedLine::new(dipping_line(), 2).unwrap(),
        ];
        TaggedLinesSimplifier::new(tolerance)
            .unwrap()
            .simplify(&mut lines)
            .unwrap();

        assert_eq!(lines[0].result_coordinates(), apex_line());
        assert_eq!(lines[1].result_size(), 1);
        assert_eq!(interior_intersections(&lines), 0);
    }

    #[test]
    fn test_order_reversed_still_consistent() {
        let mut lines = vec![
            TaggedLine::new(dipping_line(), 2).unwrap(),
            TaggedLine::new(apex_line(), 2).unwrap(),
        ];
        TaggedLinesSimplifier::new(1.5)
            .unwrap()
            .simplify(&mut lines)
            .unwrap();

        // The dipping line flattens first, so the apex line sees its chord
        assert_eq!(lines[0].result_size(), 1);
        assert_eq!(lines[1].result_coordinates(), apex_line());
        assert_eq!(interior_intersections(&lines), 0);
    }

    #[test]
    fn test_independent_lines_simplify_fully() {
        let mut lines = vec![
            TaggedLine::new(pts(&[(0.0, 0.0), (1.0, 0.01), (2.0, 0.0)]), 2).unwrap(),
            TaggedLine::new(pts(&[(0.0, 5.0), (1.0, 5.01), (2.0, 5.0)]), 2).unwrap(),
        ];
        TaggedLinesSimplifier::new(0.1)
            .unwrap()
            .simplify(&mut lines)
            .unwrap();
        assert!(lines.iter().all(|line| line.result_size() == 1));
    }

    #[test]
    fn test_rejects_already_simplified_batch() {
        let mut lines = vec![
            TaggedLine::new(apex_line(), 2).unwrap(),
            TaggedLine::new(dipping_line(), 2).unwrap(),
        ];
        let simplifier = TaggedLinesSimplifier::new(0.5).unwrap();
        simplifier.simplify(&mut lines[1..]).unwrap();

        let err = simplifier.simplify(&mut lines).unwrap_err();
        assert_eq!(err, SimplifyError::AlreadySimplified { line: lines[1].id() });
        // The untouched line stays untouched
        assert_eq!(lines[0].result_size(), 0);
    }

    #[test]
    fn test_rejects_invalid_options() {
        assert!(matches!(
            TaggedLinesSimplifier::new(-1.0f64),
            Err(SimplifyError::InvalidTolerance { .. })
        ));
        assert!(matches!(
            TaggedLinesSimplifier::with_options(
                SimplifyOptions::with_tolerance(1.0f64).cell_size(-2.0)
            ),
            Err(SimplifyError::InvalidCellSize)
        ));
    }

    #[test]
    fn test_explicit_cell_size_gives_same_result() {
        let run = |options: SimplifyOptions<f64>| {
            let mut lines = vec![
                TaggedLine::new(apex_line(), 2).unwrap(),
                TaggedLine::new(dipping_line(), 2).unwrap(),
            ];
            TaggedLinesSimplifier::with_options(options)
                .unwrap()
                .simplify(&mut lines)
                .unwrap();
            lines
                .iter()
                .map(|line| line.result_coordinates())
                .collect::<Vec<_>>()
        };

        let derived = run(SimplifyOptions::with_tolerance(1.5));
        assert_eq!(derived, run(SimplifyOptions::with_tolerance(1.5).cell_size(0.05)));
        assert_eq!(derived, run(SimplifyOptions::with_tolerance(1.5).cell_size(1000.0)));
    }

    #[test]
    fn test_suggested_cell_size() {
        let lines = vec![TaggedLine::new(pts(&[(0.0, 0.0), (2.0, 1.0), (2.0, 5.0)]), 2).unwrap()];
        // Extents 2 and 4
        assert_relative_eq!(suggested_cell_size(&lines), 3.0);

        let degenerate = vec![TaggedLine::new(pts(&[(1.0, 1.0), (1.0, 1.0)]), 2).unwrap()];
        assert_eq!(suggested_cell_size(&degenerate), 1.0);
        assert_eq!(suggested_cell_size::<f64>(&[]), 1.0);
    }

    #[test]
    fn test_empty_batch() {
        let mut lines: Vec<TaggedLine<f64>> = vec![];
        assert!(TaggedLinesSimplifier::new(1.0)
            .unwrap()
            .simplify(&mut lines)
            .is_ok());
    }

    /// Lines sampled on a shared x grid, stacked with strictly positive
    /// gaps, so the input has no intersections at all.
    fn stacked_lines() -> impl Strategy<Value = Vec<Vec<Point2<f64>>>> {
        (2usize..5, 3usize..14).prop_flat_map(|(n_lines, n_cols)| {
            prop::collection::vec(
                prop::collection::vec(0.05f64..2.0, n_lines),
                n_cols,
            )
            .prop_map(move |columns| {
                let mut lines = vec![Vec::with_capacity(n_cols); n_lines];
                for (k, gaps) in columns.iter().enumerate() {
                    let mut y = 0.0;
                    for (i, gap) in gaps.iter().enumerate() {
                        y += gap;
                        lines[i].push(Point2::new(k as f64, y));
                    }
                }
                lines
            })
        })
    }

    proptest! {
        #[test]
        fn prop_batch_introduces_no_intersections(
            coords in stacked_lines(),
            tolerance in 0.0f64..3.0,
        ) {
            let mut lines: Vec<TaggedLine<f64>> = coords
                .iter()
                .map(|c| TaggedLine::new(c.clone(), 2).unwrap())
                .collect();
            TaggedLinesSimplifier::new(tolerance)
                .unwrap()
                .simplify(&mut lines)
                .unwrap();

            prop_assert_eq!(interior_intersections(&lines), 0);
            for (line, original) in lines.iter().zip(&coords) {
                let result = line.result_coordinates();
                prop_assert!(result.len() >= 2);
                prop_assert_eq!(result.first(), original.first());
                prop_assert_eq!(result.last(), original.last());
            }
        }
    }
}
