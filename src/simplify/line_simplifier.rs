//! Topology-preserving Douglas-Peucker simplification of one tagged line.
//!
//! The line is subdivided recursively. A section `[i, j]` is replaced by the
//! chord from point `i` to point `j` only if
//!
//! - every interior point is within the distance tolerance of the chord,
//! - the minimum-size guard does not apply, and
//! - the chord has no interior intersection with any segment already
//!   accepted (the output index) or with any original segment still live
//!   (the input index), ignoring the line's own segments that the chord
//!   replaces.
//!
//! Otherwise the section is split at its furthest point and both halves are
//! processed, left before right.
//!
//! The two indexes are shared mutable state. Simplifiers bound to the same
//! pair of indexes must run one after another; the `&mut` borrows enforce
//! this for a single pair of index values.

use super::options::validate_tolerance;
use super::tagged::{LineId, SegmentKey, TaggedLine, TaggedSegment};
use crate::error::SimplifyError;
use crate::primitives::{Point2, Segment2};
use crate::spatial::SegmentIndex;
use crate::tolerance::has_interior_intersection;
use log::{debug, trace};
use num_traits::Float;

/// A pending index interval of the working line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Section {
    start: usize,
    end: usize,
    /// Recursion depth, 1 for the whole line.
    depth: usize,
}

impl Section {
    fn split_at(self, k: usize) -> (Section, Section) {
        let depth = self.depth + 1;
        (
            Section {
                start: self.start,
                end: k,
                depth,
            },
            Section {
                start: k,
                end: self.end,
                depth,
            },
        )
    }
}

/// Why a section could not be flattened to its chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    MinimumSize,
    Tolerance,
    OutputConflict,
    InputConflict,
}

/// Simplifies tagged lines against a shared pair of segment indexes.
///
/// The input index must hold the original segments of every line that can
/// interact with the lines being simplified (including their own); the
/// output index holds the chords accepted so far. Both are updated as
/// sections are flattened.
///
/// # Example
///
/// ```
/// use topo_simplify::simplify::{TaggedLine, TaggedLineSimplifier};
/// use topo_simplify::spatial::SegmentIndex;
/// use topo_simplify::Point2;
///
/// let mut line = TaggedLine::new(
///     vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.01), Point2::new(2.0, 0.0)],
///     2,
/// )
/// .unwrap();
///
/// let mut input = SegmentIndex::new();
/// let mut output = SegmentIndex::new();
/// for segment in line.segments() {
///     input.add(*segment);
/// }
///
/// TaggedLineSimplifier::new(&mut input, &mut output, 0.1)
///     .unwrap()
///     .simplify(&mut line)
///     .unwrap();
/// assert_eq!(line.result_size(), 1);
/// ```
pub struct TaggedLineSimplifier<'a, F> {
    input_index: &'a mut SegmentIndex<F>,
    output_index: &'a mut SegmentIndex<F>,
    tolerance: F,
}

impl<'a, F: Float> TaggedLineSimplifier<'a, F> {
    /// Binds a simplifier to a pair of indexes and a distance tolerance.
    pub fn new(
        input_index: &'a mut SegmentIndex<F>,
        output_index: &'a mut SegmentIndex<F>,
        tolerance: F,
    ) -> Result<Self, SimplifyError> {
        validate_tolerance(tolerance)?;
        Ok(Self {
            input_index,
            output_index,
            tolerance,
        })
    }

    /// The distance tolerance.
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// Simplifies `line`, filling its result list.
    ///
    /// Fails without touching the indexes if the line already has a result.
    pub fn simplify(&mut self, line: &mut TaggedLine<F>) -> Result<(), SimplifyError> {
        if line.result_size() > 0 {
            return Err(SimplifyError::AlreadySimplified { line: line.id() });
        }

        // LIFO work list: the right half is pushed first so sections finish
        // left to right, as in the recursive formulation.
        let mut pending = vec![Section {
            start: 0,
            end: line.len() - 1,
            depth: 1,
        }];
        while let Some(section) = pending.pop() {
            if let Some(k) = self.simplify_section(line, section)? {
                let (left, right) = section.split_at(k);
                pending.push(right);
                pending.push(left);
            }
        }

        debug_assert!(is_valid_result(line), "result of line {} is not a chain", line.id());
        debug!(
            "line {} simplified: {} -> {} points",
            line.id(),
            line.len(),
            line.result_size() + 1
        );
        Ok(())
    }

    /// Processes one section, returning the split point if it must be
    /// subdivided.
    fn simplify_section(
        &mut self,
        line: &mut TaggedLine<F>,
        section: Section,
    ) -> Result<Option<usize>, SimplifyError> {
        let Section { start, end, .. } = section;

        if end == start + 1 {
            // The original segment stays in the input index; it cannot
            // conflict with itself.
            let segment = line.segment_at(start)?.segment();
            line.append_result(segment);
            return Ok(None);
        }

        let coords = line.coordinates();
        let (furthest, max_distance) = find_furthest_point(coords, start, end);
        let chord = Segment2::new(coords[start], coords[end]);

        if let Some(reason) = self.flatten_rejection(line, section, chord, max_distance) {
            trace!(
                "line {}: section [{}, {}] kept at depth {} ({:?}), splitting at {}",
                line.id(),
                start,
                end,
                section.depth,
                reason,
                furthest
            );
            return Ok(Some(furthest));
        }

        self.flatten(line.id(), start, end, chord);
        line.append_result(chord);
        Ok(None)
    }

    fn flatten_rejection(
        &self,
        line: &TaggedLine<F>,
        section: Section,
        chord: Segment2<F>,
        max_distance: F,
    ) -> Option<Rejection> {
        // The guard compares the point count the result would reach with
        // this chord appended, and only at the top of the recursion.
        if section.depth < 2 && line.result_size() + 2 < line.minimum_size() {
            return Some(Rejection::MinimumSize);
        }
        if !(max_distance <= self.tolerance) {
            return Some(Rejection::Tolerance);
        }
        if self.has_bad_output_intersection(chord) {
            return Some(Rejection::OutputConflict);
        }
        if self.has_bad_input_intersection(line.id(), section, chord) {
            return Some(Rejection::InputConflict);
        }
        None
    }

    fn has_bad_output_intersection(&self, chord: Segment2<F>) -> bool {
        self.output_index
            .query(&chord)
            .into_iter()
            .any(|existing| has_interior_intersection(existing.segment(), chord))
    }

    fn has_bad_input_intersection(
        &self,
        line: LineId,
        section: Section,
        chord: Segment2<F>,
    ) -> bool {
        self.input_index
            .query(&chord)
            .into_iter()
            .filter(|existing| !is_in_section(existing, line, section))
            .any(|existing| has_interior_intersection(existing.segment(), chord))
    }

    /// Replaces the original segments `[start, end)` with `chord` in the
    /// indexes.
    fn flatten(&mut self, line: LineId, start: usize, end: usize, chord: Segment2<F>) {
        for i in start..end {
            self.input_index.remove(SegmentKey::new(line, i));
        }
        self.output_index
            .add(TaggedSegment::new(chord.start, chord.end, line, start));
    }
}

/// Returns `true` if `segment` is one of the original segments of `line`
/// that a chord over `section` replaces.
#[inline]
fn is_in_section<F: Float>(segment: &TaggedSegment<F>, line: LineId, section: Section) -> bool {
    segment.parent() == line && segment.index() >= section.start && segment.index() < section.end
}

/// Finds the interior point of `[start, end]` furthest from the chord.
///
/// Ties go to the first point. Requires `end > start + 1`.
fn find_furthest_point<F: Float>(coords: &[Point2<F>], start: usize, end: usize) -> (usize, F) {
    let chord = Segment2::new(coords[start], coords[end]);
    let mut max_distance = -F::one();
    let mut max_index = start + 1;

    for (k, &p) in coords.iter().enumerate().take(end).skip(start + 1) {
        let distance = chord.distance_to_point(p);
        if distance > max_distance {
            max_distance = distance;
            max_index = k;
        }
    }

    (max_index, max_distance)
}

/// The result forms a chain from the first to the last original point.
fn is_valid_result<F: Float>(line: &TaggedLine<F>) -> bool {
    let coords = line.coordinates();
    let result = line.result();
    match (result.first(), result.last()) {
        (Some(first), Some(last)) => {
            first.start == coords[0]
                && last.end == coords[coords.len() - 1]
                && result.windows(2).all(|w| w[0].end == w[1].start)
        }
        _ => false,
    }
}
