//! Lines and segments decorated with identity metadata.
//!
//! A [`TaggedLine`] owns its original coordinates, one [`TaggedSegment`] per
//! consecutive coordinate pair, and the append-only list of result segments
//! produced by simplification. Each tagged segment records which line it came
//! from and its position in that line, so the simplifier can tell the
//! segments a chord replaces apart from everything else in the shared
//! indexes, even when coordinates coincide.

use crate::bounds::Aabb2;
use crate::error::SimplifyError;
use crate::primitives::{Point2, Segment2};
use crate::spatial::Bounded;
use num_traits::Float;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a [`TaggedLine`].
///
/// Ids are allocated from a process-wide counter, so lines built
/// independently never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(u64);

impl LineId {
    /// Allocates a fresh id.
    ///
    /// Useful for tagging free-standing segments inserted into a
    /// [`SegmentIndex`](crate::spatial::SegmentIndex) by hand.
    pub fn fresh() -> Self {
        LineId(NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a tagged segment: owning line plus position in that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    /// The owning line.
    pub line: LineId,
    /// Zero-based segment position within the line.
    pub index: usize,
}

impl SegmentKey {
    /// Creates a key.
    #[inline]
    pub fn new(line: LineId, index: usize) -> Self {
        Self { line, index }
    }
}

/// A segment plus the identity of the line it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedSegment<F> {
    segment: Segment2<F>,
    key: SegmentKey,
}

impl<F: Float> TaggedSegment<F> {
    /// Creates a tagged segment from its endpoints, parent line and index.
    pub fn new(start: Point2<F>, end: Point2<F>, parent: LineId, index: usize) -> Self {
        Self {
            segment: Segment2::new(start, end),
            key: SegmentKey::new(parent, index),
        }
    }

    /// The underlying segment.
    #[inline]
    pub fn segment(&self) -> Segment2<F> {
        self.segment
    }

    /// Identity used by the segment indexes.
    #[inline]
    pub fn key(&self) -> SegmentKey {
        self.key
    }

    /// The line this segment belongs to.
    #[inline]
    pub fn parent(&self) -> LineId {
        self.key.line
    }

    /// Position of this segment among its parent's original segments.
    #[inline]
    pub fn index(&self) -> usize {
        self.key.index
    }

    /// Distance from `p` to the closest point of the segment.
    #[inline]
    pub fn distance_to_point(&self, p: Point2<F>) -> F {
        self.segment.distance_to_point(p)
    }
}

impl<F: Float> Bounded<F> for TaggedSegment<F> {
    fn bounds(&self) -> Aabb2<F> {
        self.segment.bounds()
    }
}

/// A polyline prepared for topology-preserving simplification.
///
/// The coordinates and tagged segments are fixed at construction. The result
/// list starts empty and only grows while a simplifier works on the line.
///
/// `TaggedLine` is deliberately not `Clone`: a copy would share the
/// original's [`LineId`] and confuse the shared segment indexes.
#[derive(Debug)]
pub struct TaggedLine<F> {
    id: LineId,
    coords: Vec<Point2<F>>,
    segments: Vec<TaggedSegment<F>>,
    result: Vec<Segment2<F>>,
    minimum_size: usize,
}

impl<F: Float> TaggedLine<F> {
    /// Builds a tagged line.
    ///
    /// `minimum_size` is the fewest points the simplified line should keep
    /// when no topology conflict forces more. It must be at least 2 and at
    /// most the number of coordinates.
    pub fn new(coords: Vec<Point2<F>>, minimum_size: usize) -> Result<Self, SimplifyError> {
        let len = coords.len();
        if len < 2 {
            return Err(SimplifyError::TooFewCoordinates { found: len });
        }
        if minimum_size < 2 || minimum_size > len {
            return Err(SimplifyError::InvalidMinimumSize {
                minimum: minimum_size,
                len,
            });
        }

        let id = LineId::fresh();
        let segments = coords
            .windows(2)
            .enumerate()
            .map(|(i, w)| TaggedSegment::new(w[0], w[1], id, i))
            .collect();

        Ok(Self {
            id,
            coords,
            segments,
            result: Vec::new(),
            minimum_size,
        })
    }

    /// Builds a tagged line with the customary minimum size: 4 points for a
    /// closed line (first == last), so rings keep an area, and 2 otherwise.
    ///
    /// The minimum is clamped to the coordinate count.
    pub fn with_default_minimum(coords: Vec<Point2<F>>) -> Result<Self, SimplifyError> {
        let closed = coords.len() > 1 && coords.first() == coords.last();
        let minimum = if closed { 4 } else { 2 };
        let minimum = minimum.min(coords.len()).max(2);
        Self::new(coords, minimum)
    }

    /// Identity token shared by every segment of this line.
    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    /// The original coordinate sequence.
    #[inline]
    pub fn coordinates(&self) -> &[Point2<F>] {
        &self.coords
    }

    /// Number of original coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`: a tagged line has at least two coordinates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The original tagged segments, one per consecutive coordinate pair.
    #[inline]
    pub fn segments(&self) -> &[TaggedSegment<F>] {
        &self.segments
    }

    /// Returns the `i`-th original segment.
    pub fn segment_at(&self, i: usize) -> Result<&TaggedSegment<F>, SimplifyError> {
        self.segments.get(i).ok_or(SimplifyError::SegmentOutOfRange {
            index: i,
            count: self.segments.len(),
        })
    }

    /// Minimum number of points the result should contain.
    #[inline]
    pub fn minimum_size(&self) -> usize {
        self.minimum_size
    }

    /// Appends a segment to the result. No geometric validation happens here.
    #[inline]
    pub fn append_result(&mut self, segment: Segment2<F>) {
        self.result.push(segment);
    }

    /// Number of segments in the result so far.
    #[inline]
    pub fn result_size(&self) -> usize {
        self.result.len()
    }

    /// The result segments, in line order.
    #[inline]
    pub fn result(&self) -> &[Segment2<F>] {
        &self.result
    }

    /// The simplified polyline: the start of the first result segment
    /// followed by the end of every result segment.
    ///
    /// Empty until the line has been simplified.
    pub fn result_coordinates(&self) -> Vec<Point2<F>> {
        let mut points = Vec::with_capacity(self.result.len() + 1);
        if let Some(first) = self.result.first() {
            points.push(first.start);
            points.extend(self.result.iter().map(|s| s.end));
        }
        points
    }
}
