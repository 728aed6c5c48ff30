//! Mutable grid-based index over tagged segments.
//!
//! The index is an approximate pre-filter: a query returns every stored
//! segment whose envelope intersects the query envelope. It never misses a
//! segment that truly intersects the query, and callers are expected to
//! discard false positives with an exact intersection test.
//!
//! # Layout
//!
//! 1. The plane is divided into square cells of side `cell_size`
//! 2. Each segment is registered in every cell its envelope overlaps
//! 3. Segments that would span more than [`MAX_CELLS_PER_SEGMENT`] cells are
//!    kept in a separate list that every query scans
//! 4. Queries spanning too many cells fall back to a scan of all entries
//!
//! Segments are identified by [`SegmentKey`], never by coordinates, so two
//! distinct segments with identical endpoints coexist and removal is exact.

use super::Bounded;
use crate::bounds::Aabb2;
use crate::error::SimplifyError;
use crate::primitives::Segment2;
use crate::simplify::{SegmentKey, TaggedSegment};
use num_traits::Float;
use std::collections::HashMap;

/// Segments covering more cells than this are stored unbucketed.
pub const MAX_CELLS_PER_SEGMENT: u64 = 64;

/// Cell size used by [`SegmentIndex::default`].
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

impl<F: Float> Bounded<F> for Segment2<F> {
    fn bounds(&self) -> Aabb2<F> {
        Segment2::bounds(*self)
    }
}

/// Grid cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

/// Inclusive rectangle of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRange {
    min: CellCoord,
    max: CellCoord,
}

impl CellRange {
    fn cell_count(&self) -> Option<u64> {
        let w = u64::try_from(self.max.x.checked_sub(self.min.x)?).ok()?.checked_add(1)?;
        let h = u64::try_from(self.max.y.checked_sub(self.min.y)?).ok()?.checked_add(1)?;
        w.checked_mul(h)
    }

    fn cells(self) -> impl Iterator<Item = CellCoord> {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| CellCoord { x, y }))
    }
}

#[derive(Clone, Debug)]
struct IndexEntry<F> {
    segment: TaggedSegment<F>,
    /// `None` when the segment lives in the oversized list.
    cells: Option<CellRange>,
}

/// A mutable spatial index of [`TaggedSegment`]s keyed by envelope.
///
/// # Example
///
/// ```
/// use topo_simplify::spatial::SegmentIndex;
/// use topo_simplify::simplify::{LineId, TaggedSegment};
/// use topo_simplify::{Point2, Segment2};
///
/// let line = LineId::fresh();
/// let mut index = SegmentIndex::with_cell_size(2.0).unwrap();
/// index.add(TaggedSegment::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), line, 0));
/// index.add(TaggedSegment::new(Point2::new(8.0, 8.0), Point2::new(9.0, 9.0), line, 1));
///
/// let hits = index.query(&Segment2::from_coords(0.0, 1.0, 1.0, 0.0));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].index(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct SegmentIndex<F> {
    cell_size: F,
    inv_cell_size: F,
    entries: HashMap<SegmentKey, IndexEntry<F>>,
    grid: HashMap<CellCoord, Vec<SegmentKey>>,
    oversized: Vec<SegmentKey>,
}

impl<F: Float> Default for SegmentIndex<F> {
    fn default() -> Self {
        let cell_size = F::from(DEFAULT_CELL_SIZE).unwrap_or_else(F::one);
        Self::build(cell_size)
    }
}

impl<F: Float> SegmentIndex<F> {
    /// Creates an empty index with the default cell size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with the given grid cell size.
    ///
    /// Cells around the typical segment length give the best query times.
    pub fn with_cell_size(cell_size: F) -> Result<Self, SimplifyError> {
        if !(cell_size > F::zero() && cell_size.is_finite()) {
            return Err(SimplifyError::InvalidCellSize);
        }
        Ok(Self::build(cell_size))
    }

    fn build(cell_size: F) -> Self {
        Self {
            cell_size,
            inv_cell_size: F::one() / cell_size,
            entries: HashMap::new(),
            grid: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    /// Grid cell size.
    #[inline]
    pub fn cell_size(&self) -> F {
        self.cell_size
    }

    /// Number of indexed segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a segment with this key is indexed.
    #[inline]
    pub fn contains(&self, key: SegmentKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns the indexed segment with this key.
    #[inline]
    pub fn get(&self, key: SegmentKey) -> Option<&TaggedSegment<F>> {
        self.entries.get(&key).map(|e| &e.segment)
    }

    /// Iterates over all indexed segments in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &TaggedSegment<F>> {
        self.entries.values().map(|e| &e.segment)
    }

    /// Inserts a segment.
    ///
    /// A segment whose key is already present replaces the stored one.
    pub fn add(&mut self, segment: TaggedSegment<F>) {
        let key = segment.key();
        self.remove(key);

        let cells = self
            .cell_range(segment.bounds())
            .filter(|range| matches!(range.cell_count(), Some(n) if n <= MAX_CELLS_PER_SEGMENT));

        match cells {
            Some(range) => {
                for cell in range.cells() {
                    self.grid.entry(cell).or_default().push(key);
                }
            }
            None => self.oversized.push(key),
        }

        self.entries.insert(key, IndexEntry { segment, cells });
    }

    /// Removes the segment with this key, returning it.
    ///
    /// Removing a key that is not indexed is a no-op and returns `None`.
    pub fn remove(&mut self, key: SegmentKey) -> Option<TaggedSegment<F>> {
        let entry = self.entries.remove(&key)?;

        match entry.cells {
            Some(range) => {
                for cell in range.cells() {
                    if let Some(bucket) = self.grid.get_mut(&cell) {
                        bucket.retain(|k| *k != key);
                        if bucket.is_empty() {
                            self.grid.remove(&cell);
                        }
                    }
                }
            }
            None => self.oversized.retain(|k| *k != key),
        }

        Some(entry.segment)
    }

    /// Returns every indexed segment whose envelope intersects the envelope
    /// of `shape`, in ascending key order.
    pub fn query<B: Bounded<F>>(&self, shape: &B) -> Vec<&TaggedSegment<F>> {
        self.query_aabb(shape.bounds())
    }

    /// Returns every indexed segment whose envelope intersects `envelope`,
    /// in ascending key order.
    pub fn query_aabb(&self, envelope: Aabb2<F>) -> Vec<&TaggedSegment<F>> {
        let bucketed = self
            .cell_range(envelope)
            .filter(|range| matches!(range.cell_count(), Some(n) if n <= self.grid.len() as u64));

        let mut keys: Vec<SegmentKey> = match bucketed {
            Some(range) => {
                let mut keys = self.oversized.clone();
                for cell in range.cells() {
                    if let Some(bucket) = self.grid.get(&cell) {
                        keys.extend(bucket.iter().copied());
                    }
                }
                keys
            }
            // Visiting every cell would cost more than a full scan
            None => self.entries.keys().copied().collect(),
        };

        // Segments spanning several cells are reported once per cell
        keys.sort_unstable();
        keys.dedup();

        keys.into_iter()
            .filter_map(|key| self.entries.get(&key))
            .filter(|entry| entry.segment.bounds().intersects(envelope))
            .map(|entry| &entry.segment)
            .collect()
    }

    /// Cells overlapped by `envelope`, or `None` when the coordinates do not
    /// map to representable cells (non-finite or astronomically large).
    fn cell_range(&self, envelope: Aabb2<F>) -> Option<CellRange> {
        let to_cell = |v: F| (v * self.inv_cell_size).floor().to_i64();
        Some(CellRange {
            min: CellCoord {
                x: to_cell(envelope.min.x)?,
                y: to_cell(envelope.min.y)?,
            },
            max: CellCoord {
                x: to_cell(envelope.max.x)?,
                y: to_cell(envelope.max.y)?,
            },
        })
    }
}
