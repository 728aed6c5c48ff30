//! Orientation and segment intersection predicates.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Computes the orientation of three points with tolerance.
///
/// Returns the orientation of the triangle formed by points `a`, `b`, `c`:
/// - `CounterClockwise` if `c` is to the left of the line from `a` to `b`
/// - `Clockwise` if `c` is to the right of the line from `a` to `b`
/// - `Collinear` if `c` is on the line (within `eps` tolerance)
///
/// `eps` is compared against the absolute value of the cross product
/// (twice the signed area). Pass zero for the exact sign.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = (b - a).cross(c - a);

    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// How two segments meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Proper crossing: the single intersection point lies strictly inside
    /// both segments.
    Crossing(Point2<F>),
    /// The segments meet at a single point that is an endpoint of at least
    /// one of them.
    Touching(Point2<F>),
    /// Segments are collinear and share more than one point.
    Overlapping {
        /// Start of the overlapping region.
        start: Point2<F>,
        /// End of the overlapping region.
        end: Point2<F>,
    },
}

impl<F: Float> SegmentIntersection<F> {
    /// Returns `true` if any intersection point is not an endpoint of both
    /// `s1` and `s2`.
    ///
    /// `s1` and `s2` must be the segments this result was computed from.
    pub fn is_interior(&self, s1: Segment2<F>, s2: Segment2<F>) -> bool {
        let is_shared_endpoint = |p: Point2<F>| s1.has_endpoint(p) && s2.has_endpoint(p);
        match *self {
            SegmentIntersection::None => false,
            SegmentIntersection::Crossing(_) => true,
            SegmentIntersection::Touching(p) => !is_shared_endpoint(p),
            SegmentIntersection::Overlapping { start, end } => {
                !is_shared_endpoint(start) || !is_shared_endpoint(end)
            }
        }
    }
}

/// Classifies the intersection of two segments using exact orientation signs.
///
/// Degenerate (zero-length) segments are handled as points.
pub fn intersect_segments<F: Float>(s1: Segment2<F>, s2: Segment2<F>) -> SegmentIntersection<F> {
    if !s1.bounds().intersects(s2.bounds()) {
        return SegmentIntersection::None;
    }

    let zero = F::zero();
    let o1 = orient2d(s1.start, s1.end, s2.start, zero);
    let o2 = orient2d(s1.start, s1.end, s2.end, zero);
    let o3 = orient2d(s2.start, s2.end, s1.start, zero);
    let o4 = orient2d(s2.start, s2.end, s1.end, zero);

    // Both endpoints strictly on the same side of the other segment's line
    if (o1 == o2 && o1 != Orientation::Collinear) || (o3 == o4 && o3 != Orientation::Collinear) {
        return SegmentIntersection::None;
    }

    let all_collinear = [o1, o2, o3, o4]
        .iter()
        .all(|&o| o == Orientation::Collinear);
    if all_collinear {
        return collinear_intersection(s1, s2);
    }

    // An endpoint lies on the other segment: the lines meet exactly there.
    // When several endpoints qualify, prefer one that is not shared so the
    // result does not depend on argument order.
    let touching = [(o1, s2.start), (o2, s2.end), (o3, s1.start), (o4, s1.end)];
    let mut on_other = touching
        .iter()
        .filter(|(o, _)| *o == Orientation::Collinear)
        .map(|&(_, p)| p)
        .peekable();
    if let Some(&first) = on_other.peek() {
        let point = on_other
            .find(|&p| !(s1.has_endpoint(p) && s2.has_endpoint(p)))
            .unwrap_or(first);
        return SegmentIntersection::Touching(point);
    }

    // Proper crossing. Solve s1.start + t1 * d1 = s2.start + t2 * d2 by
    // Cramer's rule.
    let d1 = s1.direction();
    let d2 = s2.direction();
    let cross = d1.cross(d2);
    let t1 = if cross == zero {
        zero
    } else {
        (s2.start - s1.start).cross(d2) / cross
    };

    SegmentIntersection::Crossing(s1.point_at(t1.max(zero).min(F::one())))
}

/// Intersection of two segments known to lie on a common line.
fn collinear_intersection<F: Float>(s1: Segment2<F>, s2: Segment2<F>) -> SegmentIntersection<F> {
    let b1 = s1.bounds();
    let b2 = s2.bounds();

    // On a common line, bounding-box containment is segment containment, and
    // every candidate is an extreme of the overlap interval.
    let candidates = [
        (s1.start, b2.contains_point(s1.start)),
        (s1.end, b2.contains_point(s1.end)),
        (s2.start, b1.contains_point(s2.start)),
        (s2.end, b1.contains_point(s2.end)),
    ];

    let mut first: Option<Point2<F>> = None;
    for (p, inside) in candidates {
        if !inside {
            continue;
        }
        match first {
            None => first = Some(p),
            Some(q) if q != p => return SegmentIntersection::Overlapping { start: q, end: p },
            Some(_) => {}
        }
    }

    match first {
        Some(p) => SegmentIntersection::Touching(p),
        None => SegmentIntersection::None,
    }
}

/// Returns `true` if the segments meet anywhere other than at a shared
/// endpoint.
///
/// Crossings, T-junctions (an endpoint of one segment inside the other) and
/// collinear overlaps are interior intersections. Segments joined end to end
/// are not, and neither are two segments with identical endpoints.
#[inline]
pub fn has_interior_intersection<F: Float>(s1: Segment2<F>, s2: Segment2<F>) -> bool {
    intersect_segments(s1, s2).is_interior(s1, s2)
}
