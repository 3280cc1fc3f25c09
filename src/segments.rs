//! Flattened storage for the edges of many rings.

use std::ops::Range;

use crate::geom::{Point, Segment};

/// An index into our segment arena.
///
/// This index is used to identify a segment, whose data can be retrieved by looking
/// it up in [`Segments`]. (Of course, this index-as-identifier breaks down if there are
/// multiple `Segments` in flight. Just be careful not to mix them up.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SegIdx(pub usize);

impl std::fmt::Debug for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

/// Converts a closed ring into its directed edges.
///
/// A ring of `n` points (with the first point repeated as the last) has
/// `n - 1` edges.
pub fn ring_to_segments(ring: &[Point]) -> Vec<Segment> {
    ring.windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}

/// Converts a cycle of consecutive edges back into a closed ring.
///
/// This is the inverse of [`ring_to_segments`]: the start of the first edge
/// is repeated at the end.
pub fn segments_to_ring(segments: &[Segment]) -> Vec<Point> {
    segments
        .iter()
        .map(|s| s.p1)
        .chain(segments.first().map(|s| s.p1))
        .collect()
}

/// An arena of line segments, grouped into rings.
///
/// The edges of every ring are stored contiguously, in ring order. Alongside
/// them we keep the cumulative edge count at which each ring ends, so the ring
/// that an edge came from can be recovered from its position.
///
/// Segments are indexed by [`SegIdx`] and can be retrieved by indexing (i.e. with square brackets).
#[derive(Debug, Clone, Default)]
pub struct Segments {
    segs: Vec<Segment>,
    ring_ends: Vec<usize>,
}

impl Segments {
    /// The number of line segments in this arena.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    /// The number of rings in this arena.
    pub fn ring_count(&self) -> usize {
        self.ring_ends.len()
    }

    /// Iterate over all indices that can be used to index into this arena.
    pub fn indices(&self) -> impl Iterator<Item = SegIdx> {
        (0..self.segs.len()).map(SegIdx)
    }

    /// Iterate over all segments in this arena.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segs.iter()
    }

    /// For each ring, in order, the cumulative number of edges at which it ends.
    pub fn ring_ends(&self) -> &[usize] {
        &self.ring_ends
    }

    /// The edges of the ring at position `ring`, as a range of indices.
    pub fn ring_range(&self, ring: usize) -> Range<usize> {
        let start = if ring == 0 {
            0
        } else {
            self.ring_ends[ring - 1]
        };
        start..self.ring_ends[ring]
    }

    /// The edges of the ring at position `ring`.
    pub fn ring(&self, ring: usize) -> &[Segment] {
        &self.segs[self.ring_range(ring)]
    }

    /// Which ring does the segment at `idx` belong to?
    pub fn ring_of(&self, idx: SegIdx) -> usize {
        self.ring_ends.partition_point(|&end| end <= idx.0)
    }

    /// Adds a closed ring to this arena.
    ///
    /// Zero-length edges (from a point that's repeated consecutively) are
    /// skipped. Rings with no edges left are ignored.
    pub fn add_ring(&mut self, ring: &[Point]) {
        let mut segs = ring_to_segments(ring);
        segs.retain(|s| s.p1 != s.p2);
        if segs.is_empty() {
            return;
        }
        self.segs.extend(segs);
        self.ring_ends.push(self.segs.len());
    }

    /// Adds a collection of closed rings to this arena.
    pub fn add_rings<'a>(&mut self, rings: impl IntoIterator<Item = &'a [Point]>) {
        for ring in rings {
            self.add_ring(ring);
        }
    }

    /// Construct a segment arena from some closed rings.
    pub fn from_rings<'a>(rings: impl IntoIterator<Item = &'a [Point]>) -> Self {
        let mut ret = Self::default();
        ret.add_rings(rings);
        ret
    }
}

impl std::ops::Index<SegIdx> for Segments {
    type Output = Segment;

    fn index(&self, index: SegIdx) -> &Self::Output {
        &self.segs[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point> {
        vec![
            p(x0, y0),
            p(x0 + size, y0),
            p(x0 + size, y0 + size),
            p(x0, y0 + size),
            p(x0, y0),
        ]
    }

    #[test]
    fn ring_round_trip() {
        let ring = square(0.0, 0.0, 1.0);
        let segs = ring_to_segments(&ring);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[1], Segment::new(p(1.0, 0.0), p(1.0, 1.0)));
        assert_eq!(segs[3].p2, ring[0]);
        assert_eq!(segments_to_ring(&segs), ring);
    }

    #[test]
    fn empty_ring() {
        assert!(ring_to_segments(&[]).is_empty());
        assert!(ring_to_segments(&[p(0.0, 0.0)]).is_empty());
        assert!(segments_to_ring(&[]).is_empty());
    }

    #[test]
    fn ring_boundaries() {
        let triangle = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)];
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        let rings: [&[Point]; 4] = [&a, &[], &triangle, &b];
        let segs = Segments::from_rings(rings);

        assert_eq!(segs.len(), 11);
        assert_eq!(segs.ring_count(), 3);
        assert_eq!(segs.ring_ends(), &[4, 7, 11]);
        assert_eq!(segs.ring_range(1), 4..7);
        assert_eq!(segs.ring(2)[0].p1, p(5.0, 5.0));

        let rings: Vec<_> = segs.indices().map(|i| segs.ring_of(i)).collect();
        assert_eq!(rings, [0, 0, 0, 0, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn repeated_points_are_skipped() {
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)];
        let dot = [p(2.0, 2.0), p(2.0, 2.0)];
        let rings: [&[Point]; 2] = [&ring, &dot];
        let segs = Segments::from_rings(rings);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs.ring_count(), 1);
        assert_eq!(segs[SegIdx(1)], Segment::new(p(1.0, 0.0), p(0.0, 1.0)));
    }
}
