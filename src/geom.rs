//! Geometric primitives: points and directed segments.

use kurbo::{Rect, Vec2};

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`, for the convenience of the
/// nesting sweep (which moves in increasing `x`).
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    ///
    /// Unlike in screen coordinates, larger values are up: a ring is
    /// counter-clockwise when its signed area is positive.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    ///
    /// No checks are made here: non-finite coordinates are caught when the
    /// polygons containing them are validated.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Compute an affine combination between `self` and `other`; that is, `(1 - t) * self + t * other`.
    pub fn affine(&self, other: &Self, t: f64) -> Self {
        Point {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }

    /// The midpoint between `self` and `other`.
    pub fn midpoint(&self, other: &Self) -> Self {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Convert to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    fn to(self, other: Point) -> Vec2 {
        other.to_kurbo() - self.to_kurbo()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// The turn made at `b` when walking from `a` through `b` to `c`.
///
/// Positive for a left (counter-clockwise) turn, negative for a right turn,
/// and zero if the three points are collinear.
pub fn turn(a: Point, b: Point, c: Point) -> f64 {
    a.to(b).cross(b.to(c))
}

/// Iterates over consecutive pairs of `xs`, including the pair that wraps
/// around from the last element to the first.
pub(crate) fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .chain(xs.last().zip(xs.first()))
}

/// A directed line segment, from `p1` to `p2`.
///
/// Every segment belongs to exactly one input ring, and points along the
/// direction in which that ring is traversed.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// The start point.
    pub p1: Point,
    /// The end point.
    pub p2: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.p1, self.p2)
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.p1, self.p2).cmp(&(other.p1, other.p2))
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Segment {
    /// Create a new segment.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// The point at parameter `t`, where `t = 0` is the start and `t = 1` is the end.
    pub fn position(&self, t: f64) -> Point {
        self.p1.affine(&self.p2, t)
    }

    /// The parameter along `self` at which it crosses `other`.
    ///
    /// See [`Segment::crossing`] for the conventions.
    pub fn parameter(&self, other: &Segment) -> Option<f64> {
        self.crossing(other).map(|(t, _)| t)
    }

    /// Finds where `self` crosses `other`, returning the parameters along
    /// `self` and along `other` respectively.
    ///
    /// Returns `None` if the two segments are parallel or if they don't meet.
    /// Collinear overlaps go through [`Segment::interior_parameter`] instead.
    ///
    /// Parameters live in the half-open interval `[0, 1)`: a segment owns its
    /// start point but not its end point. Since consecutive segments of a
    /// ring share an endpoint, this means that every vertex is claimed by
    /// exactly one of its two adjoining segments, and so a crossing at a
    /// vertex is only reported once.
    ///
    /// The computation is symmetric: `other.crossing(self)` returns exactly
    /// the swapped pair.
    pub fn crossing(&self, other: &Segment) -> Option<(f64, f64)> {
        let r = self.p1.to(self.p2);
        let s = other.p1.to(other.p2);
        let denom = r.cross(s);
        if denom == 0.0 {
            return None;
        }

        let qp = self.p1.to(other.p1);
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        let unit = 0.0..1.0;
        (unit.contains(&t) && unit.contains(&u)).then_some((t, u))
    }

    /// The smallest axis-aligned rectangle containing this segment.
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p1.to_kurbo(), self.p2.to_kurbo())
    }

    /// The same segment, traversed in the other direction.
    pub fn reversed(&self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    /// Do the two segments point along exactly parallel lines?
    pub fn is_parallel(&self, other: &Segment) -> bool {
        self.p1.to(self.p2).cross(other.p1.to(other.p2)) == 0.0
    }

    /// If `p` lies on this segment, strictly between its endpoints, returns
    /// its parameter along the segment.
    ///
    /// This is how collinear overlaps get split: [`Segment::crossing`]
    /// ignores parallel segments, so an endpoint of one that lies inside the
    /// other has to be found separately.
    pub fn interior_parameter(&self, p: Point) -> Option<f64> {
        let d = self.p1.to(self.p2);
        let v = self.p1.to(p);
        if v.cross(d) != 0.0 {
            return None;
        }
        let t = v.dot(d) / d.dot(d);
        (t > 0.0 && t < 1.0).then_some(t)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    impl Reasonable for Point {
        type Strategy = BoxedStrategy<Point>;

        fn reasonable() -> Self::Strategy {
            <(f64, f64)>::reasonable()
                .prop_map(|(x, y)| Point::new(x, y))
                .boxed()
        }
    }

    impl Reasonable for Segment {
        type Strategy = BoxedStrategy<Segment>;

        fn reasonable() -> Self::Strategy {
            (Point::reasonable(), Point::reasonable())
                .prop_map(|(p1, p2)| Segment::new(p1, p2))
                .boxed()
        }
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn points_sort_by_x_first() {
        let mut ps = vec![p(1.0, 0.0), p(0.0, 5.0), p(0.0, -1.0)];
        ps.sort();
        assert_eq!(ps, vec![p(0.0, -1.0), p(0.0, 5.0), p(1.0, 0.0)]);
    }

    #[test]
    fn position() {
        let s = Segment::new(p(0.0, 0.0), p(2.0, 4.0));
        assert_eq!(s.position(0.0), p(0.0, 0.0));
        assert_eq!(s.position(0.5), p(1.0, 2.0));
        assert_eq!(s.position(1.0), p(2.0, 4.0));
    }

    #[test]
    fn crossing_in_the_middle() {
        let s = Segment::new(p(0.0, 0.0), p(2.0, 2.0));
        let t = Segment::new(p(0.0, 2.0), p(2.0, 0.0));
        assert_eq!(s.crossing(&t), Some((0.5, 0.5)));
        assert_eq!(s.parameter(&t), Some(0.5));
    }

    #[test]
    fn parallel_segments_dont_cross() {
        let s = Segment::new(p(0.0, 0.0), p(2.0, 0.0));
        let t = Segment::new(p(0.0, 1.0), p(2.0, 1.0));
        assert_eq!(s.crossing(&t), None);

        // Collinear overlaps are parallel too.
        let t = Segment::new(p(1.0, 0.0), p(3.0, 0.0));
        assert_eq!(s.crossing(&t), None);
    }

    #[test]
    fn collinear_endpoints() {
        let s = Segment::new(p(0.0, 0.0), p(4.0, 0.0));
        let t = Segment::new(p(1.0, 0.0), p(6.0, 0.0));
        assert!(s.is_parallel(&t));
        assert!(s.is_parallel(&t.reversed()));
        assert_eq!(s.interior_parameter(t.p1), Some(0.25));
        assert_eq!(t.interior_parameter(s.p1), None);
        assert_eq!(s.interior_parameter(s.p1), None);
        assert_eq!(s.interior_parameter(s.p2), None);
        assert_eq!(s.interior_parameter(p(1.0, 1.0)), None);

        let slanted = Segment::new(p(0.0, 0.0), p(3.0, 1.0));
        assert_eq!(slanted.interior_parameter(p(1.5, 0.5)), Some(0.5));
        assert!(!slanted.is_parallel(&s));
    }

    #[test]
    fn crossing_out_of_range() {
        let s = Segment::new(p(0.0, 0.0), p(1.0, 0.0));
        let t = Segment::new(p(2.0, -1.0), p(2.0, 1.0));
        assert_eq!(s.crossing(&t), None);
        assert_eq!(t.crossing(&s), None);
    }

    #[test]
    fn endpoints_are_half_open() {
        // `t` starts on the interior of `s`: that counts.
        let s = Segment::new(p(0.0, 0.0), p(2.0, 0.0));
        let t = Segment::new(p(1.0, 0.0), p(1.0, 1.0));
        assert_eq!(s.crossing(&t), Some((0.5, 0.0)));

        // `t` ends on the interior of `s`: that doesn't.
        let t = t.reversed();
        assert_eq!(s.crossing(&t), None);
    }

    #[test]
    fn shared_vertex_is_claimed_once() {
        // Two consecutive edges of one ring, meeting another ring's edge
        // exactly at their shared vertex.
        let first = Segment::new(p(0.0, 0.0), p(1.0, 1.0));
        let second = Segment::new(p(1.0, 1.0), p(2.0, 0.0));
        let other = Segment::new(p(1.0, 0.0), p(1.0, 2.0));

        assert_eq!(first.crossing(&other), None);
        assert_eq!(second.crossing(&other), Some((0.0, 0.5)));
    }

    #[test]
    fn turns() {
        assert!(turn(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)) > 0.0);
        assert!(turn(p(0.0, 0.0), p(1.0, 0.0), p(1.0, -1.0)) < 0.0);
        assert_eq!(turn(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)), 0.0);
    }

    #[test]
    fn cyclic() {
        let xs = [1, 2, 3];
        let pairs: Vec<_> = cyclic_pairs(&xs).map(|(a, b)| (*a, *b)).collect();
        assert_eq!(pairs, [(1, 2), (2, 3), (3, 1)]);
        assert_eq!(cyclic_pairs::<i32>(&[]).count(), 0);
    }

    proptest! {
        #[test]
        fn crossing_is_symmetric(s in Segment::reasonable(), t in Segment::reasonable()) {
            let forward = s.crossing(&t);
            let backward = t.crossing(&s).map(|(u, t)| (t, u));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn crossing_lies_on_both(s in Segment::reasonable(), t in Segment::reasonable()) {
            if let Some((ts, tt)) = s.crossing(&t) {
                let a = s.position(ts);
                let b = t.position(tt);
                let scale = 1.0 + a.x.abs().max(a.y.abs());
                prop_assert!((a.x - b.x).abs() <= 1e-6 * scale);
                prop_assert!((a.y - b.y).abs() <= 1e-6 * scale);
            }
        }
    }
}
