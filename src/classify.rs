//! Orientation and extent of traced rings.
//!
//! Rings here are open: the first point is *not* repeated at the end. (The
//! signed area doesn't care either way, since a repeated point contributes
//! nothing.)

use crate::geom::{cyclic_pairs, turn, Point};

/// The extreme vertices of a ring, as indices into its points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Extremes {
    /// The leftmost vertex, with ties broken by taking the lowest one.
    ///
    /// If a point is repeated (which happens when a ring touches itself), this
    /// is its first occurrence.
    pub leftmost: usize,
    /// The last vertex at which the ring reaches its maximal `x` coordinate.
    ///
    /// The ring is "active" for the nesting sweep while the sweep line is
    /// between the `x` coordinates of these two vertices.
    pub rightmost: usize,
}

/// The winding direction of a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Orientation {
    /// Counter-clockwise, enclosing positive area.
    Positive,
    /// Clockwise, enclosing negative area (a hole).
    Negative,
    /// The ring encloses no area at all, and so it has no meaningful
    /// orientation.
    Degenerate,
}

impl Orientation {
    /// The change in depth when crossing into this ring.
    pub fn sign(self) -> i32 {
        match self {
            Orientation::Positive => 1,
            Orientation::Negative => -1,
            Orientation::Degenerate => 0,
        }
    }

    fn from_sign(x: f64) -> Self {
        if x > 0.0 {
            Orientation::Positive
        } else if x < 0.0 {
            Orientation::Negative
        } else {
            Orientation::Degenerate
        }
    }
}

/// Finds the leftmost and rightmost vertices of `ring`.
///
/// Returns `None` if the ring is empty.
pub fn extreme_points(ring: &[Point]) -> Option<Extremes> {
    let first = ring.first()?;
    let mut leftmost = (0, first);
    let mut rightmost = (0, first);
    for (i, p) in ring.iter().enumerate().skip(1) {
        if p < leftmost.1 {
            leftmost = (i, p);
        }
        if p.x >= rightmost.1.x {
            rightmost = (i, p);
        }
    }
    Some(Extremes {
        leftmost: leftmost.0,
        rightmost: rightmost.0,
    })
}

/// The signed area enclosed by `ring`: positive if it winds counter-clockwise.
pub fn signed_area(ring: &[Point]) -> f64 {
    cyclic_pairs(ring)
        .map(|(p, q)| p.x * q.y - q.x * p.y)
        .sum::<f64>()
        / 2.0
}

/// Determines the orientation of `ring` from the turn it makes at its leftmost vertex.
///
/// The leftmost vertex is always a convex corner, so the direction of the turn
/// there agrees with the sign of the enclosed area. If the turn is exactly zero
/// (which only happens if the ring doubles back on itself at that vertex) we fall
/// back to the signed area, and call the ring degenerate if that's zero too.
pub fn ring_orientation(ring: &[Point], leftmost: usize) -> Orientation {
    if ring.len() < 3 {
        return Orientation::Degenerate;
    }
    let prev = ring[(leftmost + ring.len() - 1) % ring.len()];
    let next = ring[(leftmost + 1) % ring.len()];
    let local = turn(prev, ring[leftmost], next);
    if local != 0.0 {
        Orientation::from_sign(local)
    } else {
        Orientation::from_sign(signed_area(ring))
    }
}

/// Is `ring` counter-clockwise?
///
/// `leftmost` should be the index computed by [`extreme_points`].
pub fn is_positive_ring(ring: &[Point], leftmost: usize) -> bool {
    ring_orientation(ring, leftmost) == Orientation::Positive
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn ccw_square() -> Vec<Point> {
        vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)]
    }

    #[test]
    fn extremes() {
        let sq = ccw_square();
        assert_eq!(
            extreme_points(&sq),
            Some(Extremes {
                leftmost: 3,
                rightmost: 1
            })
        );
        assert_eq!(extreme_points(&[]), None);
    }

    #[test]
    fn repeated_leftmost_takes_first() {
        // A ring that touches itself at (0, 0).
        let ring = [
            p(0.0, 0.0),
            p(1.0, -1.0),
            p(1.0, 0.0),
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
        ];
        assert_eq!(extreme_points(&ring).map(|e| e.leftmost), Some(0));
    }

    #[test]
    fn orientation() {
        let sq = ccw_square();
        let left = extreme_points(&sq).map_or(0, |e| e.leftmost);
        assert_eq!(ring_orientation(&sq, left), Orientation::Positive);
        assert!(is_positive_ring(&sq, left));
        assert_eq!(signed_area(&sq), 1.0);

        let rev: Vec<_> = sq.iter().rev().copied().collect();
        let left = extreme_points(&rev).map_or(0, |e| e.leftmost);
        assert_eq!(ring_orientation(&rev, left), Orientation::Negative);
        assert!(!is_positive_ring(&rev, left));
        assert_eq!(signed_area(&rev), -1.0);
    }

    #[test]
    fn concave_ring_agrees_with_area() {
        // An arrow pointing left, with a reflex vertex at (2, 1).
        let ring = [
            p(0.0, 1.0),
            p(3.0, 0.0),
            p(2.0, 1.0),
            p(3.0, 2.0),
        ];
        let left = extreme_points(&ring).map_or(0, |e| e.leftmost);
        assert_eq!(left, 0);
        assert!(signed_area(&ring) > 0.0);
        assert_eq!(ring_orientation(&ring, left), Orientation::Positive);
    }

    #[test]
    fn degenerate_rings() {
        // Back and forth along a single edge.
        let sliver = [p(1.0, 0.0), p(1.0, 1.0)];
        assert_eq!(ring_orientation(&sliver, 0), Orientation::Degenerate);

        let flat = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 0.0)];
        assert_eq!(ring_orientation(&flat, 0), Orientation::Degenerate);
        assert_eq!(Orientation::Degenerate.sign(), 0);
    }
}
