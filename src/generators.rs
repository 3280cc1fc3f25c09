//! Utilities for generating benchmarks and test cases.
//!
//! Every generator returns its polygons with counter-clockwise exteriors and
//! clockwise holes, and no two polygons in one collection overlap.

use crate::{Point, Polygon};

fn closed(mut ring: Vec<Point>) -> Vec<Point> {
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Generate a bunch of squares, arranged in a `count` by `count` grid.
///
/// The bottom-left of the first square is at (x0, y0). Each square has size
/// `size x size`, and the distance between squares (both horizontally and
/// vertically) is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated up by `slant`.
pub fn squares(
    (x0, y0): (f64, f64),
    size: f64,
    offset: f64,
    slant: f64,
    count: usize,
) -> Vec<Polygon> {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            ret.push(Polygon::new(vec![closed(vec![
                Point::new(x, y),
                Point::new(x + size, y + slant),
                Point::new(x + size, y + size + slant),
                Point::new(x, y + size),
            ])]));
        }
    }
    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares. Their intersection is `4 (n - 1)^2` small squares.
pub fn checkerboard(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 0.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
pub fn slanted_checkerboard(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 1.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from bottom-left
/// to top-right. The "odds" go from bottom-right to top-left.
///
/// Every even crosses every odd, so this has lots of crossings but not many
/// edges.
pub fn slanties(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    let h = 20.0 * n as f64;

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for i in 0..n {
        let x_off = 20.0 * i as f64;
        even.push(Polygon::new(vec![closed(vec![
            Point::new(x_off, 0.0),
            Point::new(x_off + 10.0, 0.0),
            Point::new(x_off + h + 10.0, h),
            Point::new(x_off + h, h),
        ])]));

        odd.push(Polygon::new(vec![closed(vec![
            Point::new(x_off + h, 0.0),
            Point::new(x_off + h + 10.0, 0.0),
            Point::new(x_off + 10.0, h),
            Point::new(x_off, h),
        ])]));
    }

    (even, odd)
}

/// Generate an `n` by `n` grid of square frames: squares of size 30 with a
/// square hole of size 10 in the middle, spaced 40 apart.
///
/// Intersecting this with [`checkerboard`] gives polygons with holes in them.
pub fn frames(n: usize) -> Vec<Polygon> {
    let mut ret = squares((0.0, 0.0), 30.0, 40.0, 0.0, n);
    let holes = squares((10.0, 10.0), 10.0, 40.0, 0.0, n);
    for (poly, hole) in ret.iter_mut().zip(holes) {
        poly.rings
            .extend(hole.rings.into_iter().map(|mut r| {
                r.reverse();
                r
            }));
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection;

    fn total_area(polys: &[Polygon]) -> f64 {
        polys.iter().map(|p| p.area()).sum()
    }

    #[test]
    fn checkerboard_intersection() {
        let (a, b) = checkerboard(3);
        assert_eq!(a.len(), 9);
        assert_eq!(b.len(), 4);

        let out = intersection(&a, &b).unwrap();
        assert_eq!(out.len(), 16);
        assert!((total_area(&out) - 1600.0).abs() < 1e-9);
        assert_eq!(
            out[0].rings,
            [vec![
                Point::new(20.0, 20.0),
                Point::new(30.0, 20.0),
                Point::new(30.0, 30.0),
                Point::new(20.0, 30.0),
                Point::new(20.0, 20.0),
            ]]
        );
    }

    #[test]
    fn generated_orientation() {
        let (even, odd) = slanties(4);
        assert!(even.iter().chain(&odd).all(|p| p.area() > 0.0));
        let (a, _) = slanted_checkerboard(2);
        assert!(a.iter().all(|p| p.area() > 0.0));
        assert!(frames(2).iter().all(|p| p.area() == 800.0));
    }

    #[test]
    fn frames_keep_their_holes() {
        // A big rectangle covering the first frame entirely, and a strip of
        // the third one (without reaching its hole).
        let big = Polygon::new(vec![closed(vec![
            Point::new(-5.0, -5.0),
            Point::new(45.0, -5.0),
            Point::new(45.0, 35.0),
            Point::new(-5.0, 35.0),
        ])]);
        let out = intersection(&frames(2), &[big]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].holes().len(), 1);
        assert_eq!(out[0].area(), 800.0);
        assert!(out[1].holes().is_empty());
        assert!((out[1].area() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn slanties_intersection() {
        let (even, odd) = slanties(4);
        let out = intersection(&even, &odd).unwrap();
        assert_eq!(out.len(), 16);
        assert!((total_area(&out) - 800.0).abs() < 1e-9);
    }
}
