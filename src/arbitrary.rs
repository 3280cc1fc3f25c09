//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! The generated polygons are star-shaped, which makes them simple by
//! construction, and a collection of them never overlaps itself.

use std::f64::consts::TAU;

use arbitrary::Unstructured;

use crate::{Point, Polygon};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a closed, counter-clockwise, star-shaped ring around `center`.
///
/// The vertices are at evenly spaced angles (starting from a random one), and
/// each one is at a random distance from the center between `min_radius` and
/// `max_radius`.
pub fn star_ring(
    center: Point,
    vertices: usize,
    min_radius: f64,
    max_radius: f64,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Point>, arbitrary::Error> {
    let rotation = float_in_range(0.0, TAU, u)?;
    let mut ret = Vec::with_capacity(vertices + 1);
    for i in 0..vertices {
        let angle = rotation + TAU * i as f64 / vertices as f64;
        let r = float_in_range(min_radius, max_radius, u)?;
        ret.push(Point::new(
            center.x + r * angle.cos(),
            center.y + r * angle.sin(),
        ));
    }
    if let Some(&first) = ret.first() {
        ret.push(first);
    }
    Ok(ret)
}

/// Generate a star-shaped polygon around `center`, possibly with a hole.
///
/// The exterior stays within distance 2 of the center. Each ring has a chance
/// to be wound the wrong way around.
pub fn star_polygon(center: Point, u: &mut Unstructured<'_>) -> Result<Polygon, arbitrary::Error> {
    // With at least 4 vertices at distance 1 or more, the exterior stays
    // further than 0.7 from the center, so the hole fits inside.
    let vertices = u.int_in_range(4..=9)?;
    let mut rings = vec![star_ring(center, vertices, 1.0, 2.0, u)?];
    if u.arbitrary()? {
        let vertices = u.int_in_range(3..=6)?;
        let mut hole = star_ring(center, vertices, 0.2, 0.45, u)?;
        hole.reverse();
        rings.push(hole);
    }
    for ring in &mut rings {
        if u.arbitrary()? {
            ring.reverse();
        }
    }
    Ok(Polygon::new(rings))
}

/// Generate between one and three star-shaped polygons in a row, starting
/// near `origin`.
pub fn polygon_set(
    origin: Point,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Polygon>, arbitrary::Error> {
    let count = u.int_in_range(1..=3)?;
    (0..count)
        .map(|i| {
            let center = Point::new(
                origin.x + 5.0 * i as f64 + float_in_range(-0.25, 0.25, u)?,
                origin.y + float_in_range(-0.25, 0.25, u)?,
            );
            star_polygon(center, u)
        })
        .collect()
}

/// Generate two sets of polygons, with the second one shifted by up to 3 in
/// each direction so that they probably overlap.
pub fn polygon_pair(
    u: &mut Unstructured<'_>,
) -> Result<(Vec<Polygon>, Vec<Polygon>), arbitrary::Error> {
    let a = polygon_set(Point::new(0.0, 0.0), u)?;
    let shift = Point::new(float_in_range(-3.0, 3.0, u)?, float_in_range(-3.0, 3.0, u)?);
    let b = polygon_set(shift, u)?;
    Ok((a, b))
}

/// The area covered by a set of polygons, regardless of how their rings are
/// wound.
pub fn unsigned_area(polys: &[Polygon]) -> f64 {
    polys
        .iter()
        .map(|p| {
            let exterior = p.exterior().map_or(0.0, |r| crate::classify::signed_area(r).abs());
            let holes: f64 = p
                .holes()
                .iter()
                .map(|r| crate::classify::signed_area(r).abs())
                .sum();
            exterior - holes
        })
        .sum()
}

/// Property checks, driven by an [`Unstructured`].
///
/// These are shared between the unit tests (through `arbtest`) and the fuzz
/// targets. They panic if the property fails.
pub mod arbtests {
    use arbitrary::Unstructured;

    use super::{float_in_range, polygon_pair, polygon_set, unsigned_area};
    use crate::{intersection, Point, Polygon};

    fn intersect(a: &[Polygon], b: &[Polygon]) -> Vec<Polygon> {
        match intersection(a, b) {
            Ok(out) => out,
            Err(e) => panic!("generated an invalid input: {e}"),
        }
    }

    fn sorted_rings(polys: Vec<Polygon>) -> Vec<Vec<Point>> {
        let mut ret: Vec<_> = polys.into_iter().flat_map(|p| p.rings).collect();
        ret.sort();
        ret
    }

    /// Swapping the inputs produces exactly the same rings.
    pub fn commutes(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let (a, b) = polygon_pair(u)?;
        let ab = sorted_rings(intersect(&a, &b));
        let ba = sorted_rings(intersect(&b, &a));
        assert_eq!(ab, ba);
        Ok(())
    }

    /// A point is in the output if and only if it's in both inputs.
    pub fn membership(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let (a, b) = polygon_pair(u)?;
        let out = intersect(&a, &b);
        let inside = |polys: &[Polygon], p: Point| polys.iter().any(|poly| poly.contains(p));

        for _ in 0..32 {
            let p = Point::new(float_in_range(-3.0, 16.0, u)?, float_in_range(-6.0, 6.0, u)?);
            assert_eq!(
                inside(&out, p),
                inside(&a, p) && inside(&b, p),
                "{p:?}, in {a:?} and {b:?}"
            );
        }
        Ok(())
    }

    /// The output is never bigger than either input.
    pub fn shrinks(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let (a, b) = polygon_pair(u)?;
        let out = intersect(&a, &b);
        let bound = unsigned_area(&a).min(unsigned_area(&b));
        let area: f64 = out.iter().map(|p| p.area()).sum();
        assert!(area >= 0.0);
        assert!(area <= bound + 1e-9, "{area} > {bound}");
        Ok(())
    }

    /// Intersecting with yourself changes nothing.
    pub fn identity(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let a = polygon_set(Point::new(0.0, 0.0), u)?;
        let out = intersect(&a, &a);
        assert_eq!(out.len(), a.len());
        assert_eq!(
            out.iter().map(|p| p.rings.len()).sum::<usize>(),
            a.iter().map(|p| p.rings.len()).sum::<usize>()
        );
        let area: f64 = out.iter().map(|p| p.area()).sum();
        assert!((area - unsigned_area(&a)).abs() <= 1e-9);
        Ok(())
    }

    /// Polygons that are far apart don't intersect.
    pub fn disjoint(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let a = polygon_set(Point::new(0.0, 0.0), u)?;
        let b = polygon_set(Point::new(float_in_range(-10.0, 10.0, u)?, 10.0), u)?;
        assert!(intersect(&a, &b).is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_polygons_are_valid() {
        arbtest::arbtest(|u| {
            let (a, b) = polygon_pair(u)?;
            assert!(crate::validate(crate::Input::A, &a).is_ok());
            assert!(crate::validate(crate::Input::B, &b).is_ok());
            assert!(unsigned_area(&a) > 0.0);
            Ok(())
        });
    }

    #[test]
    fn commutes() {
        arbtest::arbtest(arbtests::commutes);
    }

    #[test]
    fn membership() {
        arbtest::arbtest(arbtests::membership);
    }

    #[test]
    fn shrinks() {
        arbtest::arbtest(arbtests::shrinks);
    }

    #[test]
    fn identity() {
        arbtest::arbtest(arbtests::identity);
    }

    #[test]
    fn disjoint() {
        arbtest::arbtest(arbtests::disjoint);
    }
}
