#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod arrangement;
pub mod classify;
mod geom;
pub mod nesting;
mod num;
mod polygon;
mod segments;

#[cfg(any(test, feature = "generators"))]
pub mod generators;

use std::borrow::Cow;

pub use arrangement::{IntersectionGraph, TracedRing};
pub use classify::{extreme_points, is_positive_ring, ring_orientation, Orientation};
pub use geom::{Point, Segment};
pub use nesting::{nest_rings, Nesting};
pub use num::CheapOrderedFloat;
pub use polygon::{oriented_ring, validate, Input, Polygon, RingLocation, MAX_COORDINATE};
pub use segments::{ring_to_segments, segments_to_ring, SegIdx, Segments};

/// The input polygons were faulty.
///
/// These are only the problems that are cheap to detect. In particular,
/// self-intersecting rings and overlapping polygons within one input are not
/// reported: they just produce garbage.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A ring had an infinite coordinate.
    #[error("{0} has an infinite coordinate")]
    Infinity(RingLocation),
    /// A ring had a coordinate that was not a number.
    #[error("{0} has a NaN coordinate")]
    NaN(RingLocation),
    /// A ring had a coordinate bigger than [`MAX_COORDINATE`] in magnitude.
    #[error("{0} has a coordinate beyond {max:e} in magnitude", max = MAX_COORDINATE)]
    TooLarge(RingLocation),
    /// A ring's last point was different from its first point.
    #[error("{0} isn't closed")]
    UnclosedRing(RingLocation),
    /// A ring didn't have enough distinct vertices to enclose anything.
    #[error("{location} has {distinct} distinct vertices, but needs at least 3")]
    TooFewVertices {
        /// The offending ring.
        location: RingLocation,
        /// How many distinct vertices it had.
        distinct: usize,
    },
    /// A polygon didn't have any rings.
    #[error("polygon {polygon} in the {input} has no rings")]
    EmptyPolygon {
        /// The input containing the polygon.
        input: Input,
        /// The index of the polygon.
        polygon: usize,
    },
    /// A position didn't have two or three coordinates.
    #[error("{location} has a position with {len} coordinates")]
    BadPosition {
        /// The ring containing the position.
        location: RingLocation,
        /// The number of coordinates in the position.
        len: usize,
    },
}

/// Knobs for tweaking an intersection.
///
/// The defaults are what you want, unless you know something about your
/// inputs that we don't.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    /// Skip crossing tests between edges whose bounding boxes are disjoint.
    ///
    /// This doesn't change the output.
    pub edge_prefilter: bool,
    /// Re-wind the input rings so that exteriors are counter-clockwise and
    /// holes are clockwise.
    ///
    /// If this is turned off, the inputs must already be wound that way.
    pub normalize_orientation: bool,
    /// Check that the inputs are well-formed before doing anything.
    ///
    /// If this is turned off and the inputs have non-finite coordinates, we
    /// might panic.
    pub validate: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            edge_prefilter: true,
            normalize_orientation: true,
            validate: true,
        }
    }
}

/// Computes the intersection of two collections of polygons.
///
/// Within each collection, the polygons should have simple rings and must not
/// overlap one another. The output polygons have counter-clockwise exteriors
/// and clockwise holes.
///
/// This is [`intersection_with`], using the default [`Options`].
pub fn intersection(a: &[Polygon], b: &[Polygon]) -> Result<Vec<Polygon>, Error> {
    intersection_with(a, b, &Options::default())
}

/// Computes the intersection of two collections of polygons, with some
/// options.
///
/// See [`intersection`].
pub fn intersection_with(
    a: &[Polygon],
    b: &[Polygon],
    opts: &Options,
) -> Result<Vec<Polygon>, Error> {
    if opts.validate {
        validate(Input::A, a)?;
        validate(Input::B, b)?;
    }

    let ring_count: usize = a.iter().chain(b).map(|p| p.rings.len()).sum();
    if a.is_empty() || b.is_empty() || ring_count <= 1 {
        log::debug!(
            "nothing to intersect ({} and {} polygons, {ring_count} rings)",
            a.len(),
            b.len()
        );
        return Ok(Vec::new());
    }

    let rings: Vec<Cow<'_, [Point]>> = a
        .iter()
        .chain(b)
        .flat_map(|poly| {
            poly.rings.iter().enumerate().map(move |(i, ring)| {
                if opts.normalize_orientation {
                    oriented_ring(ring, i == 0)
                } else {
                    Cow::Borrowed(ring.as_slice())
                }
            })
        })
        .collect();

    let segs = Segments::from_rings(rings.iter().map(|r| r.as_ref()));
    let graph = IntersectionGraph::new(&segs, opts.edge_prefilter);
    let traced: Vec<Vec<Point>> = graph
        .trace_rings()
        .iter()
        .map(|r| graph.ring_to_positions(r))
        .collect();
    let ret = nest_rings(&traced).polygons(&traced);

    log::debug!(
        "{} edges, {} crossings, {} traced rings, {} output polygons",
        segs.len(),
        graph.crossing_count(),
        traced.len(),
        ret.len()
    );
    Ok(ret)
}

/// Computes the intersection of two collections of polygons, given as nested
/// coordinate arrays.
///
/// Each polygon is an array of rings, each ring is an array of positions, and
/// each position is an array of two or three coordinates. Third coordinates
/// are ignored.
pub fn intersect_coordinates(
    a: &[Vec<Vec<Vec<f64>>>],
    b: &[Vec<Vec<Vec<f64>>>],
) -> Result<Vec<Polygon>, Error> {
    let parse = |input, coords: &[Vec<Vec<Vec<f64>>>]| {
        coords
            .iter()
            .enumerate()
            .map(|(i, poly)| Polygon::from_coordinates(poly, input, i))
            .collect::<Result<Vec<_>, _>>()
    };
    intersection(&parse(Input::A, a)?, &parse(Input::B, b)?)
}
