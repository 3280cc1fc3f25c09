//! Polygons, and checking that they're fit for intersecting.

use std::borrow::Cow;

use kurbo::{BezPath, Rect};

use crate::{classify::signed_area, geom::Point, Error};

/// Which of the two inputs of an intersection we're talking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Input {
    /// The first argument.
    A,
    /// The second argument.
    B,
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::A => write!(f, "first input"),
            Input::B => write!(f, "second input"),
        }
    }
}

/// Identifies a ring in one of the inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RingLocation {
    /// Which input the ring is in.
    pub input: Input,
    /// The index of the polygon containing the ring.
    pub polygon: usize,
    /// The index of the ring within its polygon (0 is the exterior).
    pub ring: usize,
}

impl std::fmt::Display for RingLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ring {} of polygon {} in the {}",
            self.ring, self.polygon, self.input
        )
    }
}

/// A polygon, possibly with holes.
///
/// The first ring is the exterior, and the rest are holes. Every ring is
/// closed: its first point is repeated at the end.
///
/// Polygons produced by this crate have counter-clockwise exteriors and
/// clockwise holes, and each ring starts at its leftmost point.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    /// The rings making up the boundary.
    pub rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon from its rings.
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        Polygon { rings }
    }

    /// The outer boundary, if there is one.
    pub fn exterior(&self) -> Option<&[Point]> {
        self.rings.first().map(|r| r.as_slice())
    }

    /// The holes.
    pub fn holes(&self) -> &[Vec<Point>] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// The enclosed area.
    ///
    /// This is the sum of the signed areas of the rings, so if the rings are
    /// oriented the usual way then the holes are subtracted.
    pub fn area(&self) -> f64 {
        self.rings.iter().map(|r| signed_area(r)).sum()
    }

    /// Is `p` inside this polygon?
    ///
    /// This uses the even-odd rule over all the rings. Points exactly on the
    /// boundary might go either way.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            for pair in ring.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                    if x > p.x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    /// The smallest rectangle containing all the points, or `None` if there
    /// aren't any.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut points = self.rings.iter().flatten().map(|p| p.to_kurbo());
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |rect, p| {
            rect.union_pt(p)
        }))
    }

    /// Converts to a path, with one closed subpath per ring.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        for ring in &self.rings {
            let Some((first, rest)) = ring.split_first() else {
                continue;
            };
            ret.move_to(first.to_kurbo());
            // The closing segment is implied by `close_path`.
            let rest = rest.strip_suffix(&[*first]).unwrap_or(rest);
            for p in rest {
                ret.line_to(p.to_kurbo());
            }
            ret.close_path();
        }
        ret
    }

    /// Converts to nested coordinate arrays: one array per ring, one
    /// `[x, y]` array per point.
    pub fn to_coordinates(&self) -> Vec<Vec<Vec<f64>>> {
        self.rings
            .iter()
            .map(|r| r.iter().map(|p| vec![p.x, p.y]).collect())
            .collect()
    }

    /// Parses nested coordinate arrays.
    ///
    /// Each position must have two or three coordinates; a third coordinate is
    /// ignored. `input` and `polygon` are only used for error reporting.
    pub fn from_coordinates(
        coords: &[Vec<Vec<f64>>],
        input: Input,
        polygon: usize,
    ) -> Result<Self, Error> {
        let rings = coords
            .iter()
            .enumerate()
            .map(|(ring, positions)| {
                let location = RingLocation {
                    input,
                    polygon,
                    ring,
                };
                positions
                    .iter()
                    .map(|pos| match pos.as_slice() {
                        [x, y] | [x, y, _] => Ok(Point::new(*x, *y)),
                        _ => Err(Error::BadPosition {
                            location,
                            len: pos.len(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon { rings })
    }
}

impl From<Vec<Vec<Point>>> for Polygon {
    fn from(rings: Vec<Vec<Point>>) -> Self {
        Polygon { rings }
    }
}

/// The largest coordinate magnitude that inputs may have.
///
/// Crossing and orientation tests multiply differences of coordinates
/// together, and those products must stay finite.
pub const MAX_COORDINATE: f64 = 1e150;

fn check_ring(ring: &[Point], location: RingLocation) -> Result<(), Error> {
    for p in ring {
        if p.x.is_nan() || p.y.is_nan() {
            return Err(Error::NaN(location));
        }
        if p.x.is_infinite() || p.y.is_infinite() {
            return Err(Error::Infinity(location));
        }
        if p.x.abs() > MAX_COORDINATE || p.y.abs() > MAX_COORDINATE {
            return Err(Error::TooLarge(location));
        }
    }

    let (Some(first), Some(last)) = (ring.first(), ring.last()) else {
        return Err(Error::TooFewVertices {
            location,
            distinct: 0,
        });
    };
    if first != last {
        return Err(Error::UnclosedRing(location));
    }

    let mut distinct = ring[..ring.len() - 1].to_vec();
    distinct.sort();
    distinct.dedup();
    if distinct.len() < 3 {
        return Err(Error::TooFewVertices {
            location,
            distinct: distinct.len(),
        });
    }
    Ok(())
}

/// Checks that a collection of polygons is well-formed.
///
/// Every polygon must have at least one ring, and every ring must be closed,
/// have finite coordinates no bigger than [`MAX_COORDINATE`], and have at
/// least three distinct vertices.
/// Whether the rings are simple, or whether different polygons overlap, is
/// not checked.
pub fn validate(input: Input, polygons: &[Polygon]) -> Result<(), Error> {
    for (polygon, poly) in polygons.iter().enumerate() {
        if poly.rings.is_empty() {
            return Err(Error::EmptyPolygon { input, polygon });
        }
        for (ring, points) in poly.rings.iter().enumerate() {
            check_ring(
                points,
                RingLocation {
                    input,
                    polygon,
                    ring,
                },
            )?;
        }
    }
    Ok(())
}

/// Winds a closed ring counter-clockwise if it's an exterior, or clockwise if
/// it's a hole.
///
/// Rings that are already wound correctly, or that have no area, are
/// borrowed unchanged.
pub fn oriented_ring(ring: &[Point], exterior: bool) -> Cow<'_, [Point]> {
    let area = signed_area(ring);
    if (exterior && area < 0.0) || (!exterior && area > 0.0) {
        Cow::Owned(ring.iter().rev().copied().collect())
    } else {
        Cow::Borrowed(ring)
    }
}
