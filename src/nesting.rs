//! Sweeping traced rings to find out how they nest.
//!
//! The rings coming out of the arrangement don't cross one another, so they
//! form a forest under containment. We recover that forest by sweeping a
//! vertical line from left to right: when the line first touches a ring, the
//! ring's immediate parent is the nearest ring to its right among those that
//! the sweep line currently intersects.
//!
//! Each ring also gets a depth, which counts (with sign) the boundaries that
//! enclose it. In an overlay of two valid polygon sets, the depth of a face
//! is the number of sets that cover it.
//!
//! The nearest ring is measured from a point just inside the new ring, next
//! to its leftmost vertex rather than at it: when rings touch, that vertex is
//! often on the parent's boundary too.

use std::cmp::Reverse;

use crate::{
    classify::{extreme_points, ring_orientation, signed_area, Extremes, Orientation},
    geom::{cyclic_pairs, Point},
    num::CheapOrderedFloat,
    Polygon,
};

/// The result of the nesting sweep.
///
/// All of the vectors in here are indexed by ring, in the order that the
/// rings were passed to [`nest_rings`].
#[derive(Clone, Debug, PartialEq)]
pub struct Nesting {
    /// The order in which the sweep visited the rings: sorted by leftmost
    /// point, then from the largest area to the smallest, and then by index.
    pub order: Vec<usize>,
    /// The extreme points of each ring, or `None` if the ring was empty.
    pub extremes: Vec<Option<Extremes>>,
    /// The orientation of each ring.
    pub orientation: Vec<Orientation>,
    /// The innermost ring containing each ring.
    ///
    /// Degenerate rings are never parents, and never have parents.
    pub parent: Vec<Option<usize>>,
    /// The depth of the area just inside each ring.
    pub depth: Vec<i32>,
}

// A point just inside a ring, close to its leftmost vertex.
//
// We take the midpoint of the edge leaving the leftmost vertex and push it
// (infinitesimally) towards the ring's interior. Since the leftmost vertex is
// convex, the interior is above that edge for a counter-clockwise ring and
// below it for a clockwise one.
struct Probe {
    point: Point,
    edge: (Point, Point),
    // +1.0 if we're infinitesimally above `point`, -1.0 if below.
    nudge: f64,
}

impl Probe {
    fn new(ring: &[Point], leftmost: usize, orientation: Orientation) -> Self {
        let a = ring[leftmost];
        let b = ring[(leftmost + 1) % ring.len()];
        Probe {
            point: a.midpoint(&b),
            edge: (a, b),
            nudge: if orientation == Orientation::Positive {
                1.0
            } else {
                -1.0
            },
        }
    }

    fn is_own_edge(&self, a: Point, b: Point) -> bool {
        (a, b) == self.edge || (b, a) == self.edge
    }
}

// Where a rightward horizontal ray from the probe first hits a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hit {
    // The horizontal distance to the hit, and then the inverse slope of the
    // edge that was hit (as seen from the nudged side). Smaller is nearer.
    key: (CheapOrderedFloat, CheapOrderedFloat),
    // Is the probe inside the ring?
    inside: bool,
}

// Shoots a ray from the probe towards positive `x` and returns the first edge
// of `ring` that it hits.
//
// The probe is nudged vertically, so an edge spans the ray if its endpoints
// are on different sides of the nudged point. Hits at distance zero only
// count if the edge leans away from us on the nudged side.
fn ray_hit(ring: &[Point], positive: bool, probe: &Probe) -> Option<Hit> {
    let m = probe.point;
    let mut best: Option<((CheapOrderedFloat, CheapOrderedFloat), bool)> = None;
    for (&a, &b) in cyclic_pairs(ring) {
        let spans = if probe.nudge > 0.0 {
            (a.y <= m.y) != (b.y <= m.y)
        } else {
            (a.y < m.y) != (b.y < m.y)
        };
        if !spans {
            continue;
        }

        let k = (b.x - a.x) / (b.y - a.y);
        // Evaluating the edge at the probe's height would be off by a
        // rounding error when the edge is the probe's own edge.
        let d = if probe.is_own_edge(a, b) {
            0.0
        } else {
            a.x + (m.y - a.y) * k - m.x
        };
        let lean = k * probe.nudge;
        if d < 0.0 || (d == 0.0 && lean <= 0.0) {
            continue;
        }

        let key = (CheapOrderedFloat::from(d), CheapOrderedFloat::from(lean));
        if best.map_or(true, |(best_key, _)| key < best_key) {
            best = Some((key, b.y > a.y));
        }
    }

    // An upward edge on our right means we're inside a counter-clockwise ring
    // and outside a clockwise one.
    best.map(|(key, up)| Hit {
        key,
        inside: up == positive,
    })
}

/// Runs the nesting sweep over some traced rings.
///
/// The rings must be open (their first point isn't repeated at the end), and
/// must not cross one another.
pub fn nest_rings(rings: &[Vec<Point>]) -> Nesting {
    let extremes: Vec<_> = rings.iter().map(|r| extreme_points(r)).collect();
    let orientation: Vec<_> = rings
        .iter()
        .zip(&extremes)
        .map(|(r, e)| match e {
            Some(e) => ring_orientation(r, e.leftmost),
            None => Orientation::Degenerate,
        })
        .collect();

    // Rings that touch can share their leftmost vertex, and even the edges
    // around it. A container is bigger than what it contains, so it still
    // gets visited first.
    let leftmost_point = |i: usize| extremes[i].map(|e| rings[i][e.leftmost]);
    let area: Vec<f64> = rings.iter().map(|r| signed_area(r).abs()).collect();
    let mut order: Vec<usize> = (0..rings.len()).collect();
    order.sort_by(|&i, &j| {
        leftmost_point(i)
            .cmp(&leftmost_point(j))
            .then(area[j].total_cmp(&area[i]))
            .then(i.cmp(&j))
    });

    let mut rank = vec![0; rings.len()];
    for (k, &i) in order.iter().enumerate() {
        rank[i] = k;
    }

    let mut parent = vec![None; rings.len()];
    let mut depth = vec![0; rings.len()];
    let mut active: Vec<(usize, Extremes)> = Vec::new();

    for &i in &order {
        let (Some(ext), orient) = (extremes[i], orientation[i]) else {
            continue;
        };
        if orient == Orientation::Degenerate {
            continue;
        }
        let ring = &rings[i];
        let x = ring[ext.leftmost].x;

        // Drop the rings that the sweep line has moved past.
        let mut k = 0;
        while k < active.len() {
            let (c, c_ext) = active[k];
            if rings[c][c_ext.rightmost].x < x {
                active.swap_remove(k);
            } else {
                k += 1;
            }
        }

        let probe = Probe::new(ring, ext.leftmost, orient);
        let mut best = None;
        for &(c, c_ext) in &active {
            let candidate = &rings[c];
            let min_x = candidate[c_ext.leftmost].x;
            let max_x = candidate[c_ext.rightmost].x;
            if probe.point.x < min_x || probe.point.x > max_x {
                continue;
            }

            let positive = orientation[c] == Orientation::Positive;
            let Some(hit) = ray_hit(candidate, positive, &probe) else {
                continue;
            };
            // Two candidates can be hit at the same place if they share the
            // edge there. Then the later one in the sweep is the inner one.
            let key = (hit.key, Reverse(rank[c]));
            if hit.inside && best.map_or(true, |(best_key, _)| key < best_key) {
                best = Some((key, c));
            }
        }

        parent[i] = best.map(|(_, c)| c);
        depth[i] = parent[i].map_or(0, |p| depth[p]) + orient.sign();
        log::trace!(
            "ring {i}: {orient:?}, parent {:?}, depth {}",
            parent[i],
            depth[i]
        );
        active.push((i, ext));
    }

    Nesting {
        order,
        extremes,
        orientation,
        parent,
        depth,
    }
}

/// Rotates an open ring to start at `start`, and closes it.
fn closed_from(ring: &[Point], start: usize) -> Vec<Point> {
    ring[start..]
        .iter()
        .chain(&ring[..=start])
        .copied()
        .collect()
}

impl Nesting {
    /// Assembles the rings that are inside both inputs of an overlay into
    /// polygons.
    ///
    /// A counter-clockwise ring at depth 2 is covered by both inputs, so it
    /// becomes the exterior of a new polygon. A clockwise ring at depth 1 is
    /// a hole in such a region, and gets attached to its parent's polygon.
    /// Everything else is outside at least one of the inputs.
    ///
    /// `rings` must be the same rings that this nesting was computed from.
    /// Output rings are closed, and start at their leftmost point.
    pub fn polygons(&self, rings: &[Vec<Point>]) -> Vec<Polygon> {
        let mut ret: Vec<Polygon> = Vec::new();
        let mut polygon_of = vec![None; rings.len()];

        for &i in &self.order {
            let Some(ext) = self.extremes[i] else {
                continue;
            };
            match (self.orientation[i], self.depth[i]) {
                (Orientation::Positive, 2) => {
                    polygon_of[i] = Some(ret.len());
                    ret.push(Polygon::new(vec![closed_from(&rings[i], ext.leftmost)]));
                }
                (Orientation::Negative, 1) => {
                    match self.parent[i].and_then(|p| polygon_of[p]) {
                        Some(poly) => ret[poly]
                            .rings
                            .push(closed_from(&rings[i], ext.leftmost)),
                        None => log::warn!(
                            "dropping ring {i}: it's a hole, but its parent {:?} isn't an output",
                            self.parent[i]
                        ),
                    }
                }
                _ => {}
            }
        }
        ret
    }
}
