//! The planar arrangement of a collection of rings.
//!
//! We overlay the edges of every input ring, find all the places where edges
//! of different rings meet, and then re-trace the resulting graph into
//! closed rings that don't cross one another. Each traced ring separates two
//! regions of constant coverage, so it can be classified as a whole.

use crate::{
    geom::{cyclic_pairs, Point},
    num::CheapOrderedFloat,
    segments::{SegIdx, Segments},
};

typed_vec!(
    /// A vector indexed by [`NodeIdx`].
    NodeVec,
    /// An index identifying a node in an [`IntersectionGraph`].
    NodeIdx,
    "n"
);

/// A point in the arrangement, along with its links.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// The location of this node.
    pub point: Point,
    /// The following node along the input ring that this node came from.
    pub next: NodeIdx,
    /// The preceding node along the input ring that this node came from.
    pub prev: NodeIdx,
    /// Where a walk that arrives here (along the edge from `prev`) carries
    /// on: it leaves along the outgoing edge of `exit`.
    ///
    /// `exit` is at the same point as this node. It's this node itself unless
    /// some other ring passes through the same point.
    pub exit: NodeIdx,
}

/// A closed walk through the arrangement.
///
/// The walk is stored without repeating its first node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracedRing {
    /// The nodes visited, in order.
    pub nodes: Vec<NodeIdx>,
}

/// The arrangement induced by overlaying a collection of rings.
///
/// The nodes are stored in a flat arena. The first [`Segments::len`] nodes
/// are the vertices of the input rings: node `i` is the start point of
/// segment `i`. After those come the nodes spliced into the middle of edges,
/// wherever an edge of some other ring crosses or touches them.
///
/// Following `next` from any node walks around the input ring it came from,
/// visiting the spliced nodes in order along each edge. Two consecutive
/// nodes of a ring are never at the same point.
#[derive(Clone, Debug)]
pub struct IntersectionGraph {
    nodes: NodeVec<Node>,
    vertex_count: usize,
    crossing_count: usize,
}

/// Do two (closed) rectangles have any point in common?
fn boxes_touch(a: &kurbo::Rect, b: &kurbo::Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

// One edge end at a junction: either an edge arriving at the junction, or one
// leaving it.
#[derive(Clone, Copy, Debug)]
struct Spoke {
    // The direction from the junction along the edge.
    angle: CheapOrderedFloat,
    outgoing: bool,
    // Orders spokes that point the same way. The edge is identified by the
    // node it starts at.
    tie: isize,
    node: NodeIdx,
    // How many rings cover the area just to the left of the edge (in its
    // direction of travel), up to a constant shared by the whole junction.
    level: i32,
}

// Decides how walks get through a point that several rings pass through.
//
// Going counter-clockwise around the junction, the coverage goes up by one
// across each outgoing edge and down by one across each incoming edge. A
// walk arriving on an edge with coverage `k` on its left leaves along the
// first outgoing edge clockwise from it that also has `k` on its left. So the
// walk keeps the same region on its left, and hugs it as tightly as possible:
// rings that only touch here stay apart.
//
// Edges that coincide are ordered with incoming before outgoing, and then by
// the index of their start node (descending for incoming, ascending for
// outgoing). This puts the same edge in the same place across the bundle at
// both of its ends, so its level agrees at both ends.
fn link_junction(
    nodes: &[NodeIdx],
    points: &[Point],
    next: &[NodeIdx],
    prev: &[NodeIdx],
    exit: &mut [NodeIdx],
) {
    let Some(center) = nodes.first().map(|n| points[n.0]) else {
        return;
    };
    let angle = |q: Point| CheapOrderedFloat::from((q.y - center.y).atan2(q.x - center.x));

    let mut spokes = Vec::with_capacity(2 * nodes.len());
    for &n in nodes {
        let from = prev[n.0];
        spokes.push(Spoke {
            angle: angle(points[from.0]),
            outgoing: false,
            tie: -(from.0 as isize),
            node: n,
            level: 0,
        });
        spokes.push(Spoke {
            angle: angle(points[next[n.0].0]),
            outgoing: true,
            tie: n.0 as isize,
            node: n,
            level: 0,
        });
    }
    spokes.sort_by_key(|s| (s.angle, s.outgoing, s.tie));

    let mut level = 0;
    for s in &mut spokes {
        if s.outgoing {
            level += 1;
            s.level = level;
        } else {
            s.level = level;
            level -= 1;
        }
    }
    debug_assert_eq!(level, 0);

    let len = spokes.len();
    for (i, arrival) in spokes.iter().enumerate() {
        if arrival.outgoing {
            continue;
        }
        let departure = (1..len)
            .map(|k| &spokes[(i + len - k) % len])
            .find(|s| s.outgoing && s.level == arrival.level);
        if let Some(departure) = departure {
            exit[arrival.node.0] = departure.node;
        }
    }
}

// The arrangement under construction. We don't know the links until we've
// found all the crossings, so nodes are stored column-wise until then.
struct Builder<'a> {
    segs: &'a Segments,
    points: Vec<Point>,
    // For each segment, the nodes to splice into it, keyed by their
    // parameter along the segment.
    splices: NodeVec<Vec<(CheapOrderedFloat, NodeIdx)>>,
    crossing_count: usize,
}

impl<'a> Builder<'a> {
    fn new(segs: &'a Segments) -> Self {
        Builder {
            segs,
            points: segs.segments().map(|s| s.p1).collect(),
            splices: NodeVec::with_size(segs.len()),
            crossing_count: 0,
        }
    }

    // The vertex node at the end of segment `seg`.
    fn end_vertex(&self, seg: SegIdx) -> NodeIdx {
        let range = self.segs.ring_range(self.segs.ring_of(seg));
        if seg.0 + 1 < range.end {
            NodeIdx(seg.0 + 1)
        } else {
            NodeIdx(range.start)
        }
    }

    // Finds (or creates) the node on segment `seg` at `point`, which is at
    // parameter `t` along it.
    //
    // There's at most one node per point on each segment: if the point is
    // one of the segment's endpoints, or if some other ring already met this
    // segment at the same point, the existing node is reused.
    fn node_at(&mut self, seg: SegIdx, t: f64, point: Point) -> NodeIdx {
        let s = &self.segs[seg];
        let vertex = NodeIdx(seg.0);
        if point == s.p1 {
            return vertex;
        }
        if point == s.p2 {
            return self.end_vertex(seg);
        }
        let points = &self.points;
        if let Some(&(_, idx)) = self.splices[vertex]
            .iter()
            .find(|(_, idx)| points[idx.0] == point)
        {
            return idx;
        }

        let idx = NodeIdx(self.points.len());
        self.points.push(point);
        self.splices[vertex].push((t.into(), idx));
        idx
    }

    fn add_crossing(&mut self, i: SegIdx, j: SegIdx, t: f64, u: f64) {
        let (s, r) = (self.segs[i], self.segs[j]);
        // Both sides of the crossing get exactly the same point, and it
        // doesn't depend on which of the two segments came first. A crossing
        // at a vertex is at that vertex, exactly.
        let point = if t == 0.0 {
            s.p1
        } else if u == 0.0 {
            r.p1
        } else if s <= r {
            s.position(t)
        } else {
            r.position(u)
        };
        self.node_at(i, t, point);
        self.node_at(j, u, point);
        self.crossing_count += 1;
    }

    // Splits collinear segments at each other's start points.
    //
    // An end point inside the other segment is the start point of the next
    // segment in its ring, and it gets found either here (if that next
    // segment is collinear too) or as an ordinary crossing.
    fn add_overlaps(&mut self, i: SegIdx, j: SegIdx) {
        let (s, r) = (self.segs[i], self.segs[j]);
        if !s.is_parallel(&r) {
            return;
        }
        if let Some(t) = s.interior_parameter(r.p1) {
            self.node_at(i, t, r.p1);
            self.crossing_count += 1;
        }
        if let Some(u) = r.interior_parameter(s.p1) {
            self.node_at(j, u, s.p1);
            self.crossing_count += 1;
        }
    }

    fn find_crossings(&mut self, prefilter: bool) {
        let segs = self.segs;
        let boxes: Vec<kurbo::Rect> = if prefilter {
            segs.segments().map(|s| s.bounding_box()).collect()
        } else {
            Vec::new()
        };

        for ring in 0..segs.ring_count() {
            let range = segs.ring_range(ring);
            for i in range.clone() {
                // Edges of the same ring never cross one another, so we only
                // look at the rings that come afterwards.
                for j in range.end..segs.len() {
                    if prefilter && !boxes_touch(&boxes[i], &boxes[j]) {
                        continue;
                    }
                    let (i, j) = (SegIdx(i), SegIdx(j));
                    match segs[i].crossing(&segs[j]) {
                        Some((t, u)) => self.add_crossing(i, j, t, u),
                        None => self.add_overlaps(i, j),
                    }
                }
            }
        }
    }

    fn build(mut self) -> IntersectionGraph {
        let segs = self.segs;
        let len = self.points.len();
        let mut next = vec![NodeIdx(0); len];
        let mut prev = vec![NodeIdx(0); len];

        for ring in 0..segs.ring_count() {
            let mut order = Vec::new();
            for seg in segs.ring_range(ring) {
                let vertex = NodeIdx(seg);
                order.push(vertex);
                let splices = &mut self.splices[vertex];
                splices.sort();
                order.extend(splices.iter().map(|(_, idx)| *idx));
            }
            for (&a, &b) in cyclic_pairs(&order) {
                next[a.0] = b;
                prev[b.0] = a;
            }
        }

        // Group the nodes by location, and work out the turns at every point
        // that more than one node shares.
        let mut exit: Vec<NodeIdx> = (0..len).map(NodeIdx).collect();
        let mut by_point = exit.clone();
        by_point.sort_by_key(|idx| (self.points[idx.0], *idx));
        let mut start = 0;
        while start < by_point.len() {
            let point = self.points[by_point[start].0];
            let end = by_point[start..]
                .iter()
                .position(|idx| self.points[idx.0] != point)
                .map_or(by_point.len(), |k| start + k);
            if end - start > 1 {
                link_junction(&by_point[start..end], &self.points, &next, &prev, &mut exit);
            }
            start = end;
        }

        let nodes = self
            .points
            .iter()
            .zip(exit)
            .zip(next.into_iter().zip(prev))
            .map(|((&point, exit), (next, prev))| Node {
                point,
                next,
                prev,
                exit,
            })
            .collect();

        IntersectionGraph {
            nodes: NodeVec::from_vec(nodes),
            vertex_count: segs.len(),
            crossing_count: self.crossing_count,
        }
    }
}

impl IntersectionGraph {
    /// Builds the arrangement of a collection of rings.
    ///
    /// Every pair of edges from different rings is tested for a crossing.
    /// If `prefilter` is true, pairs whose bounding boxes don't touch are
    /// rejected without computing anything; this gives the same answer, only
    /// faster.
    pub fn new(segs: &Segments, prefilter: bool) -> Self {
        let mut builder = Builder::new(segs);
        builder.find_crossings(prefilter);
        let ret = builder.build();
        #[cfg(any(test, feature = "slow-asserts"))]
        ret.check_invariants();
        ret
    }

    /// The total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Does the arrangement have no nodes at all?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of input vertices (which are the first nodes in the arena).
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// The number of times that an edge met an edge of another ring.
    ///
    /// This counts crossings, and also the places where one ring's vertex
    /// lies on another ring's edge.
    pub fn crossing_count(&self) -> usize {
        self.crossing_count
    }

    /// Iterate over all the node indices.
    pub fn indices(&self) -> impl Iterator<Item = NodeIdx> {
        self.nodes.indices()
    }

    /// Iterate over all the nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.nodes.iter()
    }

    /// Where do we go after leaving `idx` along its outgoing edge?
    ///
    /// We arrive at the next node along the current ring, and carry on from
    /// its [`Node::exit`]. Where rings cross, that switches over to the other
    /// ring; where they only touch, it stays on the same one.
    ///
    /// Because `next` and `exit` are both permutations of the nodes, this
    /// is a permutation too: its cycles are the traced rings.
    pub fn successor(&self, idx: NodeIdx) -> NodeIdx {
        let next = self.nodes[idx].next;
        self.nodes[next].exit
    }

    /// Decomposes the arrangement into closed rings.
    ///
    /// Every node belongs to exactly one of the returned rings, and so every
    /// edge of the arrangement (which we identify with the node it starts at)
    /// is used exactly once. Rings are returned in order of their
    /// lowest-indexed node, starting from that node.
    pub fn trace_rings(&self) -> Vec<TracedRing> {
        let mut used = vec![false; self.nodes.len()];
        let mut rings = Vec::new();
        for start in self.nodes.indices() {
            if used[start.0] {
                continue;
            }

            let mut nodes = Vec::new();
            let mut cur = start;
            while !used[cur.0] {
                used[cur.0] = true;
                nodes.push(cur);
                cur = self.successor(cur);
            }
            debug_assert_eq!(cur, start);
            rings.push(TracedRing { nodes });
        }
        rings
    }

    /// The positions visited by a traced ring.
    ///
    /// Runs of repeated positions are collapsed into one. The ring stays
    /// open: if the last position equals the first, it's dropped.
    pub fn ring_to_positions(&self, ring: &TracedRing) -> Vec<Point> {
        let mut ret: Vec<Point> = Vec::with_capacity(ring.nodes.len());
        for &idx in &ring.nodes {
            let p = self.nodes[idx].point;
            if ret.last() != Some(&p) {
                ret.push(p);
            }
        }
        if ret.len() > 1 && ret.first() == ret.last() {
            ret.pop();
        }
        ret
    }

    /// Panics if the links are inconsistent.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self) {
        let mut points: Vec<Point> = self.nodes.iter().map(|(_, n)| n.point).collect();
        points.sort();
        let mut exits = vec![false; self.nodes.len()];

        for (idx, node) in self.nodes.iter() {
            assert_eq!(self.nodes[node.next].prev, idx);
            assert_eq!(self.nodes[node.prev].next, idx);
            assert_ne!(self.nodes[node.next].point, node.point, "{idx:?}");
            assert_eq!(self.nodes[node.exit].point, node.point);
            assert!(!exits[node.exit.0], "{:?} is two exits", node.exit);
            exits[node.exit.0] = true;

            if idx.0 >= self.vertex_count {
                let shared = points.partition_point(|p| *p <= node.point)
                    - points.partition_point(|p| *p < node.point);
                assert!(shared > 1, "{idx:?} should be on another ring");
            }
        }
    }
}

impl std::ops::Index<NodeIdx> for IntersectionGraph {
    type Output = Node;

    fn index(&self, index: NodeIdx) -> &Node {
        &self.nodes[index]
    }
}
