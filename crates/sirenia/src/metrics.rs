//! Layout quality metrics.
//!
//! Both metrics are pure functions of a laid-out graph. An edge is drawn as the polyline from the
//! center of its source through its waypoints to the center of its target.

use serde::Serialize;
use sirenia_graph::{Bounds, Edge, MainGraph, NodeId, Point};
use std::fmt;

const EPS: f64 = 1e-9;

/// Cost of a layout; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub edge_crossings: usize,
    pub edge_node_crossings: usize,
}

impl Score {
    pub fn of(graph: &MainGraph) -> Self {
        let polylines = polylines(graph);
        Self {
            edge_crossings: count_edge_crossings(&polylines),
            edge_node_crossings: count_edge_node_crossings(graph, &polylines),
        }
    }

    pub fn total(&self) -> usize {
        self.edge_crossings + self.edge_node_crossings
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} edge/edge, {} edge/node)",
            self.total(),
            self.edge_crossings,
            self.edge_node_crossings
        )
    }
}

/// Number of intersecting segment pairs between edges that share no endpoint.
pub fn edge_crossings(graph: &MainGraph) -> usize {
    count_edge_crossings(&polylines(graph))
}

/// Number of (edge, node) pairs where the edge passes through a node it does not connect.
pub fn edge_node_crossings(graph: &MainGraph) -> usize {
    count_edge_node_crossings(graph, &polylines(graph))
}

struct Polyline {
    source: NodeId,
    target: NodeId,
    points: Vec<Point>,
}

impl Polyline {
    fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    fn shares_endpoint(&self, other: &Polyline) -> bool {
        self.source == other.source
            || self.source == other.target
            || self.target == other.source
            || self.target == other.target
    }
}

fn polylines(graph: &MainGraph) -> Vec<Polyline> {
    graph
        .edges()
        .filter(|e| measurable(graph, e))
        .filter_map(|e| {
            let source = graph.center(e.source())?;
            let target = graph.center(e.target())?;
            let mut points = Vec::with_capacity(e.waypoints.len() + 2);
            points.push(source);
            points.extend(e.waypoints.iter().copied());
            points.push(target);
            Some(Polyline {
                source: e.source(),
                target: e.target(),
                points,
            })
        })
        .collect()
}

fn measurable(graph: &MainGraph, edge: &Edge) -> bool {
    let considered = |id| graph.node(id).is_some_and(|n| n.is_considered_in_layout());
    !edge.is_synthetic()
        && edge.is_considered_in_layout()
        && considered(edge.source())
        && considered(edge.target())
}

fn count_edge_crossings(polylines: &[Polyline]) -> usize {
    let mut count = 0;
    for (i, a) in polylines.iter().enumerate() {
        for b in &polylines[i + 1..] {
            if a.shares_endpoint(b) {
                continue;
            }
            for (p1, p2) in a.segments() {
                count += b
                    .segments()
                    .filter(|&(q1, q2)| segments_intersect(p1, p2, q1, q2))
                    .count();
            }
        }
    }
    count
}

fn count_edge_node_crossings(graph: &MainGraph, polylines: &[Polyline]) -> usize {
    let obstacles: Vec<(NodeId, Bounds)> = graph
        .nodes()
        .filter(|n| n.is_considered_in_layout() && !n.is_subgraph())
        .filter_map(|n| Some((n.id(), n.geometry.bounds()?)))
        .collect();

    let mut count = 0;
    for line in polylines {
        for &(node, bounds) in &obstacles {
            if node == line.source || node == line.target {
                continue;
            }
            if line
                .segments()
                .any(|(a, b)| segment_intersects_rect(a, b, &bounds))
            {
                count += 1;
            }
        }
    }
    count
}

fn segment_intersects_rect(a: Point, b: Point, rect: &Bounds) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.right(), rect.y);
    let br = Point::new(rect.right(), rect.bottom());
    let bl = Point::new(rect.x, rect.bottom());
    segments_intersect(a, b, tl, tr)
        || segments_intersect(a, b, tr, br)
        || segments_intersect(a, b, br, bl)
        || segments_intersect(a, b, bl, tl)
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);

    if o1.abs() < EPS && on_segment(a, b, c) {
        return true;
    }
    if o2.abs() < EPS && on_segment(a, b, d) {
        return true;
    }
    if o3.abs() < EPS && on_segment(c, d, a) {
        return true;
    }
    if o4.abs() < EPS && on_segment(c, d, b) {
        return true;
    }

    (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0)
}

fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, c: Point) -> bool {
    c.x >= a.x.min(b.x) - EPS
        && c.x <= a.x.max(b.x) + EPS
        && c.y >= a.y.min(b.y) - EPS
        && c.y <= a.y.max(b.y) + EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect() {
        let p = Point::new;
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)));
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 5.0), p(10.0, 5.0)));
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 5.0)));
    }

    #[test]
    fn segment_through_a_box_hits_it() {
        let rect = Bounds::new(10.0, -5.0, 10.0, 10.0);
        let p = Point::new;
        assert!(segment_intersects_rect(p(0.0, 0.0), p(30.0, 0.0), &rect));
        assert!(!segment_intersects_rect(p(0.0, 20.0), p(30.0, 20.0), &rect));
    }
}
