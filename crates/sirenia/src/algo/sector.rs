//! Directional crowding around a node.

use crate::config::Direction;
use rustc_hash::FxBuildHasher;
use sirenia_graph::{EdgeId, MainGraph, NodeId, Point};

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Nodes and edges found in each axis-aligned sector around a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorPopulation {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
}

impl SectorPopulation {
    pub fn get(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// The emptiest sector. Horizontal sectors win ties against vertical ones.
    pub fn least_crowded(&self) -> Direction {
        let order = [
            Direction::Right,
            Direction::Left,
            Direction::Down,
            Direction::Up,
        ];
        let mut best = order[0];
        for d in order {
            if self.get(d) < self.get(best) {
                best = d;
            }
        }
        best
    }

    fn record(&mut self, origin: Point, p: Point) {
        match sector_of(origin, p) {
            Some(Direction::Up) => self.up += 1,
            Some(Direction::Down) => self.down += 1,
            Some(Direction::Left) => self.left += 1,
            Some(Direction::Right) => self.right += 1,
            None => {}
        }
    }
}

/// Sector of `p` as seen from `origin`, split along the diagonals. `None` when they coincide.
pub(crate) fn sector_of(origin: Point, p: Point) -> Option<Direction> {
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy < 0.0 {
        Direction::Up
    } else {
        Direction::Down
    })
}

/// Counts how `edges` populate the sectors around `root`.
///
/// Each distinct endpoint other than the root counts once, at its center; each edge counts
/// once, at the midpoint between its endpoints' centers.
pub fn sector_population(graph: &MainGraph, root: NodeId, edges: &[EdgeId]) -> SectorPopulation {
    let mut population = SectorPopulation::default();
    let Some(origin) = graph.center(root) else {
        return population;
    };
    let mut seen: HashSet<NodeId> = HashSet::default();
    for &id in edges {
        let Some(edge) = graph.edge(id) else {
            continue;
        };
        let (Some(s), Some(t)) = (graph.center(edge.source()), graph.center(edge.target())) else {
            continue;
        };
        for (node, center) in [(edge.source(), s), (edge.target(), t)] {
            if node != root && seen.insert(node) {
                population.record(origin, center);
            }
        }
        population.record(origin, s.midpoint(t));
    }
    population
}
