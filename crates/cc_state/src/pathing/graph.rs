//! Generic A* search over an undirected, Euclidean-weighted waypoint graph.
//!
//! Grounded on the source's `state::Graph`, which despite being named for
//! Dijkstra-style relaxation actually prioritizes by `g + h` (true A*) with
//! an admissible Euclidean-distance heuristic to the destination.

use cc_core::DoubleVec2D;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq)]
struct OpenEntry {
    node: DoubleVec2D,
    g: f64,
    h: f64,
    /// Tie-break by insertion order: earlier-inserted entries sort first
    /// when `g + h` is equal, for stable, reproducible paths.
    seq: u64,
}

impl OpenEntry {
    fn total(&self) -> f64 {
        self.g + self.h
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; we want the smallest total cost out
        // first, so reverse the comparison, then break ties by *smaller*
        // seq (stable / first-inserted-wins) also reversed.
        other
            .total()
            .partial_cmp(&self.total())
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug)]
struct VisitRecord {
    g: f64,
    parent: Option<DoubleVec2D>,
}

/// An undirected graph over `DoubleVec2D` nodes with Euclidean edge weights.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    adjacency: HashMap<DoubleVec2D, Vec<DoubleVec2D>>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { adjacency: HashMap::new() }
    }

    pub fn has_node(&self, node: DoubleVec2D) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DoubleVec2D> {
        self.adjacency.keys()
    }

    pub fn neighbors(&self, node: DoubleVec2D) -> &[DoubleVec2D] {
        self.adjacency.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn add_node(&mut self, node: DoubleVec2D) {
        self.adjacency.entry(node).or_default();
    }

    /// Adds an undirected edge. No-op (besides node registration) if the
    /// edge already exists.
    pub fn add_edge(&mut self, a: DoubleVec2D, b: DoubleVec2D) {
        if a == b {
            return;
        }
        let a_list = self.adjacency.entry(a).or_default();
        if !a_list.contains(&b) {
            a_list.push(b);
        }
        let b_list = self.adjacency.entry(b).or_default();
        if !b_list.contains(&a) {
            b_list.push(a);
        }
    }

    pub fn remove_node(&mut self, node: DoubleVec2D) {
        if let Some(neighbors) = self.adjacency.remove(&node) {
            for n in neighbors {
                if let Some(list) = self.adjacency.get_mut(&n) {
                    list.retain(|&x| x != node);
                }
            }
        }
    }

    /// A* search from `start` to `end`. Returns the list of waypoints
    /// strictly after `start` up to and including `end`; an empty vec means
    /// `start == end` or `end` is unreachable.
    pub fn shortest_path(&self, start: DoubleVec2D, end: DoubleVec2D) -> Vec<DoubleVec2D> {
        if start == end {
            return Vec::new();
        }
        if !self.adjacency.contains_key(&start) || !self.adjacency.contains_key(&end) {
            return Vec::new();
        }

        let mut visited: HashMap<DoubleVec2D, VisitRecord> = HashMap::new();
        let mut open_set: HashSet<DoubleVec2D> = HashSet::new();
        let mut heap: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut seq: u64 = 0;

        visited.insert(start, VisitRecord { g: 0.0, parent: None });
        open_set.insert(start);
        heap.push(OpenEntry { node: start, g: 0.0, h: start.distance(end), seq });
        seq += 1;

        while let Some(entry) = heap.pop() {
            if !open_set.remove(&entry.node) {
                // Stale heap entry, superseded by a cheaper relaxation.
                continue;
            }

            if entry.node == end {
                return reconstruct_path(&visited, end);
            }

            for &neighbor in self.neighbors(entry.node) {
                let tentative_g = entry.g + entry.node.distance(neighbor);
                let better = match visited.get(&neighbor) {
                    None => true,
                    Some(existing) => open_set.contains(&neighbor) && tentative_g < existing.g,
                };
                if better {
                    visited.insert(neighbor, VisitRecord { g: tentative_g, parent: Some(entry.node) });
                    open_set.insert(neighbor);
                    heap.push(OpenEntry {
                        node: neighbor,
                        g: tentative_g,
                        h: neighbor.distance(end),
                        seq,
                    });
                    seq += 1;
                }
            }
        }

        Vec::new()
    }
}

fn reconstruct_path(visited: &HashMap<DoubleVec2D, VisitRecord>, end: DoubleVec2D) -> Vec<DoubleVec2D> {
    let mut path = Vec::new();
    let mut current = end;
    loop {
        path.push(current);
        match visited.get(&current).and_then(|r| r.parent) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> DoubleVec2D {
        DoubleVec2D::new(x, y)
    }

    #[test]
    fn same_start_and_end_is_empty_path() {
        let mut g = Graph::new();
        g.add_node(p(0.0, 0.0));
        assert!(g.shortest_path(p(0.0, 0.0), p(0.0, 0.0)).is_empty());
    }

    #[test]
    fn straight_line_path() {
        let mut g = Graph::new();
        g.add_edge(p(0.0, 0.0), p(5.0, 0.0));
        let path = g.shortest_path(p(0.0, 0.0), p(5.0, 0.0));
        assert_eq!(path, vec![p(5.0, 0.0)]);
    }

    #[test]
    fn picks_the_cheaper_of_two_routes() {
        let mut g = Graph::new();
        // Direct diagonal-ish detour through (10, 0) is longer than the
        // straight line through (4, 3) -> (6, 3) when weighted by distance.
        g.add_edge(p(0.0, 0.0), p(10.0, 0.0));
        g.add_edge(p(0.0, 0.0), p(4.0, 3.0));
        g.add_edge(p(4.0, 3.0), p(6.0, 3.0));
        g.add_edge(p(6.0, 3.0), p(10.0, 0.0));
        let path = g.shortest_path(p(0.0, 0.0), p(10.0, 0.0));
        assert_eq!(path, vec![p(10.0, 0.0)]);
    }

    #[test]
    fn unreachable_node_returns_empty() {
        let mut g = Graph::new();
        g.add_node(p(0.0, 0.0));
        g.add_node(p(1.0, 1.0));
        assert!(g.shortest_path(p(0.0, 0.0), p(1.0, 1.0)).is_empty());
    }

    #[test]
    fn remove_node_detaches_its_edges() {
        let mut g = Graph::new();
        g.add_edge(p(0.0, 0.0), p(1.0, 0.0));
        g.add_edge(p(1.0, 0.0), p(2.0, 0.0));
        g.remove_node(p(1.0, 0.0));
        assert!(g.shortest_path(p(0.0, 0.0), p(2.0, 0.0)).is_empty());
        assert!(!g.has_node(p(1.0, 0.0)));
    }
}
