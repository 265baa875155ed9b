//! Waypoint graph over the traversable portion of the map plus dynamic
//! tower obstacles (SPEC_FULL.md §4.1).
//!
//! Grounded on the source's `state::PathGraph`: a traversability grid plus
//! an undirected graph whose nodes are the lattice corners of blocked
//! regions, re-derived whenever a tower is built or destroyed.

use super::graph::Graph;
use cc_core::DoubleVec2D;

#[derive(Clone, Debug)]
pub struct PathGraph {
    size: i64,
    /// `true` where a cell is traversable (LAND or FLAG); `false` for
    /// WATER or a cell currently occupied by a TOWER.
    traversable: Vec<bool>,
    graph: Graph,
}

impl PathGraph {
    pub fn new(size: i64, traversable: Vec<bool>) -> Self {
        assert_eq!(traversable.len() as i64, size * size);
        let mut pg = PathGraph { size, traversable, graph: Graph::new() };
        pg.recompute();
        pg
    }

    fn index(&self, x: i64, y: i64) -> usize {
        (y * self.size + x) as usize
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.size && y < self.size
    }

    fn is_cell_traversable(&self, x: i64, y: i64) -> bool {
        self.in_bounds(x, y) && self.traversable[self.index(x, y)]
    }

    /// Marks a cell blocked (tower built) and rebuilds the waypoint graph.
    pub fn set_blocked(&mut self, x: i64, y: i64) {
        if self.in_bounds(x, y) {
            self.traversable[self.index(x, y)] = false;
            self.recompute();
        }
    }

    /// Marks a cell traversable again (tower destroyed) and rebuilds the
    /// waypoint graph.
    pub fn set_traversable(&mut self, x: i64, y: i64) {
        if self.in_bounds(x, y) {
            self.traversable[self.index(x, y)] = true;
            self.recompute();
        }
    }

    pub fn is_traversable(&self, x: i64, y: i64) -> bool {
        self.is_cell_traversable(x, y)
    }

    fn recompute(&mut self) {
        self.graph = Graph::new();
        let waypoints = self.compute_waypoints();
        for &w in &waypoints {
            self.graph.add_node(w);
        }
        for i in 0..waypoints.len() {
            for j in (i + 1)..waypoints.len() {
                if self.directly_reachable(waypoints[i], waypoints[j]) {
                    self.graph.add_edge(waypoints[i], waypoints[j]);
                }
            }
        }
    }

    /// Count of the 4 unit cells touching lattice corner `(x, y)` that are
    /// blocked; out-of-map cells count as blocked.
    fn blocked_quadrant_count(&self, x: i64, y: i64) -> u8 {
        let quadrants = [(x - 1, y - 1), (x, y - 1), (x - 1, y), (x, y)];
        quadrants
            .iter()
            .filter(|&&(qx, qy)| !self.is_cell_traversable(qx, qy))
            .count() as u8
    }

    /// Candidate waypoints: lattice corners of blocked cells, excluding the
    /// map border, kept only where they form a genuine corner (an odd
    /// number — 1 or 3 — of the four surrounding cells are blocked; an
    /// even count means either open ground, a fully enclosed corner with
    /// no useful routing value, or a straight wall edge with no corner to
    /// route around).
    fn compute_waypoints(&self) -> Vec<DoubleVec2D> {
        let mut candidates = std::collections::HashSet::new();
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_cell_traversable(x, y) {
                    continue;
                }
                for (cx, cy) in [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)] {
                    if cx == 0 || cy == 0 || cx >= self.size || cy >= self.size {
                        continue;
                    }
                    candidates.insert((cx, cy));
                }
            }
        }

        let mut waypoints: Vec<DoubleVec2D> = candidates
            .into_iter()
            .filter(|&(x, y)| {
                let count = self.blocked_quadrant_count(x, y);
                count == 1 || count == 3
            })
            .map(|(x, y)| DoubleVec2D::new(x as f64, y as f64))
            .collect();
        waypoints.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).unwrap());
        waypoints
    }

    /// True iff the open segment `a`-`b` does not cross an impassable
    /// cell. Axis-aligned segments use a specialized walk where a point
    /// exactly on a cell boundary only needs one of its two adjacent
    /// cells traversable; general segments are split at every integer x
    /// they cross and the midpoint cell of each sub-segment is checked.
    pub fn directly_reachable(&self, a: DoubleVec2D, b: DoubleVec2D) -> bool {
        if a == b {
            return true;
        }
        if a.x == b.x {
            return self.vertical_segment_clear(a.x, a.y, b.y);
        }
        if a.y == b.y {
            return self.horizontal_segment_clear(a.y, a.x, b.x);
        }
        self.general_segment_clear(a, b)
    }

    fn vertical_segment_clear(&self, x: f64, y0: f64, y1: f64) -> bool {
        let (lo, hi) = (y0.min(y1), y0.max(y1));
        let mut y = lo.floor();
        while y < hi {
            if !self.boundary_aware_clear(x, y + 0.5, true) {
                return false;
            }
            y += 1.0;
        }
        true
    }

    fn horizontal_segment_clear(&self, y: f64, x0: f64, x1: f64) -> bool {
        let (lo, hi) = (x0.min(x1), x0.max(x1));
        let mut x = lo.floor();
        while x < hi {
            if !self.boundary_aware_clear(x + 0.5, y, false) {
                return false;
            }
            x += 1.0;
        }
        true
    }

    /// For an axis-aligned sub-check at a fixed coordinate (`fixed`) that
    /// may itself sit exactly on an integer cell boundary, either of the
    /// two adjacent cells being traversable suffices.
    fn boundary_aware_clear(&self, maybe_boundary_x_or_row: f64, other: f64, fixed_is_x: bool) -> bool {
        let (fixed, cell_on_other_axis) = if fixed_is_x {
            (maybe_boundary_x_or_row, other.floor() as i64)
        } else {
            (other, maybe_boundary_x_or_row.floor() as i64)
        };
        if fixed.fract() == 0.0 {
            let side_a = fixed as i64 - 1;
            let side_b = fixed as i64;
            let (ok_a, ok_b) = if fixed_is_x {
                (self.is_cell_traversable(side_a, cell_on_other_axis), self.is_cell_traversable(side_b, cell_on_other_axis))
            } else {
                (self.is_cell_traversable(cell_on_other_axis, side_a), self.is_cell_traversable(cell_on_other_axis, side_b))
            };
            ok_a || ok_b
        } else {
            let cell = fixed.floor() as i64;
            if fixed_is_x {
                self.is_cell_traversable(cell, cell_on_other_axis)
            } else {
                self.is_cell_traversable(cell_on_other_axis, cell)
            }
        }
    }

    fn general_segment_clear(&self, a: DoubleVec2D, b: DoubleVec2D) -> bool {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let mut crossings = vec![x0, x1];
        let mut x = x0.ceil();
        while x < x1 {
            crossings.push(x);
            x += 1.0;
        }
        crossings.sort_by(|p, q| p.partial_cmp(q).unwrap());
        crossings.dedup();

        for window in crossings.windows(2) {
            let (xa, xb) = (window[0], window[1]);
            let xm = (xa + xb) / 2.0;
            let t = (xm - a.x) / (b.x - a.x);
            let ym = a.y + t * (b.y - a.y);
            let cell_x = xm.floor() as i64;
            let cell_y = ym.floor() as i64;
            if !self.is_cell_traversable(cell_x, cell_y) {
                return false;
            }
        }
        true
    }

    /// Adds `node` as a temporary waypoint, wired to every existing
    /// waypoint it can directly reach, without touching the cached
    /// obstacle-derived waypoint set.
    fn with_temporary_node(&self, graph: &mut Graph, node: DoubleVec2D) {
        graph.add_node(node);
        let existing: Vec<DoubleVec2D> = graph.nodes().copied().filter(|&n| n != node).collect();
        for other in existing {
            if self.directly_reachable(node, other) {
                graph.add_edge(node, other);
            }
        }
    }

    /// Shortest path from `start` to `end` as the list of waypoints after
    /// `start` up to and including `end`. Empty means unreachable (or
    /// `start == end`).
    pub fn path(&self, start: DoubleVec2D, end: DoubleVec2D) -> Vec<DoubleVec2D> {
        if start == end {
            return Vec::new();
        }
        let mut working = self.graph.clone();
        self.with_temporary_node(&mut working, start);
        self.with_temporary_node(&mut working, end);
        working.shortest_path(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_field(size: i64) -> PathGraph {
        PathGraph::new(size, vec![true; (size * size) as usize])
    }

    #[test]
    fn open_field_has_no_waypoints_but_is_directly_reachable() {
        let pg = open_field(10);
        let path = pg.path(DoubleVec2D::new(0.0, 0.0), DoubleVec2D::new(9.0, 9.0));
        assert_eq!(path, vec![DoubleVec2D::new(9.0, 9.0)]);
    }

    #[test]
    fn blocked_straight_line_requires_detour() {
        let mut traversable = vec![true; 100];
        // A wall across the middle column, x = 5, leaving a one-cell gap
        // at the bottom (y = 9) to route through.
        for y in 0..9 {
            traversable[(y * 10 + 5) as usize] = false;
        }
        let pg = PathGraph::new(10, traversable);
        let path = pg.path(DoubleVec2D::new(0.0, 0.0), DoubleVec2D::new(9.0, 0.0));
        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), DoubleVec2D::new(9.0, 0.0));
    }

    #[test]
    fn full_height_wall_is_unreachable() {
        let mut traversable = vec![true; 100];
        for y in 0..10 {
            traversable[(y * 10 + 5) as usize] = false;
        }
        let pg = PathGraph::new(10, traversable);
        let path = pg.path(DoubleVec2D::new(0.0, 0.0), DoubleVec2D::new(9.0, 0.0));
        assert!(path.is_empty());
    }

    #[test]
    fn adding_then_removing_an_obstacle_restores_reachability() {
        let mut pg = open_field(10);
        let before_nodes: std::collections::HashSet<_> = pg.graph.nodes().copied().collect();
        pg.set_blocked(5, 5);
        assert!(!pg.graph.nodes().collect::<Vec<_>>().is_empty());
        pg.set_traversable(5, 5);
        let after_nodes: std::collections::HashSet<_> = pg.graph.nodes().copied().collect();
        assert_eq!(before_nodes, after_nodes);
    }

    #[test]
    fn same_point_path_is_empty() {
        let pg = open_field(5);
        let p = DoubleVec2D::new(2.0, 2.0);
        assert!(pg.path(p, p).is_empty());
    }
}
