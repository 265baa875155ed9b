//! Bridges the real-valued actor-position world to the integer-lattice
//! [`PathGraph`], and owns the player-perspective tower-offset conventions
//! (SPEC_FULL.md §4.1).

use super::path_graph::PathGraph;
use crate::map::Map;
use cc_core::{DoubleVec2D, PlayerId, Vec2D};

#[derive(Clone, Debug)]
pub struct PathPlanner {
    size: i64,
    graph: PathGraph,
}

impl PathPlanner {
    /// Builds a planner whose traversability mirrors `map` (LAND/FLAG are
    /// traversable, WATER/TOWER are not).
    pub fn new(map: &Map) -> Self {
        let size = map.size();
        let mut traversable = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                traversable.push(!map.is_blocked(Vec2D::new(x, y)));
            }
        }
        PathPlanner { size, graph: PathGraph::new(size, traversable) }
    }

    /// Whether `position` lies within the map square for the given actor
    /// kind and player perspective. Bots may touch either border; towers
    /// may not touch the border that is "theirs" in the flipped frame
    /// (player 1 excludes the far edge, player 2 excludes the near edge),
    /// so that both players can address the same physical cell.
    pub fn is_in_map_range_for_tower(&self, position: DoubleVec2D, player_id: PlayerId) -> bool {
        if position.x < 0.0 || position.y < 0.0 || position.x > self.size as f64 || position.y > self.size as f64 {
            return false;
        }
        match player_id {
            PlayerId::Player1 => position.x != self.size as f64 && position.y != self.size as f64,
            PlayerId::Player2 => position.x != 0.0 && position.y != 0.0,
            PlayerId::PlayerNull => false,
        }
    }

    pub fn is_in_map_range_for_bot(&self, position: DoubleVec2D) -> bool {
        position.x >= 0.0 && position.y >= 0.0 && position.x <= self.size as f64 && position.y <= self.size as f64
    }

    /// The integer lattice offset a tower built from `position` would
    /// occupy, from `player_id`'s perspective: player 1 floors, player 2
    /// takes ceiling-minus-one, so that the two flipped frames agree on
    /// which physical cell is meant.
    pub fn offset_for(&self, position: DoubleVec2D, player_id: PlayerId) -> Vec2D {
        match player_id {
            PlayerId::Player1 => position.floor().to_vec2d(),
            PlayerId::Player2 => {
                let ceil = position.ceil();
                Vec2D::new(ceil.x as i64 - 1, ceil.y as i64 - 1)
            }
            PlayerId::PlayerNull => Vec2D::NULL,
        }
    }

    /// Up to 4 integer cells adjoining a (possibly fractional) bot
    /// position: for each axis independently, both neighboring integer
    /// cells are candidates when the coordinate is itself integral.
    fn adjoining_offsets(&self, position: DoubleVec2D) -> Vec<Vec2D> {
        let xs: Vec<i64> = if position.x.fract() == 0.0 {
            vec![position.x as i64 - 1, position.x as i64]
        } else {
            vec![position.x.floor() as i64]
        };
        let ys: Vec<i64> = if position.y.fract() == 0.0 {
            vec![position.y as i64 - 1, position.y as i64]
        } else {
            vec![position.y.floor() as i64]
        };
        let mut out = Vec::with_capacity(4);
        for &x in &xs {
            for &y in &ys {
                out.push(Vec2D::new(x, y));
            }
        }
        out
    }

    /// True if a bot standing at `position` is on valid ground: any one of
    /// its adjoining integer cells must be traversable (LAND or FLAG).
    pub fn is_valid_bot_position(&self, position: DoubleVec2D) -> bool {
        if !self.is_in_map_range_for_bot(position) {
            return false;
        }
        self.adjoining_offsets(position)
            .into_iter()
            .any(|o| self.graph.is_traversable(o.x, o.y))
    }

    /// True if `offset` (a tower-offset lattice cell, from `player_id`'s
    /// perspective) is on the map and not already blocked.
    pub fn is_valid_tower_offset(&self, position: DoubleVec2D, player_id: PlayerId) -> bool {
        if !self.is_in_map_range_for_tower(position, player_id) {
            return false;
        }
        let offset = self.offset_for(position, player_id);
        self.graph.is_traversable(offset.x, offset.y)
    }

    /// Marks `offset` blocked in the path graph (a tower now stands
    /// there). Fails if already blocked.
    pub fn build_tower(&mut self, offset: Vec2D) -> bool {
        if offset.is_null() || !self.graph.is_traversable(offset.x, offset.y) {
            return false;
        }
        self.graph.set_blocked(offset.x, offset.y);
        true
    }

    /// Frees `offset` in the path graph (the tower there was destroyed).
    /// Fails if the offset wasn't blocked.
    pub fn destroy_tower(&mut self, offset: Vec2D) -> bool {
        if offset.is_null() || self.graph.is_traversable(offset.x, offset.y) {
            return false;
        }
        self.graph.set_traversable(offset.x, offset.y);
        true
    }

    /// The point reached after walking `distance` units from `a` toward
    /// `b` along the straight line between them. `a == b` is undefined for
    /// callers (the source throws); this implementation returns `a`.
    pub fn point_along_line(a: DoubleVec2D, b: DoubleVec2D, distance: f64) -> DoubleVec2D {
        if a == b {
            return a;
        }
        let total = a.distance(b);
        if distance >= total {
            return b;
        }
        let t = distance / total;
        a + (b - a) * t
    }

    /// Walks the shortest path from `source` to `dest`, consuming up to
    /// `speed` units of Euclidean distance. Returns the exact point
    /// reached (possibly mid-segment); `None` if no path exists.
    pub fn next_position(&self, source: DoubleVec2D, dest: DoubleVec2D, speed: f64) -> Option<DoubleVec2D> {
        if source == dest {
            return Some(source);
        }
        let path = self.graph.path(source, dest);
        if path.is_empty() {
            return None;
        }

        let mut remaining = speed;
        let mut current = source;
        for waypoint in path {
            let hop = current.distance(waypoint);
            if hop > remaining {
                return Some(Self::point_along_line(current, waypoint, remaining));
            }
            remaining -= hop;
            current = waypoint;
            if remaining <= 0.0 {
                return Some(current);
            }
        }
        Some(current)
    }
}
