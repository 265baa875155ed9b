//! Fixed-size square terrain grid (SPEC_FULL.md §3).

use std::collections::HashMap;

use cc_core::{DoubleVec2D, Terrain, Vec2D};

/// Square grid of terrain cells. Shape is immutable once constructed; the
/// only allowed mutation is the TOWER toggle as towers are built and
/// destroyed — a tower may stand on LAND or FLAG (SPEC_FULL.md §4.1 "Tower
/// placement" only excludes WATER and already-blocked offsets), so the
/// origin terrain under each standing tower is remembered and restored on
/// destruction rather than always reverting to LAND.
#[derive(Clone, Debug)]
pub struct Map {
    size: i64,
    cells: Vec<Terrain>,
    /// Offsets of every FLAG cell, fixed for the match (FLAG never toggles,
    /// even while a tower currently occupies the cell).
    flag_offsets: Vec<Vec2D>,
    /// Terrain a standing tower's cell was built over, keyed by offset, so
    /// `destroy_tower` restores FLAG instead of flattening it to LAND.
    tower_origin: HashMap<Vec2D, Terrain>,
}

impl Map {
    /// Builds a map from a row-major `size * size` terrain buffer.
    pub fn new(size: i64, cells: Vec<Terrain>) -> Self {
        assert_eq!(cells.len() as i64, size * size, "map cell count must be size*size");
        let flag_offsets = cells
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Terrain::Flag)
            .map(|(i, _)| {
                let i = i as i64;
                Vec2D::new(i % size, i / size)
            })
            .collect();
        Map { size, cells, flag_offsets, tower_origin: HashMap::new() }
    }

    /// An all-LAND map of the given size with no obstacles, useful for tests.
    pub fn empty(size: i64) -> Self {
        Map::new(size, vec![Terrain::Land; (size * size) as usize])
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn flag_offsets(&self) -> &[Vec2D] {
        &self.flag_offsets
    }

    /// The full row-major terrain grid, for seeding the replay logger's
    /// static map frame at match start.
    pub fn cells(&self) -> &[Terrain] {
        &self.cells
    }

    fn index(&self, x: i64, y: i64) -> usize {
        (y * self.size + x) as usize
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.size && y < self.size
    }

    pub fn terrain_at(&self, offset: Vec2D) -> Option<Terrain> {
        if !self.in_bounds(offset.x, offset.y) {
            return None;
        }
        Some(self.cells[self.index(offset.x, offset.y)])
    }

    /// Terrain under a real-valued position, via its floored lattice cell.
    pub fn terrain_at_position(&self, position: DoubleVec2D) -> Option<Terrain> {
        let floored = position.floor().to_vec2d();
        self.terrain_at(floored)
    }

    /// Flips a LAND or FLAG cell to TOWER, remembering the origin terrain.
    /// Fails (returns false, no mutation) on WATER or an already-standing
    /// TOWER (SPEC_FULL.md §4.1: building fails only on WATER or a blocked
    /// offset).
    pub fn build_tower(&mut self, offset: Vec2D) -> bool {
        if !self.in_bounds(offset.x, offset.y) {
            return false;
        }
        let idx = self.index(offset.x, offset.y);
        let origin = self.cells[idx];
        if origin == Terrain::Water || origin == Terrain::Tower {
            return false;
        }
        self.tower_origin.insert(offset, origin);
        self.cells[idx] = Terrain::Tower;
        true
    }

    /// Flips a TOWER cell back to its origin terrain (LAND or FLAG). Fails
    /// unless the cell is currently TOWER.
    pub fn destroy_tower(&mut self, offset: Vec2D) -> bool {
        if !self.in_bounds(offset.x, offset.y) {
            return false;
        }
        let idx = self.index(offset.x, offset.y);
        if self.cells[idx] != Terrain::Tower {
            return false;
        }
        let origin = self.tower_origin.remove(&offset).unwrap_or(Terrain::Land);
        self.cells[idx] = origin;
        true
    }

    /// True if this cell is impassable for pathing purposes: WATER, or
    /// TOWER (a dynamic obstacle while the tower stands).
    pub fn is_blocked(&self, offset: Vec2D) -> bool {
        match self.terrain_at(offset) {
            None => true,
            Some(Terrain::Water) | Some(Terrain::Tower) => true,
            Some(Terrain::Land) | Some(Terrain::Flag) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_then_destroy_restores_land() {
        let mut map = Map::empty(10);
        let offset = Vec2D::new(4, 4);
        assert!(map.build_tower(offset));
        assert_eq!(map.terrain_at(offset), Some(Terrain::Tower));
        assert!(!map.build_tower(offset), "cannot build on an existing tower");
        assert!(map.destroy_tower(offset));
        assert_eq!(map.terrain_at(offset), Some(Terrain::Land));
    }

    #[test]
    fn cannot_destroy_non_tower() {
        let mut map = Map::empty(10);
        assert!(!map.destroy_tower(Vec2D::new(2, 2)));
    }

    #[test]
    fn building_on_a_flag_restores_flag_on_destruction() {
        let mut cells = vec![Terrain::Land; 100];
        let offset = Vec2D::new(3, 3);
        cells[(offset.y * 10 + offset.x) as usize] = Terrain::Flag;
        let mut map = Map::new(10, cells);

        assert!(map.build_tower(offset), "a flag cell is not water or an existing tower");
        assert_eq!(map.terrain_at(offset), Some(Terrain::Tower));
        assert!(map.destroy_tower(offset));
        assert_eq!(map.terrain_at(offset), Some(Terrain::Flag), "origin terrain must be restored, not flattened to land");
    }

    #[test]
    fn cannot_build_on_water() {
        let mut cells = vec![Terrain::Land; 100];
        cells[0] = Terrain::Water;
        let mut map = Map::new(10, cells);
        assert!(!map.build_tower(Vec2D::new(0, 0)));
    }

    #[test]
    fn water_and_tower_are_blocked_land_and_flag_are_not() {
        let mut cells = vec![Terrain::Land; 9];
        cells[0] = Terrain::Water;
        cells[1] = Terrain::Flag;
        let mut map = Map::new(3, cells);
        assert!(map.is_blocked(Vec2D::new(0, 0)));
        assert!(!map.is_blocked(Vec2D::new(1, 0)));
        map.build_tower(Vec2D::new(2, 0));
        assert!(map.is_blocked(Vec2D::new(2, 0)));
    }
}
