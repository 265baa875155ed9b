//! Loads the match's terrain grid, either the bundled default or an
//! alternate map file (SPEC_FULL.md §4.8 `MatchConfig::map_path`).
//!
//! File format: `size` rows of `size` single-character cells. `.` is LAND,
//! `~` is WATER, `F` is FLAG, `T` is TOWER (a pre-built tower present from
//! turn 0). Blank lines and lines starting with `#` are skipped, so a map
//! file can carry a comment header.

use std::path::Path;

use cc_core::Terrain;
use cc_state::Map;

#[derive(Debug)]
pub struct MapFileError(String);

impl std::fmt::Display for MapFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed map file: {}", self.0)
    }
}

impl std::error::Error for MapFileError {}

fn cell(c: char) -> Result<Terrain, MapFileError> {
    match c {
        '.' => Ok(Terrain::Land),
        '~' => Ok(Terrain::Water),
        'F' => Ok(Terrain::Flag),
        'T' => Ok(Terrain::Tower),
        other => Err(MapFileError(format!("unrecognized cell character {other:?}"))),
    }
}

pub fn load(path: &Path) -> Result<Map, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    let size = rows.len() as i64;
    let mut cells = Vec::with_capacity((size * size) as usize);
    for row in &rows {
        if row.chars().count() as i64 != size {
            return Err(Box::new(MapFileError(format!(
                "map must be square: expected {size} columns, row {:?} has {}",
                row,
                row.chars().count()
            ))));
        }
        for c in row.chars() {
            cells.push(cell(c)?);
        }
    }
    Ok(Map::new(size, cells))
}

/// The bundled default: an open `MAP_SIZE x MAP_SIZE` field of LAND with a
/// single FLAG cell at the center, symmetric under the player-2 flip.
pub fn default_map() -> Map {
    let size = cc_core::MAP_SIZE;
    let mut cells = vec![Terrain::Land; (size * size) as usize];
    let center = size / 2;
    cells[(center * size + center) as usize] = Terrain::Flag;
    Map::new(size, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_has_exactly_one_flag() {
        let map = default_map();
        assert_eq!(map.flag_offsets().len(), 1);
    }

    #[test]
    fn loads_a_small_square_map_with_all_terrain_kinds() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("match_runner_test_map_{}.txt", std::process::id()));
        std::fs::write(&path, "# a tiny test map\n.~F\nT..\n...\n").unwrap();
        let map = load(&path).unwrap();
        assert_eq!(map.size(), 3);
        assert_eq!(map.terrain_at(cc_core::Vec2D::new(1, 0)), Some(Terrain::Water));
        assert_eq!(map.terrain_at(cc_core::Vec2D::new(2, 0)), Some(Terrain::Flag));
        assert_eq!(map.terrain_at(cc_core::Vec2D::new(0, 1)), Some(Terrain::Tower));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_a_non_square_map() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("match_runner_test_bad_map_{}.txt", std::process::id()));
        std::fs::write(&path, "..\n...\n").unwrap();
        assert!(load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
