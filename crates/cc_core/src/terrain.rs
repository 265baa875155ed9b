//! Map cell terrain.

use serde::{Deserialize, Serialize};

/// A single map cell's terrain. `#[repr(u8)]` since this tag travels
/// byte-for-byte in the shared-memory transfer snapshot (SPEC_FULL.md §6).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Land,
    Water,
    Flag,
    Tower,
}

impl Terrain {
    /// Land, flag cells, and (transiently) tower cells are otherwise-passable;
    /// only water is hard-blocked for pathing purposes. Tower occupancy is
    /// tracked separately by the path graph's traversability grid, not by
    /// this predicate, since a tower cell is a *dynamic* obstacle.
    pub fn is_water(self) -> bool {
        matches!(self, Terrain::Water)
    }

    /// Valid terrain for a bot's move/blast destination: LAND or FLAG.
    pub fn is_bot_passable(self) -> bool {
        matches!(self, Terrain::Land | Terrain::Flag)
    }
}
