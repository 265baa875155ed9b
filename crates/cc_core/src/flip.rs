//! Player-2 coordinate flipping, centralized in one place per SPEC_FULL.md
//! §9 ("off-by-one errors here are the source's most common bugs").
//!
//! Bots live in real-valued space and flip with the `MAP_SIZE - x` rule;
//! tower offsets live in integer lattice space and flip with the
//! `MAP_SIZE - 1 - x` rule, because a tower offset addresses a unit cell
//! rather than a point.

use crate::constants::MAP_SIZE;
use crate::vector::{DoubleVec2D, Vec2D};

/// Flips a bot (real-valued) position between player-1 and player-2 frames.
/// Self-inverse: applying it twice returns the original position.
pub fn flip_bot(pos: DoubleVec2D) -> DoubleVec2D {
    DoubleVec2D::new(MAP_SIZE as f64 - pos.x, MAP_SIZE as f64 - pos.y)
}

/// Flips a tower's integer lattice offset between player-1 and player-2
/// frames. Self-inverse.
pub fn flip_tower(offset: Vec2D) -> Vec2D {
    Vec2D::new(MAP_SIZE - 1 - offset.x, MAP_SIZE - 1 - offset.y)
}
