//! Shared primitives used across the match simulator: coordinate arithmetic,
//! player/actor identity, terrain, coordinate flipping, and the compiled-in
//! default constants for a match.

pub mod constants;
pub mod flip;
pub mod ids;
pub mod terrain;
pub mod vector;

pub use constants::{
    player2_base_position, BLAST_IMPACT_RADIUS, BOT_DAMAGE_POINTS, BOT_MAX_HP,
    BOT_SCORE_MULTIPLIER, BOT_SPAWN_FREQUENCY, BOT_SPEED, GAME_DURATION_MS, MAP_SIZE,
    MAX_NUM_BOTS, MAX_NUM_TOWERS, NUM_BOTS_START, NUM_TURNS, PLAYER1_BASE_POSITION,
    PLAYER_INSTRUCTION_LIMIT_GAME, PLAYER_INSTRUCTION_LIMIT_TURN, SHARED_BUFFER_SIZE,
    SHM_FILE_NAMES, TOWER_DAMAGE_POINTS, TOWER_MAX_HP, TOWER_SCORE_MULTIPLIER,
};
pub use flip::{flip_bot, flip_tower};
pub use ids::{ActorId, ActorType, PlayerId};
pub use terrain::Terrain;
pub use vector::{DoubleVec2D, Vec2D};
