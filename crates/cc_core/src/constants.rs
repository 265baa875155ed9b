//! Match-wide tunable constants (spec.md §6).
//!
//! These are the compiled-in defaults; [`crate::MatchConfig`] lets a config
//! file or CLI flag override any of them for a particular run.

/// Side length of the square map.
pub const MAP_SIZE: i64 = 100;

/// Maximum live bots a single player may have at once.
pub const MAX_NUM_BOTS: usize = 500;

/// Maximum live towers a single player may have at once. The source leaves
/// this implementation-defined; fixed here, proportional to `MAX_NUM_BOTS`
/// and generous for a 100x100 map (see SPEC_FULL.md §9).
pub const MAX_NUM_TOWERS: usize = 100;

/// Bots each player starts the match with.
pub const NUM_BOTS_START: usize = 20;

/// Referenced by the source but never wired to continuing spawns; this
/// implementation treats it as a no-op (see SPEC_FULL.md §9 Open Questions).
pub const BOT_SPAWN_FREQUENCY: u64 = 1;

/// Per-turn movement budget, in Euclidean distance units, for a bot.
pub const BOT_SPEED: f64 = 2.0;

/// Euclidean blast radius shared by bots and towers at default config.
pub const BLAST_IMPACT_RADIUS: f64 = 3.0;

/// Score awarded per turn for each bot standing on a flag cell.
pub const BOT_SCORE_MULTIPLIER: u64 = 10;

/// Score awarded per turn for each tower standing on a flag cell.
pub const TOWER_SCORE_MULTIPLIER: u64 = 25;

/// Turns in a match.
pub const NUM_TURNS: u64 = 1000;

/// Wall-clock deadline for an entire match.
pub const GAME_DURATION_MS: u64 = 50_000;

/// Executed-instruction budget per player per turn.
pub const PLAYER_INSTRUCTION_LIMIT_TURN: u64 = 10_000_000;

/// Executed-instruction budget per player for the whole match.
pub const PLAYER_INSTRUCTION_LIMIT_GAME: u64 = 100_000_000;

/// Size in bytes of each player's shared-memory region.
pub const SHARED_BUFFER_SIZE: usize = 65_535;

/// Filenames the host writes the shared-memory region names into at launch.
pub const SHM_FILE_NAMES: [&str; 2] = ["shm1.txt", "shm2.txt"];

/// Player 1's starting base, in player-1 (authoritative) coordinates.
pub const PLAYER1_BASE_POSITION: crate::Vec2D = crate::Vec2D::new(5, 5);

/// Player 2's starting base, derived by flipping player 1's base.
pub const fn player2_base_position() -> crate::Vec2D {
    crate::Vec2D::new(MAP_SIZE - 1 - 5, MAP_SIZE - 1 - 5)
}

/// Starting hp for a bot spawned at match start. Not itemized in spec.md's
/// constant table; fixed at a value consistent with its worked examples
/// (SPEC_FULL.md §8 scenarios S5/S6).
pub const BOT_MAX_HP: u64 = 100;

/// Damage points a bot's blast deals. See `BOT_MAX_HP`.
pub const BOT_DAMAGE_POINTS: u64 = 50;

/// Max hp of a tower, including one built by a transforming bot.
pub const TOWER_MAX_HP: u64 = 200;

/// Damage points a tower's blast deals.
pub const TOWER_DAMAGE_POINTS: u64 = 80;
