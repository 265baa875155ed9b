//! `MatchConfig`: every tunable threaded through the system, layered
//! compiled-defaults -> config file -> CLI flags (SPEC_FULL.md §4.8).
//!
//! Only the `serde::Deserialize` (config-file) layer lives here; the CLI
//! overlay is `match_runner`'s concern (`clap`, derive API), following the
//! precedence the corpus's own server configuration uses.

use std::path::PathBuf;

use cc_core::{
    BLAST_IMPACT_RADIUS, BOT_SCORE_MULTIPLIER, BOT_SPAWN_FREQUENCY, BOT_SPEED, GAME_DURATION_MS,
    MAP_SIZE, MAX_NUM_BOTS, MAX_NUM_TOWERS, NUM_BOTS_START, NUM_TURNS,
    PLAYER_INSTRUCTION_LIMIT_GAME, PLAYER_INSTRUCTION_LIMIT_TURN, SHARED_BUFFER_SIZE,
    TOWER_SCORE_MULTIPLIER,
};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub num_turns: u64,
    pub game_duration_ms: u64,
    pub player_instruction_limit_turn: u64,
    pub player_instruction_limit_game: u64,
    pub map_size: i64,
    pub max_num_bots: usize,
    pub max_num_towers: usize,
    pub bot_speed: f64,
    pub blast_impact_radius: f64,
    pub num_bots_start: usize,
    pub bot_spawn_frequency: u64,
    pub bot_score_multiplier: u64,
    pub tower_score_multiplier: u64,
    pub shared_buffer_size: usize,

    /// `None` loads the bundled default 100x100 map; `Some` is a path to an
    /// alternate map file, used by tests and custom matches.
    pub map_path: Option<PathBuf>,
    /// argv for each player process: `player_commands[i][0]` is the
    /// executable, the rest its arguments.
    pub player_commands: [Vec<String>; 2],
    pub shared_memory_names: [String; 2],
    pub replay_path: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            num_turns: NUM_TURNS,
            game_duration_ms: GAME_DURATION_MS,
            player_instruction_limit_turn: PLAYER_INSTRUCTION_LIMIT_TURN,
            player_instruction_limit_game: PLAYER_INSTRUCTION_LIMIT_GAME,
            map_size: MAP_SIZE,
            max_num_bots: MAX_NUM_BOTS,
            max_num_towers: MAX_NUM_TOWERS,
            bot_speed: BOT_SPEED,
            blast_impact_radius: BLAST_IMPACT_RADIUS,
            num_bots_start: NUM_BOTS_START,
            bot_spawn_frequency: BOT_SPAWN_FREQUENCY,
            bot_score_multiplier: BOT_SCORE_MULTIPLIER,
            tower_score_multiplier: TOWER_SCORE_MULTIPLIER,
            shared_buffer_size: SHARED_BUFFER_SIZE,
            map_path: None,
            player_commands: [Vec::new(), Vec::new()],
            shared_memory_names: ["cc-match-shm1".to_string(), "cc-match-shm2".to_string()],
            replay_path: PathBuf::from("game.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_compiled_in_constants() {
        let config = MatchConfig::default();
        assert_eq!(config.num_turns, NUM_TURNS);
        assert_eq!(config.map_size, MAP_SIZE);
        assert_eq!(config.shared_buffer_size, SHARED_BUFFER_SIZE);
    }

    #[test]
    fn deserializes_partial_toml_over_defaults() {
        let toml = r#"
            num_turns = 10
            replay_path = "out/replay.bin"
        "#;
        let config: MatchConfig = toml::from_str(toml).expect("valid toml");
        assert_eq!(config.num_turns, 10);
        assert_eq!(config.replay_path, PathBuf::from("out/replay.bin"));
        assert_eq!(config.map_size, MAP_SIZE, "unspecified fields keep their compiled-in default");
    }
}
