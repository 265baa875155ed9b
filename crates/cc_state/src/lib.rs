//! Authoritative match state: the map, path planner, actor state machines,
//! score accounting, command validation, and per-turn orchestration
//! (SPEC_FULL.md §2-§4).

pub mod actor;
pub mod command_giver;
pub mod deferred;
pub mod errors;
pub mod logger;
pub mod map;
pub mod pathing;
pub mod score;
pub mod state;
pub mod state_syncer;
pub mod transfer;

pub use actor::{Bot, BotState, Tower, TowerState};
pub use command_giver::CommandGiver;
pub use deferred::DeferredEffect;
pub use errors::ValidationError;
pub use logger::{NullLogger, ReplayLogger};
pub use map::Map;
pub use pathing::PathPlanner;
pub use score::ScoreManager;
pub use state::State;
pub use state_syncer::StateSyncer;
pub use transfer::{BotView, PlayerStateView, TowerView, TransferState};
