//! Bot and Tower actors with explicit state machines (SPEC_FULL.md §3).

mod bot;
mod tower;

pub use bot::{Bot, BotState};
pub use tower::{Tower, TowerState};
