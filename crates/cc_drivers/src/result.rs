//! The match's terminal outcome (SPEC_FULL.md §4.6, §7).

use cc_core::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinType {
    Score,
    Timeout,
    ExceededInstructionLimit,
    /// Match ended via cancellation; no winner is meaningful (S7).
    None,
}

/// Mirrors the resource-failure error class plus the two steady states
/// (SPEC_FULL.md §7 "Error taxonomy implementation").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Normal,
    Timeout,
    ExceededInstructionLimit,
    RuntimeError,
    /// The match was cancelled before this player's result was decided.
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerResult {
    pub status: PlayerStatus,
    pub score: u64,
}

impl PlayerResult {
    pub fn undefined() -> Self {
        PlayerResult { status: PlayerStatus::Undefined, score: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// `None` for a tie or an undecided (cancelled) match.
    pub winner: Option<PlayerId>,
    pub win_type: WinType,
    pub player_results: [PlayerResult; 2],
}
