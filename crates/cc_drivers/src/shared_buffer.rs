//! The cross-process transport record placed in shared memory
//! (SPEC_FULL.md §4.5, §6).
//!
//! `is_player_running` is the baton: the host sets it to hand a turn to the
//! player, the player clears it on completion. Every other field the two
//! sides exchange (instruction counters, the world snapshot) is only safe
//! to read after observing the baton's release/acquire pairing (SPEC_FULL.md
//! §5 "Hand-off protocol").

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use cc_state::TransferState;

#[repr(C)]
pub struct SharedBuffer {
    pub is_player_running: AtomicBool,
    pub turn_instruction_counter: AtomicU64,
    pub game_instruction_counter: AtomicU64,
    pub snapshot: TransferState,
}

impl Default for SharedBuffer {
    fn default() -> Self {
        SharedBuffer {
            is_player_running: AtomicBool::new(false),
            turn_instruction_counter: AtomicU64::new(0),
            game_instruction_counter: AtomicU64::new(0),
            snapshot: TransferState::default(),
        }
    }
}

impl SharedBuffer {
    /// True once the player has cleared the baton (`Acquire`, pairs with the
    /// player's release store on completion).
    pub fn player_finished(&self) -> bool {
        !self.is_player_running.load(Ordering::Acquire)
    }

    /// Hands the turn to the player (`Release`, pairs with the player's
    /// acquire load before it reads the snapshot).
    pub fn start_player_turn(&self) {
        self.is_player_running.store(true, Ordering::Release);
    }

    /// Clears the baton without waiting for the player, used when the host
    /// abandons the turn on cancellation (SPEC_FULL.md §4.6).
    pub fn cancel_player_turn(&self) {
        self.is_player_running.store(false, Ordering::Release);
    }

    /// Resets the per-turn instruction counter; the per-game counter is
    /// cumulative and never reset mid-match.
    pub fn reset_turn_counter(&self) {
        self.turn_instruction_counter.store(0, Ordering::Release);
    }

    pub fn turn_instruction_count(&self) -> u64 {
        self.turn_instruction_counter.load(Ordering::Acquire)
    }

    pub fn game_instruction_count(&self) -> u64 {
        self.game_instruction_counter.load(Ordering::Acquire)
    }
}
