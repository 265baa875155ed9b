//! The `ReplayLogger` façade trait (SPEC_FULL.md §4.7).
//!
//! `StateSyncer` calls into this trait every turn; `MainDriver` (in
//! `cc_drivers`) owns the concrete logger instance and hands a trait-object
//! reference down through `StateSyncer::run_turn`, mirroring the source's
//! `logger::ILogger` seam without pulling the protobuf-backed implementation
//! (in `cc_logger`) into this crate's dependency graph.

use cc_core::PlayerId;

use crate::errors::ValidationError;
use crate::transfer::PlayerStateView;

/// Accumulates per-turn state, instruction counts, and errors, and
/// eventually serializes them into the replay's wire format.
pub trait ReplayLogger {
    /// Appends a per-turn frame holding both players' actor snapshots.
    fn log_state(&mut self, turn: u64, snapshots: &[PlayerStateView; 2]);

    /// Appends this player's executed-instruction count for this turn.
    fn log_instruction_count(&mut self, player: PlayerId, turn: u64, count: u64);

    /// Records an occurrence of `error` against `player` for `turn`. The
    /// first occurrence of a given error variant assigns it a stable small
    /// integer code in the logger's error taxonomy table.
    fn log_error(&mut self, player: PlayerId, turn: u64, error: &ValidationError);

    /// Records the match's terminal summary.
    fn log_final_game_params(&mut self, winner: PlayerId, scores: [u64; 2]);

    /// Serializes everything accumulated so far and flushes it to `writer`.
    /// `NullLogger` and other no-op implementations may leave this a no-op.
    fn write(&mut self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        let _ = writer;
        Ok(())
    }
}

/// No-op implementation for tests and unit suites (PathPlanner,
/// CommandGiver) that don't want replay side effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl ReplayLogger for NullLogger {
    fn log_state(&mut self, _turn: u64, _snapshots: &[PlayerStateView; 2]) {}
    fn log_instruction_count(&mut self, _player: PlayerId, _turn: u64, _count: u64) {}
    fn log_error(&mut self, _player: PlayerId, _turn: u64, _error: &ValidationError) {}
    fn log_final_game_params(&mut self, _winner: PlayerId, _scores: [u64; 2]) {}
}
