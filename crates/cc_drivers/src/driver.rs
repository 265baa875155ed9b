//! The turn loop (SPEC_FULL.md §4.6).
//!
//! `MainDriver` owns the two players' shared-memory regions and the replay
//! logger for the match's duration (SPEC_FULL.md §3 "Lifecycle"). Each
//! turn: hand the baton to player 1, wait; hand it to player 2, wait;
//! check budgets and the deadline at every wait; if both players are
//! within budget, run `StateSyncer` over the authoritative `State` and
//! publish the refreshed snapshots back into shared memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cc_core::PlayerId;
use cc_state::{PlayerStateView, ReplayLogger, State, StateSyncer, TransferState};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::config::MatchConfig;
use crate::errors::HostError;
use crate::result::{GameResult, PlayerResult, PlayerStatus, WinType};
use crate::shared_memory_main::SharedMemoryMain;
use crate::timer::Timer;

pub struct MainDriver {
    config: MatchConfig,
    state: State,
    logger: Box<dyn ReplayLogger>,
    shared: [SharedMemoryMain; 2],
    child_pids: [i32; 2],
    cancelled: Arc<AtomicBool>,
}

impl MainDriver {
    pub fn new(
        config: MatchConfig,
        state: State,
        logger: Box<dyn ReplayLogger>,
        shared: [SharedMemoryMain; 2],
        child_pids: [i32; 2],
    ) -> Self {
        MainDriver { config, state, logger, shared, child_pids, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// A clone of this match's cooperative cancellation flag. Setting it
    /// requests a stop at the next suspension point (SPEC_FULL.md §5).
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the match to completion (or to an early terminal outcome) and
    /// returns the result. Consumes `self`: shared memory and the logger
    /// are scoped to a single match.
    pub fn start(mut self) -> Result<GameResult, HostError> {
        let timed_out = Arc::new(AtomicBool::new(false));
        let timed_out_for_timer = timed_out.clone();
        let deadline = Timer::start(Duration::from_millis(self.config.game_duration_ms), move || {
            timed_out_for_timer.store(true, Ordering::Release);
        });

        let result = self.run_turns(&timed_out);
        deadline.stop();
        if result.is_ok() {
            self.flush_replay()?;
        }
        result
    }

    /// Serializes everything the logger accumulated and writes it to
    /// `config.replay_path`, once, at match end (SPEC_FULL.md §4.6, §4.7
    /// "not incrementally, avoiding partial-write corruption").
    fn flush_replay(&mut self) -> Result<(), HostError> {
        let mut file = std::fs::File::create(&self.config.replay_path)
            .map_err(HostError::ReplayWrite)?;
        self.logger.write(&mut file).map_err(HostError::ReplayWrite)
    }

    fn run_turns(&mut self, timed_out: &AtomicBool) -> Result<GameResult, HostError> {
        for turn in 0..self.config.num_turns {
            let mut skip = [false, false];
            let mut exceeded = [false, false];

            for player in [PlayerId::Player1, PlayerId::Player2] {
                let idx = player.index();
                self.shared[idx].buffer().reset_turn_counter();
                self.shared[idx].buffer().start_player_turn();

                match self.wait_for_baton(idx, timed_out) {
                    BatonOutcome::Released => {}
                    BatonOutcome::Cancelled => {
                        self.shared[idx].buffer().cancel_player_turn();
                        return Ok(GameResult {
                            winner: None,
                            win_type: WinType::None,
                            player_results: [PlayerResult::undefined(), PlayerResult::undefined()],
                        });
                    }
                    BatonOutcome::TimedOut => {
                        self.send_sigterm(idx);
                        return Ok(self.timeout_result(player.opponent()));
                    }
                }

                let game_count = self.shared[idx].buffer().game_instruction_count();
                if game_count > self.config.player_instruction_limit_game {
                    exceeded[idx] = true;
                } else if self.shared[idx].buffer().turn_instruction_count()
                    > self.config.player_instruction_limit_turn
                {
                    skip[idx] = true;
                }
                self.logger.log_instruction_count(
                    player,
                    turn,
                    self.shared[idx].buffer().turn_instruction_count(),
                );
            }

            if exceeded[0] || exceeded[1] {
                return Ok(self.instruction_limit_result(exceeded));
            }

            let submissions = [
                PlayerStateView::from(&self.shared[0].buffer().snapshot),
                PlayerStateView::from(&self.shared[1].buffer().snapshot),
            ];
            let views = StateSyncer::run_turn(&mut self.state, turn, &submissions, skip, self.logger.as_mut());
            self.shared[0].write_snapshot(&TransferState::from(&views[0]));
            self.shared[1].write_snapshot(&TransferState::from(&views[1]));
        }

        Ok(self.final_score_result())
    }

    fn wait_for_baton(&self, idx: usize, timed_out: &AtomicBool) -> BatonOutcome {
        loop {
            if self.shared[idx].buffer().player_finished() {
                return BatonOutcome::Released;
            }
            if self.cancelled.load(Ordering::Acquire) {
                return BatonOutcome::Cancelled;
            }
            if timed_out.load(Ordering::Acquire) {
                return BatonOutcome::TimedOut;
            }
            std::thread::yield_now();
        }
    }

    fn send_sigterm(&self, idx: usize) {
        let _ = kill(Pid::from_raw(self.child_pids[idx]), Signal::SIGTERM);
    }

    fn timeout_result(&self, winner: PlayerId) -> GameResult {
        let loser = winner.opponent();
        let mut player_results =
            [PlayerResult { status: PlayerStatus::Normal, score: 0 }, PlayerResult { status: PlayerStatus::Normal, score: 0 }];
        player_results[loser.index()].status = PlayerStatus::Timeout;
        let scores = self.state.scores();
        player_results[0].score = scores[0];
        player_results[1].score = scores[1];
        GameResult { winner: Some(winner), win_type: WinType::Timeout, player_results }
    }

    fn instruction_limit_result(&self, exceeded: [bool; 2]) -> GameResult {
        let scores = self.state.scores();
        let mut player_results = [
            PlayerResult { status: PlayerStatus::Normal, score: scores[0] },
            PlayerResult { status: PlayerStatus::Normal, score: scores[1] },
        ];
        for (idx, result) in player_results.iter_mut().enumerate() {
            if exceeded[idx] {
                result.status = PlayerStatus::ExceededInstructionLimit;
            }
        }
        let winner = match (exceeded[0], exceeded[1]) {
            (true, true) => None,
            (true, false) => Some(PlayerId::Player2),
            (false, true) => Some(PlayerId::Player1),
            (false, false) => unreachable!("instruction_limit_result called with no exceedance"),
        };
        GameResult { winner, win_type: WinType::ExceededInstructionLimit, player_results }
    }

    /// Computed once the final turn's `lateUpdate` has settled. Emits the
    /// match's terminal summary to the logger (SPEC_FULL.md §4.6 "After
    /// NUM_TURNS").
    fn final_score_result(&mut self) -> GameResult {
        let scores = self.state.scores();
        let winner = match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Some(PlayerId::Player1),
            std::cmp::Ordering::Less => Some(PlayerId::Player2),
            std::cmp::Ordering::Equal => None,
        };
        let player_results = [
            PlayerResult { status: PlayerStatus::Normal, score: scores[0] },
            PlayerResult { status: PlayerStatus::Normal, score: scores[1] },
        ];
        self.logger.log_final_game_params(winner.unwrap_or(PlayerId::PlayerNull), scores);
        GameResult { winner, win_type: WinType::Score, player_results }
    }
}

enum BatonOutcome {
    Released,
    Cancelled,
    TimedOut,
}
