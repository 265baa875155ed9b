//! Validates player-submitted snapshots and dispatches the validated
//! intents to [`State`] (SPEC_FULL.md §4.3).
//!
//! Grounded on the source's `CommandGiver::runCommands` and its per-player
//! helper methods (`checkBotsAndTowers`, `validBotTask`, position checks).
//! Each responsibility below runs in the order the source runs it; a
//! failure at an earlier step skips only what that step governs (an
//! actor-level failure drops that actor's intent; a cardinality failure
//! drops the whole player's turn).

use std::collections::HashMap;

use cc_core::{flip_bot, flip_tower, ActorId, DoubleVec2D, PlayerId, MAX_NUM_TOWERS};

use crate::errors::ValidationError;
use crate::state::State;
use crate::transfer::{BotView, PlayerStateView, TowerView};

pub struct CommandGiver;

impl CommandGiver {
    /// Runs both players' commands for this turn against `state`,
    /// returning each player's validation errors (empty for a clean turn).
    /// A `skip[p]` player contributes no mutations and no errors at all
    /// (SPEC_FULL.md §4.3 "skipped players contribute nothing").
    pub fn run_commands(
        state: &mut State,
        submissions: &[PlayerStateView; 2],
        skip: [bool; 2],
    ) -> [Vec<ValidationError>; 2] {
        let mut errors = [Vec::new(), Vec::new()];
        for player in [PlayerId::Player1, PlayerId::Player2] {
            if skip[player.index()] {
                continue;
            }
            errors[player.index()] = Self::run_for_player(state, player, &submissions[player.index()]);
        }
        errors
    }

    fn run_for_player(state: &mut State, player: PlayerId, submission: &PlayerStateView) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let authoritative_bots = state.bots_in_order(player);
        let authoritative_towers = state.towers_in_order(player);

        if submission.bots.len() != authoritative_bots.len() {
            errors.push(ValidationError::NumberOfBotsMismatch {
                message: format!(
                    "expected {} bots, got {}",
                    authoritative_bots.len(),
                    submission.bots.len()
                ),
            });
            return errors;
        }
        if submission.towers.len() != authoritative_towers.len() {
            errors.push(ValidationError::NumberOfTowersMismatch {
                message: format!(
                    "expected {} towers, got {}",
                    authoritative_towers.len(),
                    submission.towers.len()
                ),
            });
            return errors;
        }

        let bot_by_id: HashMap<ActorId, usize> =
            authoritative_bots.iter().enumerate().map(|(i, b)| (b.id, i)).collect();

        for claimed in &submission.bots {
            let Some(&i) = bot_by_id.get(&claimed.id) else {
                errors.push(ValidationError::NoAlterBotProperty {
                    actor_id: claimed.id,
                    message: "unknown bot id".to_string(),
                });
                continue;
            };
            let bot = authoritative_bots[i];

            let claimed_position = unflip_bot_position(claimed.position, player);
            if claimed.hp != bot.hp || claimed_position != bot.position || claimed.state != bot.visible_state() {
                errors.push(ValidationError::NoAlterBotProperty {
                    actor_id: bot.id,
                    message: "bot hp/position/state does not match authoritative state".to_string(),
                });
                continue;
            }

            match Self::validate_bot_intent(state, player, claimed) {
                Ok(Some(err)) => errors.push(err),
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        let tower_by_id: HashMap<ActorId, usize> =
            authoritative_towers.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

        for claimed in &submission.towers {
            let Some(&i) = tower_by_id.get(&claimed.id) else {
                errors.push(ValidationError::NoAlterTowerProperty {
                    actor_id: claimed.id,
                    message: "unknown tower id".to_string(),
                });
                continue;
            };
            let tower = authoritative_towers[i];

            let claimed_offset = unflip_tower_position(claimed.position, player);
            if claimed.hp != tower.hp || claimed_offset != tower.offset {
                errors.push(ValidationError::NoAlterTowerProperty {
                    actor_id: tower.id,
                    message: "tower hp/position does not match authoritative state".to_string(),
                });
                continue;
            }

            if claimed.is_blasting {
                let _ = state.blast_actor(player, tower.id);
            }
        }

        errors
    }

    /// Validates and, if valid, dispatches a single bot's intent. Returns
    /// `Ok(Some(error))` for a recoverable per-actor validation failure,
    /// `Ok(None)` for success (including "no intent set"), and `Err` only
    /// to bubble the same per-actor error type through `?`-friendly code
    /// at the call site (kept as a plain return value instead; no
    /// fallible plumbing needed beyond the enum itself).
    fn validate_bot_intent(
        state: &mut State,
        player: PlayerId,
        claimed: &BotView,
    ) -> Result<Option<ValidationError>, ValidationError> {
        let intents_set = [
            claimed.is_blasting,
            claimed.is_transforming,
            !claimed.destination.is_null(),
            !claimed.final_destination.is_null(),
            !claimed.transform_destination.is_null(),
        ];
        let count = intents_set.iter().filter(|&&b| b).count();
        if count > 1 {
            return Ok(Some(ValidationError::NoMultipleBotTask {
                actor_id: claimed.id,
                message: "more than one task issued this turn".to_string(),
            }));
        }
        if count == 0 {
            return Ok(None);
        }

        if claimed.is_blasting {
            let _ = state.blast_actor(player, claimed.id);
            return Ok(None);
        }

        if claimed.is_transforming {
            let position = state.find_bot(player, claimed.id).map(|b| b.position).unwrap_or(DoubleVec2D::NULL);
            if let Some(err) = Self::reject_transform(state, player, claimed.id, position) {
                return Ok(Some(err));
            }
            let _ = state.transform_bot(player, claimed.id);
            return Ok(None);
        }

        if !claimed.destination.is_null() {
            let destination = unflip_bot_position(claimed.destination, player);
            if !state.path_planner().is_valid_bot_position(destination) {
                return Ok(Some(ValidationError::InvalidMovePosition {
                    actor_id: claimed.id,
                    message: "destination is out of range or impassable".to_string(),
                }));
            }
            let _ = state.move_bot(player, claimed.id, destination);
            return Ok(None);
        }

        if !claimed.final_destination.is_null() {
            let destination = unflip_bot_position(claimed.final_destination, player);
            if !state.path_planner().is_valid_bot_position(destination) {
                return Ok(Some(ValidationError::InvalidBlastPosition {
                    actor_id: claimed.id,
                    message: "blast destination is out of range or impassable".to_string(),
                }));
            }
            let _ = state.move_bot_to_blast(player, claimed.id, destination);
            return Ok(None);
        }

        debug_assert!(!claimed.transform_destination.is_null());
        let destination = unflip_bot_position(claimed.transform_destination, player);
        if let Some(err) = Self::reject_transform(state, player, claimed.id, destination) {
            return Ok(Some(err));
        }
        let _ = state.move_bot_to_transform(player, claimed.id, destination);
        Ok(None)
    }

    /// Shared validation for both the instant (`is_transforming`) and
    /// move-then-transform (`transform_destination`) intents: the target
    /// cell must be a valid, free tower offset, and the player must not
    /// already be at the tower cap (SPEC_FULL.md §4.3 steps 4-5).
    fn reject_transform(
        state: &State,
        player: PlayerId,
        actor_id: ActorId,
        destination: DoubleVec2D,
    ) -> Option<ValidationError> {
        if !state.path_planner().is_valid_tower_offset(destination, player) {
            return Some(ValidationError::InvalidTransformPosition {
                actor_id,
                message: "transform destination is not a valid free tower offset".to_string(),
            });
        }
        if state.num_towers(player) >= MAX_NUM_TOWERS {
            return Some(ValidationError::TowerLimitReached {
                actor_id,
                message: "player already has the maximum number of towers".to_string(),
            });
        }
        None
    }
}

fn unflip_bot_position(position: DoubleVec2D, player: PlayerId) -> DoubleVec2D {
    match player {
        PlayerId::Player2 => flip_bot(position),
        _ => position,
    }
}

/// `claimed.position` is a `DoubleVec2D` on the wire (uniform with bots);
/// floor it into a lattice offset before comparing to the authoritative
/// `Vec2D` offset, flipping for player 2 (source's
/// `changeBotToTowerPosition` + `flipTowerPosition`).
fn unflip_tower_position(position: DoubleVec2D, player: PlayerId) -> cc_core::Vec2D {
    let offset = position.floor().to_vec2d();
    match player {
        PlayerId::Player2 => flip_tower(offset),
        _ => offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;
    use crate::transfer::TowerView;

    fn state_with_one_bot(player: PlayerId, position: DoubleVec2D) -> (State, ActorId) {
        let mut state = State::new(Map::empty(20));
        state.seed_starting_bots(0, [DoubleVec2D::new(5.0, 5.0), DoubleVec2D::new(14.0, 14.0)]);
        let id = ActorId::next();
        let bot = crate::actor::Bot::new(id, player, 100, position, 2.0, 3.0, 50);
        state.insert_bot_for_test(bot);
        (state, id)
    }

    fn base_submission(state: &State, player: PlayerId) -> PlayerStateView {
        let bots: Vec<BotView> = state
            .bots_in_order(player)
            .iter()
            .map(|b| {
                let visible_position = match player {
                    PlayerId::Player2 => flip_bot(b.position),
                    _ => b.position,
                };
                BotView::unset_intents(b.id, b.hp, visible_position, b.visible_state())
            })
            .collect();
        let towers: Vec<TowerView> = state
            .towers_in_order(player)
            .iter()
            .map(|t| TowerView {
                id: t.id,
                hp: t.hp,
                position: t.offset.to_double(),
                state: t.state(),
                is_blasting: false,
            })
            .collect();
        PlayerStateView { bots, towers, ..Default::default() }
    }

    #[test]
    fn no_intents_produces_no_mutation_or_error() {
        let (mut state, _id) = state_with_one_bot(PlayerId::Player1, DoubleVec2D::new(5.0, 5.0));
        let submission = base_submission(&state, PlayerId::Player1);
        let submissions = [submission, PlayerStateView::default()];
        let errors = CommandGiver::run_commands(&mut state, &submissions, [false, true]);
        assert!(errors[0].is_empty());
    }

    #[test]
    fn altering_hp_is_flagged_and_actor_is_skipped() {
        let (mut state, id) = state_with_one_bot(PlayerId::Player1, DoubleVec2D::new(5.0, 5.0));
        let mut submission = base_submission(&state, PlayerId::Player1);
        submission.bots[0].hp = 999;
        let submissions = [submission, PlayerStateView::default()];
        let errors = CommandGiver::run_commands(&mut state, &submissions, [false, true]);
        assert_eq!(errors[0].len(), 1);
        assert!(matches!(errors[0][0], ValidationError::NoAlterBotProperty { actor_id, .. } if actor_id == id));
    }

    #[test]
    fn conflicting_intents_are_flagged() {
        let (mut state, _id) = state_with_one_bot(PlayerId::Player1, DoubleVec2D::new(5.0, 5.0));
        let mut submission = base_submission(&state, PlayerId::Player1);
        submission.bots[0].is_blasting = true;
        submission.bots[0].destination = DoubleVec2D::new(6.0, 5.0);
        let submissions = [submission, PlayerStateView::default()];
        let errors = CommandGiver::run_commands(&mut state, &submissions, [false, true]);
        assert_eq!(errors[0].len(), 1);
        assert!(matches!(errors[0][0], ValidationError::NoMultipleBotTask { .. }));
    }

    #[test]
    fn valid_move_is_dispatched() {
        let (mut state, id) = state_with_one_bot(PlayerId::Player1, DoubleVec2D::new(5.0, 5.0));
        let mut submission = base_submission(&state, PlayerId::Player1);
        submission.bots[0].destination = DoubleVec2D::new(8.0, 5.0);
        let submissions = [submission, PlayerStateView::default()];
        let errors = CommandGiver::run_commands(&mut state, &submissions, [false, true]);
        assert!(errors[0].is_empty());
        state.update();
        state.late_update();
        let bot = state.find_bot(PlayerId::Player1, id).unwrap();
        assert_ne!(bot.position, DoubleVec2D::new(5.0, 5.0));
    }

    #[test]
    fn player_two_destination_is_unflipped_before_validation() {
        // `flip_bot`/`flip_tower` fold the global `MAP_SIZE` constant
        // (100), so this test uses a full-size map to keep the flip
        // convention consistent with the authoritative positions below.
        let mut state = State::new(Map::empty(100));
        let id = ActorId::next();
        let bot = crate::actor::Bot::new(id, PlayerId::Player2, 100, DoubleVec2D::new(94.0, 94.0), 2.0, 3.0, 50);
        state.insert_bot_for_test(bot);

        let mut submission = base_submission(&state, PlayerId::Player2);
        // Authoritative destination (90, 94); player 2's own frame sees it
        // flipped. Submitting the flipped form must land the bot on the
        // authoritative cell, not its mirror.
        let authoritative_destination = DoubleVec2D::new(90.0, 94.0);
        submission.bots[0].destination = flip_bot(authoritative_destination);

        let submissions = [PlayerStateView::default(), submission];
        let errors = CommandGiver::run_commands(&mut state, &submissions, [true, false]);
        assert!(errors[1].is_empty());
        state.update();
        state.late_update();
        let bot = state.find_bot(PlayerId::Player2, id).unwrap();
        assert_eq!(bot.position, DoubleVec2D::new(92.0, 94.0));
    }
}
