//! Per-turn orchestration: runs commands, advances the world, and projects
//! the result back into each player's view (SPEC_FULL.md §4.4).
//!
//! Grounded on the source's `StateSyncer::updateMainState`/
//! `updatePlayerStates`. The one detail its method names don't advertise:
//! player 2's view flips not just each actor's position but the entire
//! terrain grid, indexing it as `map[size-1-i][size-1-j]` rather than just
//! flipping per-cell coordinates, so that row/column order in the
//! flattened `Vec<Terrain>` still reads left-to-right, top-to-bottom from
//! player 2's own vantage point.

use cc_core::{DoubleVec2D, PlayerId, Vec2D};

use crate::command_giver::CommandGiver;
use crate::logger::ReplayLogger;
use crate::state::State;
use crate::transfer::{BotView, PlayerStateView, TowerView};

pub struct StateSyncer;

impl StateSyncer {
    /// Runs one full turn: validates and dispatches both players' intents
    /// against `state`, advances the simulation, settles scores, logs the
    /// result, and returns each player's fresh view for the next turn.
    pub fn run_turn(
        state: &mut State,
        turn: u64,
        submissions: &[PlayerStateView; 2],
        skip: [bool; 2],
        logger: &mut dyn ReplayLogger,
    ) -> [PlayerStateView; 2] {
        let errors = CommandGiver::run_commands(state, submissions, skip);
        for player in [PlayerId::Player1, PlayerId::Player2] {
            for error in &errors[player.index()] {
                logger.log_error(player, turn, error);
            }
        }

        state.update();
        state.late_update();
        state.update_scores();

        let views = [
            Self::build_player_view(state, PlayerId::Player1),
            Self::build_player_view(state, PlayerId::Player2),
        ];
        logger.log_state(turn, &views);
        views
    }

    /// Composes the view `player` sees this turn: own/enemy actors in
    /// `player`'s coordinate frame, and the terrain grid similarly rotated
    /// for player 2 (source's `updatePlayerStates`).
    fn build_player_view(state: &State, player: PlayerId) -> PlayerStateView {
        let enemy = player.opponent();

        let map = Self::project_map(state, player);
        let flag_offsets = state
            .map()
            .flag_offsets()
            .iter()
            .map(|&offset| Self::project_tower_offset(offset, player).to_double())
            .collect();

        let bots = state
            .bots_in_order(player)
            .iter()
            .map(|bot| BotView::unset_intents(bot.id, bot.hp, Self::project_bot(bot.position, player), bot.visible_state()))
            .collect();
        let enemy_bots = state
            .bots_in_order(enemy)
            .iter()
            .map(|bot| BotView::unset_intents(bot.id, bot.hp, Self::project_bot(bot.position, player), bot.visible_state()))
            .collect();

        let towers = state
            .towers_in_order(player)
            .iter()
            .map(|tower| TowerView {
                id: tower.id,
                hp: tower.hp,
                position: Self::project_tower_offset(tower.offset, player).to_double(),
                state: tower.state(),
                is_blasting: false,
            })
            .collect();
        let enemy_towers = state
            .towers_in_order(enemy)
            .iter()
            .map(|tower| TowerView {
                id: tower.id,
                hp: tower.hp,
                position: Self::project_tower_offset(tower.offset, player).to_double(),
                state: tower.state(),
                is_blasting: false,
            })
            .collect();

        PlayerStateView {
            map,
            flag_offsets,
            bots,
            enemy_bots,
            towers,
            enemy_towers,
            scores: Self::project_scores(state, player),
        }
    }

    /// Player 1 sees the authoritative grid unrotated; player 2 sees it
    /// rotated 180 degrees, cell by cell, so its own frame's "up" and
    /// "right" agree with its flipped bot/tower coordinates.
    fn project_map(state: &State, player: PlayerId) -> Vec<cc_core::Terrain> {
        let size = state.map().size();
        let mut cells = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let (sx, sy) = match player {
                    PlayerId::Player1 => (x, y),
                    PlayerId::Player2 => (size - 1 - x, size - 1 - y),
                };
                cells.push(state.map().terrain_at(Vec2D::new(sx, sy)).unwrap_or(cc_core::Terrain::Land));
            }
        }
        cells
    }

    fn project_bot(position: DoubleVec2D, player: PlayerId) -> DoubleVec2D {
        match player {
            PlayerId::Player2 => cc_core::flip_bot(position),
            PlayerId::Player1 => position,
        }
    }

    fn project_tower_offset(offset: Vec2D, player: PlayerId) -> Vec2D {
        match player {
            PlayerId::Player2 => cc_core::flip_tower(offset),
            PlayerId::Player1 => offset,
        }
    }

    /// Scores are always reported `[own, enemy]` from the recipient's
    /// point of view (source's `player_states[i].scores` ordering).
    fn project_scores(state: &State, player: PlayerId) -> [u64; 2] {
        let scores = state.scores();
        match player {
            PlayerId::Player1 => scores,
            PlayerId::Player2 => [scores[1], scores[0]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use crate::map::Map;
    use cc_core::{ActorId, Terrain};

    fn flagged_map(size: i64, flag: Vec2D) -> Map {
        let mut cells = vec![Terrain::Land; (size * size) as usize];
        cells[(flag.y * size + flag.x) as usize] = Terrain::Flag;
        Map::new(size, cells)
    }

    #[test]
    fn player_two_view_sees_own_bot_in_flipped_frame() {
        let mut state = State::new(Map::empty(20));
        state.seed_starting_bots(1, [DoubleVec2D::new(1.0, 1.0), DoubleVec2D::new(18.0, 18.0)]);
        let views = StateSyncer::run_turn(
            &mut state,
            0,
            &[PlayerStateView::default(), PlayerStateView::default()],
            [true, true],
            &mut NullLogger,
        );
        assert_eq!(views[1].bots.len(), 1);
        assert_eq!(views[1].bots[0].position, cc_core::flip_bot(DoubleVec2D::new(18.0, 18.0)));
    }

    #[test]
    fn player_two_map_is_rotated_180_degrees() {
        let mut state = State::new(flagged_map(4, Vec2D::new(0, 0)));
        let views = StateSyncer::run_turn(
            &mut state,
            0,
            &[PlayerStateView::default(), PlayerStateView::default()],
            [true, true],
            &mut NullLogger,
        );
        // The flag sits at (0,0) authoritatively; player 2's rotated grid
        // should show it at the opposite corner, index (3,3) in a 4x4 grid.
        let rotated_index = 3 * 4 + 3;
        assert_eq!(views[1].map[rotated_index], Terrain::Flag);
        assert_eq!(views[0].map[0], Terrain::Flag);
    }

    #[test]
    fn enemy_bots_appear_in_the_view_too() {
        let mut state = State::new(Map::empty(20));
        state.seed_starting_bots(2, [DoubleVec2D::new(1.0, 1.0), DoubleVec2D::new(18.0, 18.0)]);
        let views = StateSyncer::run_turn(
            &mut state,
            0,
            &[PlayerStateView::default(), PlayerStateView::default()],
            [true, true],
            &mut NullLogger,
        );
        assert_eq!(views[0].enemy_bots.len(), 2);
        assert_eq!(views[1].enemy_bots.len(), 2);
    }

    #[test]
    fn scores_are_reported_own_then_enemy() {
        let mut state = State::new(Map::empty(20));
        let bot = crate::actor::Bot::new(ActorId::next(), PlayerId::Player1, 100, DoubleVec2D::new(5.0, 5.0), 2.0, 3.0, 50);
        state.insert_bot_for_test(bot);
        let views = StateSyncer::run_turn(
            &mut state,
            0,
            &[PlayerStateView::default(), PlayerStateView::default()],
            [true, true],
            &mut NullLogger,
        );
        assert_eq!(views[0].scores, state.scores());
        assert_eq!(views[1].scores, [state.scores()[1], state.scores()[0]]);
    }
}
