//! Bot actor and its state machine (SPEC_FULL.md §3, §4.3).
//!
//! Grounded on the source's `Bot`/`BotState` hierarchy
//! (`state/actor/bot.{h,cpp}`, `state/actor/bot_states/*`). The per-state
//! `update` bodies below fill in the source's movement TODOs and its bot
//! blast-damage TODO (kept as a stub there; SPEC_FULL.md §4.3 "Blast
//! semantics" spells out that bots deal area damage on blast same as
//! towers). Back-references to `State` are replaced by a read-only
//! `PathPlanner` borrow and a list of returned [`DeferredEffect`]s,
//! following SPEC_FULL.md §4.2.

use crate::deferred::DeferredEffect;
use crate::pathing::PathPlanner;
use cc_core::{ActorId, DoubleVec2D, PlayerId};

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotState {
    Idle,
    Move,
    MoveToBlast,
    MoveToTransform,
    Blast,
    Transform,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Bot {
    pub id: ActorId,
    pub player_id: PlayerId,
    pub hp: u64,
    pub max_hp: u64,
    damage_incurred: u64,
    pub position: DoubleVec2D,
    pub speed: f64,
    pub blast_range: f64,
    pub damage_points: u64,
    state: BotState,
    destination: Option<DoubleVec2D>,
    final_destination: Option<DoubleVec2D>,
    transform_destination: Option<DoubleVec2D>,
    is_blasting: bool,
    is_transforming: bool,
    new_position: Option<DoubleVec2D>,
}

impl Bot {
    pub fn new(
        id: ActorId,
        player_id: PlayerId,
        hp: u64,
        position: DoubleVec2D,
        speed: f64,
        blast_range: f64,
        damage_points: u64,
    ) -> Self {
        Bot {
            id,
            player_id,
            hp,
            max_hp: hp,
            damage_incurred: 0,
            position,
            speed,
            blast_range,
            damage_points,
            state: BotState::Idle,
            destination: None,
            final_destination: None,
            transform_destination: None,
            is_blasting: false,
            is_transforming: false,
            new_position: None,
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    /// The state name a player is shown, collapsing the in-transit variants
    /// (SPEC_FULL.md §4.3 "State-tamper state-name mapping").
    pub fn visible_state(&self) -> BotState {
        match self.state {
            BotState::MoveToBlast => BotState::Blast,
            BotState::MoveToTransform => BotState::Transform,
            other => other,
        }
    }

    fn clear_intents(&mut self) {
        self.destination = None;
        self.final_destination = None;
        self.transform_destination = None;
    }

    /// Sets a pure-move intent, clearing any other pending intent
    /// (invariant: at most one active at a time).
    pub fn set_destination(&mut self, destination: DoubleVec2D) {
        self.clear_intents();
        self.destination = Some(destination);
    }

    pub fn set_final_destination(&mut self, destination: DoubleVec2D) {
        self.clear_intents();
        self.final_destination = Some(destination);
    }

    pub fn set_transform_destination(&mut self, destination: DoubleVec2D) {
        self.clear_intents();
        self.transform_destination = Some(destination);
    }

    pub fn request_blast(&mut self) {
        self.clear_intents();
        self.is_blasting = true;
    }

    /// Instant transform-in-place intent, with no preceding move.
    pub fn request_transform(&mut self) {
        self.clear_intents();
        self.is_transforming = true;
    }

    pub fn damage(&mut self, amount: u64) {
        self.damage_incurred = self.damage_incurred.saturating_add(amount);
    }

    fn latest_hp(&self) -> u64 {
        self.hp.saturating_sub(self.damage_incurred)
    }

    /// Runs the state machine to a fixed point for this turn, returning
    /// every deferred effect produced along the way.
    pub fn update(&mut self, path_planner: &PathPlanner) -> Vec<DeferredEffect> {
        let mut effects = Vec::new();
        while let Some(next) = self.update_once(path_planner, &mut effects) {
            self.state = next;
            self.on_enter(path_planner, &mut effects);
        }
        effects
    }

    fn on_enter(&mut self, path_planner: &PathPlanner, effects: &mut Vec<DeferredEffect>) {
        match self.state {
            BotState::Blast => {
                self.damage(self.hp);
                effects.push(DeferredEffect::ApplyBlastDamage {
                    source: self.id,
                    owner: self.player_id,
                    center: self.position.floor().to_vec2d(),
                });
            }
            BotState::Transform => {
                // Offset uses the player-perspective convention (floor for
                // player 1, ceil-minus-one for player 2) so both players
                // address the same physical cell (SPEC_FULL.md §4.1).
                let offset = path_planner.offset_for(self.position, self.player_id);
                effects.push(DeferredEffect::SpawnTowerFromBot {
                    bot_id: self.id,
                    owner: self.player_id,
                    offset,
                });
                effects.push(DeferredEffect::RemoveActor { actor_id: self.id });
            }
            _ => {}
        }
    }

    fn update_once(
        &mut self,
        path_planner: &PathPlanner,
        _effects: &mut [DeferredEffect],
    ) -> Option<BotState> {
        if self.hp == 0 && self.state != BotState::Dead {
            return Some(BotState::Dead);
        }

        match self.state {
            BotState::Idle => {
                if self.is_blasting {
                    Some(BotState::Blast)
                } else if self.is_transforming {
                    Some(BotState::Transform)
                } else if self.destination.is_some() {
                    Some(BotState::Move)
                } else if self.final_destination.is_some() {
                    Some(BotState::MoveToBlast)
                } else if self.transform_destination.is_some() {
                    Some(BotState::MoveToTransform)
                } else {
                    None
                }
            }
            BotState::Move => {
                let destination = self.destination?;
                if self.position == destination {
                    self.destination = None;
                    return Some(BotState::Idle);
                }
                match path_planner.next_position(self.position, destination, self.speed) {
                    None => {
                        self.destination = None;
                        Some(BotState::Idle)
                    }
                    Some(next) => {
                        if next != self.position {
                            self.new_position = Some(next);
                        }
                        None
                    }
                }
            }
            BotState::MoveToBlast => {
                // Arrival is only detected on the turn *after* the final
                // step commits (late_update moves self.position to
                // `destination`), mirroring `Move`'s Idle transition — the
                // effect-emitting transition into Blast must see the real
                // arrival position, not a step still pending in
                // `new_position`.
                let destination = self.final_destination?;
                if self.position == destination {
                    return Some(BotState::Blast);
                }
                match path_planner.next_position(self.position, destination, self.speed) {
                    None => {
                        self.final_destination = None;
                        Some(BotState::Idle)
                    }
                    Some(next) => {
                        if next != self.position {
                            self.new_position = Some(next);
                        }
                        None
                    }
                }
            }
            BotState::MoveToTransform => {
                // Same reasoning as `MoveToBlast`: wait a turn for the
                // committed position before transitioning, so the tower
                // offset on_enter computes is the actual arrival cell.
                let destination = self.transform_destination?;
                if self.position == destination {
                    return Some(BotState::Transform);
                }
                match path_planner.next_position(self.position, destination, self.speed) {
                    None => {
                        self.transform_destination = None;
                        Some(BotState::Idle)
                    }
                    Some(next) => {
                        if next != self.position {
                            self.new_position = Some(next);
                        }
                        None
                    }
                }
            }
            BotState::Blast => Some(BotState::Dead),
            BotState::Transform => None,
            BotState::Dead => None,
        }
    }

    /// Settles this turn's hp loss and commits any pending movement.
    /// Returns the position before and after the move, if one happened, so
    /// `State` can reconcile flag-area scoring against the map.
    pub fn late_update(&mut self) -> Option<(DoubleVec2D, DoubleVec2D)> {
        self.hp = self.latest_hp();
        self.damage_incurred = 0;

        if self.hp == 0 && self.state != BotState::Dead {
            self.state = BotState::Dead;
            return None;
        }

        if let Some(next_position) = self.new_position.take() {
            let previous = self.position;
            self.position = next_position;
            return Some((previous, next_position));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;

    fn planner() -> PathPlanner {
        PathPlanner::new(&Map::empty(20))
    }

    #[test]
    fn idle_bot_with_destination_transitions_to_move() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(0.0, 0.0), 2.0, 3.0, 10);
        bot.set_destination(DoubleVec2D::new(5.0, 0.0));
        bot.update(&pp);
        assert_eq!(bot.state(), BotState::Move);
    }

    #[test]
    fn move_commits_position_only_after_late_update() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(0.0, 0.0), 2.0, 3.0, 10);
        bot.set_destination(DoubleVec2D::new(5.0, 0.0));
        bot.update(&pp);
        assert_eq!(bot.position, DoubleVec2D::new(0.0, 0.0));
        bot.late_update();
        assert_eq!(bot.position, DoubleVec2D::new(2.0, 0.0));
    }

    #[test]
    fn blast_drains_hp_and_emits_damage_effect() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(5.0, 5.0), 2.0, 3.0, 50);
        bot.request_blast();
        let effects = bot.update(&pp);
        assert_eq!(bot.state(), BotState::Dead);
        assert!(effects
            .iter()
            .any(|e| matches!(e, DeferredEffect::ApplyBlastDamage { .. })));
        bot.late_update();
        assert_eq!(bot.hp, 0);
    }

    #[test]
    fn visible_state_collapses_in_transit_variants() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(0.0, 0.0), 2.0, 3.0, 10);
        bot.set_final_destination(DoubleVec2D::new(5.0, 0.0));
        bot.update(&pp);
        assert_eq!(bot.state(), BotState::MoveToBlast);
        assert_eq!(bot.visible_state(), BotState::Blast);
    }

    #[test]
    fn move_to_blast_arrives_and_blasts_after_final_step_commits() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(0.0, 0.0), 2.0, 3.0, 50);
        bot.set_final_destination(DoubleVec2D::new(2.0, 0.0));

        // Turn 1: one step of size `speed` lands exactly on the
        // destination, but the state machine must not fire Blast until
        // the move is actually committed.
        let effects = bot.update(&pp);
        assert_eq!(bot.state(), BotState::MoveToBlast);
        assert!(effects.is_empty());
        bot.late_update();
        assert_eq!(bot.position, DoubleVec2D::new(2.0, 0.0));

        // Turn 2: now that the arrival position is authoritative, the
        // bot transitions into Blast and emits its damage effect.
        let effects = bot.update(&pp);
        assert_eq!(bot.state(), BotState::Dead);
        assert!(effects
            .iter()
            .any(|e| matches!(e, DeferredEffect::ApplyBlastDamage { .. })));
    }

    #[test]
    fn move_to_transform_uses_the_committed_arrival_position() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(3), PlayerId::Player1, 100, DoubleVec2D::new(0.0, 0.0), 2.0, 3.0, 10);
        bot.set_transform_destination(DoubleVec2D::new(2.0, 0.0));

        bot.update(&pp);
        assert_eq!(bot.state(), BotState::MoveToTransform);
        bot.late_update();
        assert_eq!(bot.position, DoubleVec2D::new(2.0, 0.0));

        let effects = bot.update(&pp);
        assert_eq!(bot.state(), BotState::Transform);
        assert!(effects.iter().any(|e| matches!(
            e,
            DeferredEffect::SpawnTowerFromBot { offset, .. } if *offset == cc_core::Vec2D::new(2, 0)
        )));
    }

    #[test]
    fn move_with_unreachable_destination_falls_back_to_idle() {
        use crate::map::Map;
        use cc_core::Terrain;
        // A single-cell-wide water moat walls the bot in, so no path
        // exists to the far side.
        let size = 5;
        let mut cells = vec![Terrain::Land; (size * size) as usize];
        for y in 0..size {
            cells[(y * size + 2) as usize] = Terrain::Water;
        }
        let map = Map::new(size, cells);
        let pp = PathPlanner::new(&map);

        let mut bot = Bot::new(ActorId(1), PlayerId::Player1, 100, DoubleVec2D::new(0.5, 0.5), 2.0, 3.0, 10);
        bot.set_destination(DoubleVec2D::new(4.5, 0.5));
        bot.update(&pp);
        assert_eq!(bot.state(), BotState::Idle);
    }

    #[test]
    fn transform_emits_spawn_and_removal_atomically() {
        let pp = planner();
        let mut bot = Bot::new(ActorId(7), PlayerId::Player2, 100, DoubleVec2D::new(3.0, 3.0), 2.0, 3.0, 10);
        bot.set_transform_destination(DoubleVec2D::new(3.0, 3.0));
        let effects = bot.update(&pp);
        assert!(effects
            .iter()
            .any(|e| matches!(e, DeferredEffect::SpawnTowerFromBot { bot_id, .. } if *bot_id == ActorId(7))));
        assert!(effects
            .iter()
            .any(|e| matches!(e, DeferredEffect::RemoveActor { actor_id } if *actor_id == ActorId(7))));
    }
}
