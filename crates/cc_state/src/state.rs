//! The authoritative world (SPEC_FULL.md §3, §4.2).
//!
//! Owns the map, every live actor, the path planner, and the score
//! manager. Actors are stored in [`slotmap::SlotMap`]s keyed per player so
//! a dead actor's slot is reclaimed without reusing its `ActorId` or
//! disturbing the survivors' iteration order (SPEC_FULL.md §3 "Actor
//! storage"); iteration order itself is recovered by sorting on `ActorId`,
//! which is assigned monotonically at creation time and so already agrees
//! with insertion order.

use cc_core::{
    ActorId, DoubleVec2D, PlayerId, Vec2D, BLAST_IMPACT_RADIUS, BOT_DAMAGE_POINTS, BOT_MAX_HP,
    BOT_SPEED, MAX_NUM_TOWERS, TOWER_DAMAGE_POINTS, TOWER_MAX_HP,
};
use slotmap::{new_key_type, SlotMap};

use crate::actor::{Bot, Tower};
use crate::deferred::DeferredEffect;
use crate::map::Map;
use crate::pathing::PathPlanner;
use crate::score::ScoreManager;

new_key_type! { struct BotKey; }
new_key_type! { struct TowerKey; }

/// Why a State mutation primitive was refused. CommandGiver turns these
/// into the corresponding [`crate::errors::ValidationError`] variant; the
/// strings never reach a player, so they stay terse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRejected(pub &'static str);

pub struct State {
    map: Map,
    path_planner: PathPlanner,
    score: ScoreManager,
    bots: [SlotMap<BotKey, Bot>; 2],
    towers: [SlotMap<TowerKey, Tower>; 2],
}

impl State {
    /// Builds a fresh match state over `map`, with no actors yet. Call
    /// [`State::seed_starting_bots`] to populate both bases.
    pub fn new(map: Map) -> Self {
        let path_planner = PathPlanner::new(&map);
        State {
            map,
            path_planner,
            score: ScoreManager::new(),
            bots: [SlotMap::with_key(), SlotMap::with_key()],
            towers: [SlotMap::with_key(), SlotMap::with_key()],
        }
    }

    /// Spawns `count` bots for each player at `base_positions[player.index()]`.
    pub fn seed_starting_bots(&mut self, count: usize, base_positions: [DoubleVec2D; 2]) {
        for player in [PlayerId::Player1, PlayerId::Player2] {
            let position = base_positions[player.index()];
            for _ in 0..count {
                let bot = Bot::new(
                    ActorId::next(),
                    player,
                    BOT_MAX_HP,
                    position,
                    BOT_SPEED,
                    BLAST_IMPACT_RADIUS,
                    BOT_DAMAGE_POINTS,
                );
                self.bots[player.index()].insert(bot);
            }
        }
        self.settle_initial_census();
    }

    fn settle_initial_census(&mut self) {
        for player in [PlayerId::Player1, PlayerId::Player2] {
            for (_, bot) in self.bots[player.index()].iter() {
                if self.map.terrain_at_position(bot.position) == Some(cc_core::Terrain::Flag) {
                    self.score.bot_entered_flag_area(player);
                }
            }
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn path_planner(&self) -> &PathPlanner {
        &self.path_planner
    }

    pub fn score(&self) -> &ScoreManager {
        &self.score
    }

    /// Every live bot of `player`, in insertion (== ActorId) order.
    pub fn bots_in_order(&self, player: PlayerId) -> Vec<&Bot> {
        let mut bots: Vec<&Bot> = self.bots[player.index()].values().collect();
        bots.sort_by_key(|b| b.id);
        bots
    }

    /// Every live tower of `player`, in insertion (== ActorId) order.
    pub fn towers_in_order(&self, player: PlayerId) -> Vec<&Tower> {
        let mut towers: Vec<&Tower> = self.towers[player.index()].values().collect();
        towers.sort_by_key(|t| t.id);
        towers
    }

    pub fn num_towers(&self, player: PlayerId) -> usize {
        self.towers[player.index()].len()
    }

    fn bot_key(&self, player: PlayerId, actor_id: ActorId) -> Option<BotKey> {
        self.bots[player.index()]
            .iter()
            .find(|(_, b)| b.id == actor_id)
            .map(|(k, _)| k)
    }

    fn tower_key(&self, player: PlayerId, actor_id: ActorId) -> Option<TowerKey> {
        self.towers[player.index()]
            .iter()
            .find(|(_, t)| t.id == actor_id)
            .map(|(k, _)| k)
    }

    pub fn find_bot(&self, player: PlayerId, actor_id: ActorId) -> Option<&Bot> {
        self.bot_key(player, actor_id).map(|k| &self.bots[player.index()][k])
    }

    pub fn find_tower(&self, player: PlayerId, actor_id: ActorId) -> Option<&Tower> {
        self.tower_key(player, actor_id).map(|k| &self.towers[player.index()][k])
    }

    // --- Mutation primitives (SPEC_FULL.md §3 "three mutation primitives") ---
    // Each takes authoritative, already-un-flipped coordinates; callers
    // (CommandGiver) are responsible for flipping player-2 input first.

    pub fn move_bot(
        &mut self,
        player: PlayerId,
        actor_id: ActorId,
        destination: DoubleVec2D,
    ) -> Result<(), MutationRejected> {
        let key = self.bot_key(player, actor_id).ok_or(MutationRejected("no such bot"))?;
        self.bots[player.index()][key].set_destination(destination);
        Ok(())
    }

    pub fn move_bot_to_blast(
        &mut self,
        player: PlayerId,
        actor_id: ActorId,
        destination: DoubleVec2D,
    ) -> Result<(), MutationRejected> {
        let key = self.bot_key(player, actor_id).ok_or(MutationRejected("no such bot"))?;
        self.bots[player.index()][key].set_final_destination(destination);
        Ok(())
    }

    pub fn move_bot_to_transform(
        &mut self,
        player: PlayerId,
        actor_id: ActorId,
        destination: DoubleVec2D,
    ) -> Result<(), MutationRejected> {
        let key = self.bot_key(player, actor_id).ok_or(MutationRejected("no such bot"))?;
        self.bots[player.index()][key].set_transform_destination(destination);
        Ok(())
    }

    /// Instant blast-in-place: works for both a bot and a tower actor_id.
    pub fn blast_actor(&mut self, player: PlayerId, actor_id: ActorId) -> Result<(), MutationRejected> {
        if let Some(key) = self.bot_key(player, actor_id) {
            self.bots[player.index()][key].request_blast();
            return Ok(());
        }
        if let Some(key) = self.tower_key(player, actor_id) {
            self.towers[player.index()][key].request_blast();
            return Ok(());
        }
        Err(MutationRejected("no such actor"))
    }

    /// Instant transform-in-place (no preceding move): only bots transform.
    pub fn transform_bot(&mut self, player: PlayerId, actor_id: ActorId) -> Result<(), MutationRejected> {
        let key = self.bot_key(player, actor_id).ok_or(MutationRejected("no such bot"))?;
        if self.towers[player.index()].len() >= MAX_NUM_TOWERS {
            return Err(MutationRejected("tower limit reached"));
        }
        self.bots[player.index()][key].request_transform();
        Ok(())
    }

    /// Phase one of a turn: every actor runs its state machine to a fixed
    /// point, producing deferred effects, which are then applied in full
    /// (blast damage, tower construction, dead-actor removal) before
    /// `late_update` runs (SPEC_FULL.md §4.2).
    pub fn update(&mut self) {
        let mut effects = Vec::new();
        for player in [PlayerId::Player1, PlayerId::Player2] {
            let idx = player.index();
            for (_, bot) in self.bots[idx].iter_mut() {
                effects.extend(bot.update(&self.path_planner));
            }
            for (_, tower) in self.towers[idx].iter_mut() {
                effects.extend(tower.update());
            }
        }
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: DeferredEffect) {
        match effect {
            DeferredEffect::ApplyBlastDamage { source, owner, center } => {
                self.apply_blast_damage(source, owner, center);
            }
            DeferredEffect::SpawnTowerFromBot { bot_id, owner, offset } => {
                self.spawn_tower_from_bot(bot_id, owner, offset);
            }
            DeferredEffect::RemoveActor { actor_id } => {
                self.remove_actor(actor_id);
            }
        }
    }

    fn apply_blast_damage(&mut self, source: ActorId, owner: PlayerId, center: Vec2D) {
        let (blast_range, damage_points) = self
            .find_bot(owner, source)
            .map(|b| (b.blast_range, b.damage_points))
            .or_else(|| self.find_tower(owner, source).map(|t| (t.blast_range, t.damage_points)))
            .unwrap_or((0.0, 0));

        let enemy = owner.opponent();
        let center = center.to_double();
        for (_, bot) in self.bots[enemy.index()].iter_mut() {
            if bot.position.distance(center) <= blast_range {
                bot.damage(damage_points);
            }
        }
        for (_, tower) in self.towers[enemy.index()].iter_mut() {
            if tower.offset.to_double().distance(center) <= blast_range {
                tower.damage(damage_points);
            }
        }
    }

    fn spawn_tower_from_bot(&mut self, bot_id: ActorId, owner: PlayerId, offset: Vec2D) {
        if !self.path_planner.build_tower(offset) {
            return;
        }
        if !self.map.build_tower(offset) {
            self.path_planner.destroy_tower(offset);
            return;
        }
        let tower = Tower::new(
            ActorId::inherit(bot_id),
            owner,
            TOWER_MAX_HP,
            offset,
            BLAST_IMPACT_RADIUS,
            TOWER_DAMAGE_POINTS,
        );
        self.towers[owner.index()].insert(tower);
        // `build_tower` above already flipped this cell to TOWER, so the
        // terrain at `offset` can no longer read FLAG; FLAG never toggles,
        // so `flag_offsets()` is the only reliable way to ask "was this a
        // flag cell".
        if self.map.flag_offsets().contains(&offset) {
            self.score.tower_entered_flag_area(owner);
        }
    }

    fn remove_actor(&mut self, actor_id: ActorId) {
        for player in [PlayerId::Player1, PlayerId::Player2] {
            if let Some(key) = self.bot_key(player, actor_id) {
                let bot = self.bots[player.index()].remove(key).expect("key just found");
                // A transforming bot's `RemoveActor` effect runs right
                // after its `SpawnTowerFromBot` effect has already flipped
                // this cell to TOWER, so `terrain_at_position` can no
                // longer read FLAG here; check `flag_offsets()` instead,
                // same as `spawn_tower_from_bot`.
                if self.map.flag_offsets().contains(&bot.position.floor().to_vec2d()) {
                    self.score.bot_exited_flag_area(player);
                }
            }
        }
    }

    /// Phase two of a turn: commits hp loss and pending movement for every
    /// live actor, sweeps dead actors out of the world, and reconciles the
    /// flag census against positions that changed this turn.
    pub fn late_update(&mut self) {
        for player in [PlayerId::Player1, PlayerId::Player2] {
            let idx = player.index();
            let mut dead_bots = Vec::new();
            for (key, bot) in self.bots[idx].iter_mut() {
                if let Some((previous, next)) = bot.late_update() {
                    self.reconcile_flag_census_for_bot(player, previous, next);
                }
                if bot.state() == crate::actor::BotState::Dead {
                    dead_bots.push(key);
                }
            }
            for key in dead_bots {
                if let Some(bot) = self.bots[idx].remove(key) {
                    if self.map.terrain_at_position(bot.position) == Some(cc_core::Terrain::Flag) {
                        self.score.bot_exited_flag_area(player);
                    }
                }
            }

            let mut dead_towers = Vec::new();
            for (key, tower) in self.towers[idx].iter_mut() {
                tower.late_update();
                if tower.state() == crate::actor::TowerState::Dead {
                    dead_towers.push(key);
                }
            }
            for key in dead_towers {
                if let Some(tower) = self.towers[idx].remove(key) {
                    // Same reasoning as `spawn_tower_from_bot`: check
                    // `flag_offsets()` before freeing the cell, since
                    // `destroy_tower` restores the origin terrain and the
                    // live TOWER tag would otherwise mask a FLAG origin.
                    if self.map.flag_offsets().contains(&tower.offset) {
                        self.score.tower_exited_flag_area(player);
                    }
                    self.map.destroy_tower(tower.offset);
                    self.path_planner.destroy_tower(tower.offset);
                }
            }
        }
    }

    fn reconcile_flag_census_for_bot(&mut self, player: PlayerId, previous: DoubleVec2D, next: DoubleVec2D) {
        let was_on_flag = self.map.terrain_at_position(previous) == Some(cc_core::Terrain::Flag);
        let is_on_flag = self.map.terrain_at_position(next) == Some(cc_core::Terrain::Flag);
        if was_on_flag && !is_on_flag {
            self.score.bot_exited_flag_area(player);
        } else if !was_on_flag && is_on_flag {
            self.score.bot_entered_flag_area(player);
        }
    }

    /// Adds this turn's census-derived points to each player's cumulative
    /// score. Called once per turn, after `late_update` has settled.
    pub fn update_scores(&mut self) {
        self.score.update_scores();
    }

    pub fn scores(&self) -> [u64; 2] {
        self.score.scores()
    }

    /// Test-only seam for other in-crate test modules (e.g. `command_giver`'s)
    /// that need to place an arbitrary bot without going through
    /// `seed_starting_bots`.
    #[cfg(test)]
    pub(crate) fn insert_bot_for_test(&mut self, bot: Bot) {
        let idx = bot.player_id.index();
        self.bots[idx].insert(bot);
    }

    /// Test-only seam, mirroring `insert_bot_for_test` for towers.
    #[cfg(test)]
    pub(crate) fn insert_tower_for_test(&mut self, tower: Tower) {
        let idx = tower.player_id.index();
        self.towers[idx].insert(tower);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::Terrain;

    fn state_with_flag_map(size: i64, flag: Vec2D) -> State {
        let mut cells = vec![Terrain::Land; (size * size) as usize];
        cells[(flag.y * size + flag.x) as usize] = Terrain::Flag;
        State::new(Map::new(size, cells))
    }

    #[test]
    fn seeded_bots_stand_at_their_base() {
        let mut state = State::new(Map::empty(20));
        state.seed_starting_bots(5, [DoubleVec2D::new(5.0, 5.0), DoubleVec2D::new(14.0, 14.0)]);
        assert_eq!(state.bots_in_order(PlayerId::Player1).len(), 5);
        assert_eq!(state.bots_in_order(PlayerId::Player2).len(), 5);
    }

    #[test]
    fn blast_damages_enemy_in_range_but_not_the_blaster_allies() {
        let mut state = State::new(Map::empty(20));
        let attacker = Bot::new(
            ActorId::next(),
            PlayerId::Player1,
            100,
            DoubleVec2D::new(5.0, 5.0),
            2.0,
            3.0,
            50,
        );
        let attacker_id = attacker.id;
        state.bots[0].insert(attacker);

        let ally = Bot::new(ActorId::next(), PlayerId::Player1, 100, DoubleVec2D::new(6.0, 5.0), 2.0, 3.0, 50);
        state.bots[0].insert(ally);

        let enemy = Bot::new(ActorId::next(), PlayerId::Player2, 100, DoubleVec2D::new(5.0, 7.0), 2.0, 3.0, 50);
        state.bots[1].insert(enemy);

        state.blast_actor(PlayerId::Player1, attacker_id).unwrap();
        state.update();
        state.late_update();

        assert_eq!(state.bots_in_order(PlayerId::Player1).len(), 1, "only the blasting bot dies");
        assert_eq!(state.bots_in_order(PlayerId::Player2)[0].hp, 50);
    }

    #[test]
    fn transform_replaces_bot_with_tower_and_updates_census() {
        let mut state = state_with_flag_map(20, Vec2D::new(3, 3));
        let bot = Bot::new(ActorId::next(), PlayerId::Player1, 50, DoubleVec2D::new(3.5, 3.5), 2.0, 3.0, 10);
        let bot_id = bot.id;
        state.bots[0].insert(bot);
        state.score.bot_entered_flag_area(PlayerId::Player1);

        state.move_bot_to_transform(PlayerId::Player1, bot_id, DoubleVec2D::new(3.5, 3.5)).unwrap();
        state.update();
        state.late_update();

        assert!(state.bots_in_order(PlayerId::Player1).is_empty());
        let towers = state.towers_in_order(PlayerId::Player1);
        assert_eq!(towers.len(), 1);
        assert_eq!(towers[0].offset, Vec2D::new(3, 3));
        assert_eq!(towers[0].id, bot_id);
        assert_eq!(state.score.bots_on_flag(PlayerId::Player1), 0);
        assert_eq!(state.score.towers_on_flag(PlayerId::Player1), 1);
    }
}
