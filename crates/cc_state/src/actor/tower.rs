//! Tower actor and its state machine (SPEC_FULL.md §3, §4.3).
//!
//! Grounded on `state/actor/tower.{h,cpp}` and `state/actor/tower_states/*`.

use crate::deferred::DeferredEffect;
use cc_core::{ActorId, PlayerId, Vec2D};

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TowerState {
    Idle,
    Blast,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Tower {
    pub id: ActorId,
    pub player_id: PlayerId,
    pub hp: u64,
    pub max_hp: u64,
    damage_incurred: u64,
    pub offset: Vec2D,
    pub blast_range: f64,
    pub damage_points: u64,
    pub age: u64,
    state: TowerState,
    is_blasting: bool,
}

impl Tower {
    pub fn new(
        id: ActorId,
        player_id: PlayerId,
        hp: u64,
        offset: Vec2D,
        blast_range: f64,
        damage_points: u64,
    ) -> Self {
        Tower {
            id,
            player_id,
            hp,
            max_hp: hp,
            damage_incurred: 0,
            offset,
            blast_range,
            damage_points,
            age: 0,
            state: TowerState::Idle,
            is_blasting: false,
        }
    }

    pub fn state(&self) -> TowerState {
        self.state
    }

    pub fn request_blast(&mut self) {
        self.is_blasting = true;
    }

    pub fn damage(&mut self, amount: u64) {
        self.damage_incurred = self.damage_incurred.saturating_add(amount);
    }

    fn latest_hp(&self) -> u64 {
        self.hp.saturating_sub(self.damage_incurred)
    }

    pub fn update(&mut self) -> Vec<DeferredEffect> {
        self.age += 1;
        let mut effects = Vec::new();
        while let Some(next) = self.update_once() {
            self.state = next;
            self.on_enter(&mut effects);
        }
        effects
    }

    fn on_enter(&mut self, effects: &mut Vec<DeferredEffect>) {
        if self.state == TowerState::Blast {
            self.damage(self.hp);
            self.is_blasting = false;
            effects.push(DeferredEffect::ApplyBlastDamage {
                source: self.id,
                owner: self.player_id,
                center: self.offset,
            });
        }
    }

    fn update_once(&mut self) -> Option<TowerState> {
        if self.hp == 0 && self.state != TowerState::Dead {
            return Some(TowerState::Dead);
        }
        match self.state {
            TowerState::Idle => {
                if self.is_blasting {
                    Some(TowerState::Blast)
                } else {
                    None
                }
            }
            TowerState::Blast => Some(TowerState::Dead),
            TowerState::Dead => None,
        }
    }

    /// Settles this turn's hp loss. Towers have no position to commit, so
    /// this only advances the dead transition when needed.
    pub fn late_update(&mut self) {
        self.hp = self.latest_hp();
        self.damage_incurred = 0;
        if self.hp == 0 && self.state != TowerState::Dead {
            self.state = TowerState::Dead;
        }
    }
}
