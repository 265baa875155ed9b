//! Effects an actor's `update`/`lateUpdate` wants applied to the world, but
//! cannot apply itself (SPEC_FULL.md §4.2): actors never hold a back
//! reference to `State`, so instead of mutating the map or sibling actors
//! directly they return a list of these, which `State` folds in afterward.

use cc_core::{ActorId, PlayerId, Vec2D};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeferredEffect {
    /// A bot finished its transform countdown: replace it with a tower at
    /// the given offset, owned by the same player.
    SpawnTowerFromBot { bot_id: ActorId, owner: PlayerId, offset: Vec2D },
    /// An actor's blast animation completed: deal damage to every enemy
    /// actor within blast radius of `center`.
    ApplyBlastDamage { source: ActorId, owner: PlayerId, center: Vec2D },
    /// An actor finished dying: remove it from the world.
    RemoveActor { actor_id: ActorId },
}
