//! Player and actor identity types.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Which side of the match an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    Player1,
    Player2,
    /// Used only to denote a tie; never owns an actor.
    PlayerNull,
}

impl PlayerId {
    /// The other player. Panics if called on `PlayerNull`.
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
            PlayerId::PlayerNull => panic!("PlayerNull has no opponent"),
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
            PlayerId::PlayerNull => panic!("PlayerNull has no index"),
        }
    }

    pub fn from_index(i: usize) -> PlayerId {
        match i {
            0 => PlayerId::Player1,
            1 => PlayerId::Player2,
            _ => panic!("player index out of range: {i}"),
        }
    }
}

/// Distinguishes a bot actor from a tower actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Bot,
    Tower,
}

/// Unique, monotonically increasing, never-reused actor identity.
///
/// Assigned from a single process-wide counter shared by bots and towers,
/// so a tower born from a transforming bot keeps that bot's id (see
/// `ActorId::inherit`) rather than drawing a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(0);

impl ActorId {
    /// Draws the next id from the process-wide counter.
    pub fn next() -> ActorId {
        ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// A tower built by transforming a bot keeps the bot's id; the
    /// lifecycle is a state change, not a new actor.
    pub fn inherit(bot_id: ActorId) -> ActorId {
        bot_id
    }
}

#[cfg(test)]
pub(crate) fn reset_actor_id_counter_for_tests() {
    NEXT_ACTOR_ID.store(0, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn actor_ids_are_monotonic_and_distinct() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_actor_id_counter_for_tests();
        let a = ActorId::next();
        let b = ActorId::next();
        let c = ActorId::next();
        assert!(a < b && b < c);
    }

    #[test]
    fn opponent_is_involutive() {
        assert_eq!(PlayerId::Player1.opponent(), PlayerId::Player2);
        assert_eq!(PlayerId::Player2.opponent(), PlayerId::Player1);
    }
}
