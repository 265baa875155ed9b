//! Fixed-capacity per-player snapshot for shared memory (SPEC_FULL.md §3, §6).
//!
//! Two layers, mirroring the source's `player_state`/`transfer_state` split:
//! [`PlayerStateView`] is the heap-based, player-visible shape `StateSyncer`
//! produces every turn; [`TransferState`] is its plain-old-data mirror,
//! safe to place in shared memory, with fixed-capacity arrays plus `num_*`
//! length fields standing in for `Vec` length. Conversion is a round-trip
//! for the first `num_*` entries of each array; anything beyond a
//! capacity is silently dropped (matching the source's `vectorToArray`,
//! which simply does not write past the array's fixed size).
//!
//! `BotView`/`TowerView` double as the read-write shape a player process
//! hands back: the player mutates the intent fields on its own copy
//! (`destination`, `final_destination`, `transform_destination`,
//! `is_blasting`, `is_transforming`) before returning it, and
//! [`crate::command_giver::CommandGiver`] reads those intents back off of
//! exactly this struct. Unset intents use the `DoubleVec2D::NULL` sentinel,
//! same as the rest of the coordinate system.

use cc_core::{ActorId, DoubleVec2D, Terrain, MAP_SIZE, MAX_NUM_BOTS, MAX_NUM_TOWERS};

use crate::actor::{BotState, TowerState};

const MAP_CELLS: usize = (MAP_SIZE * MAP_SIZE) as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotView {
    pub id: ActorId,
    pub hp: u64,
    pub position: DoubleVec2D,
    pub state: BotState,
    pub destination: DoubleVec2D,
    pub final_destination: DoubleVec2D,
    pub transform_destination: DoubleVec2D,
    pub is_blasting: bool,
    pub is_transforming: bool,
}

impl BotView {
    /// An own-bot view with every intent field cleared, as `StateSyncer`
    /// hands it to the player at the start of the turn.
    pub fn unset_intents(id: ActorId, hp: u64, position: DoubleVec2D, state: BotState) -> Self {
        BotView {
            id,
            hp,
            position,
            state,
            destination: DoubleVec2D::NULL,
            final_destination: DoubleVec2D::NULL,
            transform_destination: DoubleVec2D::NULL,
            is_blasting: false,
            is_transforming: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerView {
    pub id: ActorId,
    pub hp: u64,
    /// Tower offset expressed as a `DoubleVec2D` for uniformity with bots
    /// on the wire, matching the source's `changeTowerToBotPosition`.
    pub position: DoubleVec2D,
    pub state: TowerState,
    pub is_blasting: bool,
}

/// The player-visible world, as `StateSyncer` composes it each turn: plain
/// heap vectors, unbounded in principle (bounded in practice by the
/// match's own actor caps).
#[derive(Clone, Debug, Default)]
pub struct PlayerStateView {
    pub map: Vec<Terrain>,
    pub flag_offsets: Vec<DoubleVec2D>,
    pub bots: Vec<BotView>,
    pub enemy_bots: Vec<BotView>,
    pub towers: Vec<TowerView>,
    pub enemy_towers: Vec<TowerView>,
    pub scores: [u64; 2],
}

/// POD mirror of a [`BotView`] for the shared-memory layout.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct TransferBot {
    pub id: u64,
    pub hp: u64,
    pub position: DoubleVec2D,
    pub destination: DoubleVec2D,
    pub final_destination: DoubleVec2D,
    pub transform_destination: DoubleVec2D,
    pub state: BotState,
    pub is_blasting: bool,
    pub is_transforming: bool,
    _pad: [u8; 5],
}

impl Default for TransferBot {
    fn default() -> Self {
        TransferBot {
            id: 0,
            hp: 0,
            position: DoubleVec2D::NULL,
            destination: DoubleVec2D::NULL,
            final_destination: DoubleVec2D::NULL,
            transform_destination: DoubleVec2D::NULL,
            state: BotState::Idle,
            is_blasting: false,
            is_transforming: false,
            _pad: [0; 5],
        }
    }
}

impl From<BotView> for TransferBot {
    fn from(b: BotView) -> Self {
        TransferBot {
            id: b.id.0,
            hp: b.hp,
            position: b.position,
            destination: b.destination,
            final_destination: b.final_destination,
            transform_destination: b.transform_destination,
            state: b.state,
            is_blasting: b.is_blasting,
            is_transforming: b.is_transforming,
            _pad: [0; 5],
        }
    }
}

impl From<TransferBot> for BotView {
    fn from(b: TransferBot) -> Self {
        BotView {
            id: ActorId(b.id),
            hp: b.hp,
            position: b.position,
            state: b.state,
            destination: b.destination,
            final_destination: b.final_destination,
            transform_destination: b.transform_destination,
            is_blasting: b.is_blasting,
            is_transforming: b.is_transforming,
        }
    }
}

/// POD mirror of a [`TowerView`] for the shared-memory layout.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct TransferTower {
    pub id: u64,
    pub hp: u64,
    pub position: DoubleVec2D,
    pub state: TowerState,
    pub is_blasting: bool,
    _pad: [u8; 6],
}

impl Default for TransferTower {
    fn default() -> Self {
        TransferTower {
            id: 0,
            hp: 0,
            position: DoubleVec2D::NULL,
            state: TowerState::Idle,
            is_blasting: false,
            _pad: [0; 6],
        }
    }
}

impl From<TowerView> for TransferTower {
    fn from(t: TowerView) -> Self {
        TransferTower {
            id: t.id.0,
            hp: t.hp,
            position: t.position,
            state: t.state,
            is_blasting: t.is_blasting,
            _pad: [0; 6],
        }
    }
}

impl From<TransferTower> for TowerView {
    fn from(t: TransferTower) -> Self {
        TowerView { id: ActorId(t.id), hp: t.hp, position: t.position, state: t.state, is_blasting: t.is_blasting }
    }
}

/// Heap-free, fixed-size mirror of [`PlayerStateView`] safe to place in
/// shared memory (SPEC_FULL.md §6 "TransferState on-wire layout").
///
/// `#[repr(C)]` with an explicit trailing padding field on each element
/// type keeps natural alignment from silently inserting any (SPEC_FULL.md
/// §9 decisions); every field here is plain integers/doubles, with no
/// indirection, so the whole struct is safe to memcpy into a shared-memory
/// region as-is.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct TransferState {
    pub map: [Terrain; MAP_CELLS],
    pub flag_offsets: [DoubleVec2D; MAP_CELLS],
    pub num_flags: u64,

    pub bots: [TransferBot; MAX_NUM_BOTS],
    pub enemy_bots: [TransferBot; MAX_NUM_BOTS],
    pub num_bots: u64,
    pub num_enemy_bots: u64,

    pub towers: [TransferTower; MAX_NUM_TOWERS],
    pub enemy_towers: [TransferTower; MAX_NUM_TOWERS],
    pub num_towers: u64,
    pub num_enemy_towers: u64,

    pub scores: [u64; 2],
}

impl Default for TransferState {
    fn default() -> Self {
        TransferState {
            map: [Terrain::Land; MAP_CELLS],
            flag_offsets: [DoubleVec2D::NULL; MAP_CELLS],
            num_flags: 0,
            bots: [TransferBot::default(); MAX_NUM_BOTS],
            enemy_bots: [TransferBot::default(); MAX_NUM_BOTS],
            num_bots: 0,
            num_enemy_bots: 0,
            towers: [TransferTower::default(); MAX_NUM_TOWERS],
            enemy_towers: [TransferTower::default(); MAX_NUM_TOWERS],
            num_towers: 0,
            num_enemy_towers: 0,
            scores: [0, 0],
        }
    }
}

fn fill<T: Copy + Default, const N: usize>(slots: &mut [T; N], items: &[T]) -> u64 {
    let n = items.len().min(N);
    slots[..n].copy_from_slice(&items[..n]);
    n as u64
}

impl From<&PlayerStateView> for TransferState {
    fn from(view: &PlayerStateView) -> Self {
        let mut ts = TransferState::default();

        let map_n = view.map.len().min(MAP_CELLS);
        ts.map[..map_n].copy_from_slice(&view.map[..map_n]);

        ts.num_flags = fill(&mut ts.flag_offsets, &view.flag_offsets);

        let bots: Vec<TransferBot> = view.bots.iter().copied().map(TransferBot::from).collect();
        ts.num_bots = fill(&mut ts.bots, &bots);

        let enemy_bots: Vec<TransferBot> = view.enemy_bots.iter().copied().map(TransferBot::from).collect();
        ts.num_enemy_bots = fill(&mut ts.enemy_bots, &enemy_bots);

        let towers: Vec<TransferTower> = view.towers.iter().copied().map(TransferTower::from).collect();
        ts.num_towers = fill(&mut ts.towers, &towers);

        let enemy_towers: Vec<TransferTower> =
            view.enemy_towers.iter().copied().map(TransferTower::from).collect();
        ts.num_enemy_towers = fill(&mut ts.enemy_towers, &enemy_towers);

        ts.scores = view.scores;
        ts
    }
}

impl From<&TransferState> for PlayerStateView {
    fn from(ts: &TransferState) -> Self {
        PlayerStateView {
            map: ts.map.to_vec(),
            flag_offsets: ts.flag_offsets[..ts.num_flags as usize].to_vec(),
            bots: ts.bots[..ts.num_bots as usize].iter().copied().map(BotView::from).collect(),
            enemy_bots: ts.enemy_bots[..ts.num_enemy_bots as usize]
                .iter()
                .copied()
                .map(BotView::from)
                .collect(),
            towers: ts.towers[..ts.num_towers as usize].iter().copied().map(TowerView::from).collect(),
            enemy_towers: ts.enemy_towers[..ts.num_enemy_towers as usize]
                .iter()
                .copied()
                .map(TowerView::from)
                .collect(),
            scores: ts.scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::PlayerId;

    fn sample_view() -> PlayerStateView {
        PlayerStateView {
            map: vec![Terrain::Land; MAP_CELLS],
            flag_offsets: vec![DoubleVec2D::new(3.0, 3.0)],
            bots: vec![BotView::unset_intents(ActorId(1), 80, DoubleVec2D::new(1.0, 1.0), BotState::Move)],
            enemy_bots: vec![],
            towers: vec![TowerView {
                id: ActorId(2),
                hp: 200,
                position: DoubleVec2D::new(9.0, 9.0),
                state: TowerState::Idle,
                is_blasting: false,
            }],
            enemy_towers: vec![],
            scores: [10, 20],
        }
    }

    #[test]
    fn round_trips_through_transfer_state() {
        let view = sample_view();
        let ts = TransferState::from(&view);
        let back = PlayerStateView::from(&ts);

        assert_eq!(back.bots, view.bots);
        assert_eq!(back.towers, view.towers);
        assert_eq!(back.flag_offsets, view.flag_offsets);
        assert_eq!(back.scores, view.scores);
        assert_eq!(back.map.len(), MAP_CELLS);
    }

    #[test]
    fn intent_fields_round_trip_too() {
        let mut view = sample_view();
        view.bots[0].destination = DoubleVec2D::new(5.0, 5.0);
        let ts = TransferState::from(&view);
        let back = PlayerStateView::from(&ts);
        assert_eq!(back.bots[0].destination, DoubleVec2D::new(5.0, 5.0));
    }

    #[test]
    fn bots_beyond_capacity_are_truncated_not_panicking() {
        let mut view = sample_view();
        view.bots = (0..MAX_NUM_BOTS + 5)
            .map(|i| BotView::unset_intents(ActorId(i as u64), 1, DoubleVec2D::new(0.0, 0.0), BotState::Idle))
            .collect();
        let ts = TransferState::from(&view);
        assert_eq!(ts.num_bots as usize, MAX_NUM_BOTS);
    }

    #[test]
    fn player_id_index_matches_score_slot() {
        assert_eq!(PlayerId::Player1.index(), 0);
        assert_eq!(PlayerId::Player2.index(), 1);
    }
}
