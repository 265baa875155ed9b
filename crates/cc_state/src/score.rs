//! Per-turn score accounting (SPEC_FULL.md §3, §9 Open Questions).
//!
//! The source's `ScoreManager::updateScore` has two versions in the wild: an
//! additive per-turn tally and a dominance-only "+1 to whoever has more"
//! counter. This implementation keeps the additive semantics, since the
//! scenario values in SPEC_FULL.md §8 are proportional to the standing
//! census, not a running +1 count.

use cc_core::{PlayerId, BOT_SCORE_MULTIPLIER, TOWER_SCORE_MULTIPLIER};

#[derive(Clone, Copy, Debug, Default)]
struct Census {
    bots_on_flag: u64,
    towers_on_flag: u64,
}

#[derive(Clone, Debug)]
pub struct ScoreManager {
    census: [Census; 2],
    score: [u64; 2],
    bot_multiplier: u64,
    tower_multiplier: u64,
}

impl Default for ScoreManager {
    fn default() -> Self {
        ScoreManager::new()
    }
}

impl ScoreManager {
    pub fn new() -> Self {
        ScoreManager {
            census: [Census::default(); 2],
            score: [0, 0],
            bot_multiplier: BOT_SCORE_MULTIPLIER,
            tower_multiplier: TOWER_SCORE_MULTIPLIER,
        }
    }

    #[cfg(test)]
    pub fn with_multipliers(bot_multiplier: u64, tower_multiplier: u64) -> Self {
        ScoreManager { bot_multiplier, tower_multiplier, ..ScoreManager::new() }
    }

    pub fn bot_entered_flag_area(&mut self, player: PlayerId) {
        self.census[player.index()].bots_on_flag += 1;
    }

    pub fn bot_exited_flag_area(&mut self, player: PlayerId) {
        let c = &mut self.census[player.index()].bots_on_flag;
        *c = c.saturating_sub(1);
    }

    pub fn tower_entered_flag_area(&mut self, player: PlayerId) {
        self.census[player.index()].towers_on_flag += 1;
    }

    pub fn tower_exited_flag_area(&mut self, player: PlayerId) {
        let c = &mut self.census[player.index()].towers_on_flag;
        *c = c.saturating_sub(1);
    }

    pub fn bots_on_flag(&self, player: PlayerId) -> u64 {
        self.census[player.index()].bots_on_flag
    }

    pub fn towers_on_flag(&self, player: PlayerId) -> u64 {
        self.census[player.index()].towers_on_flag
    }

    fn individual_points(&self, player: PlayerId) -> u64 {
        let c = self.census[player.index()];
        self.bot_multiplier * c.bots_on_flag + self.tower_multiplier * c.towers_on_flag
    }

    /// Adds this turn's census-derived points to each player's cumulative
    /// score. Called once per turn, after `lateUpdate` has settled the
    /// census.
    pub fn update_scores(&mut self) {
        for p in [PlayerId::Player1, PlayerId::Player2] {
            self.score[p.index()] += self.individual_points(p);
        }
    }

    pub fn score(&self, player: PlayerId) -> u64 {
        self.score[player.index()]
    }

    pub fn scores(&self) -> [u64; 2] {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_semantics_accumulate_every_turn() {
        let mut sm = ScoreManager::with_multipliers(10, 25);
        sm.bot_entered_flag_area(PlayerId::Player1);
        sm.update_scores();
        sm.update_scores();
        assert_eq!(sm.score(PlayerId::Player1), 20);
        assert_eq!(sm.score(PlayerId::Player2), 0);
    }

    #[test]
    fn towers_score_more_than_bots() {
        let mut sm = ScoreManager::with_multipliers(10, 25);
        sm.tower_entered_flag_area(PlayerId::Player2);
        sm.update_scores();
        assert_eq!(sm.score(PlayerId::Player2), 25);
    }

    #[test]
    fn exit_decrements_census() {
        let mut sm = ScoreManager::new();
        sm.bot_entered_flag_area(PlayerId::Player1);
        sm.bot_entered_flag_area(PlayerId::Player1);
        sm.bot_exited_flag_area(PlayerId::Player1);
        assert_eq!(sm.bots_on_flag(PlayerId::Player1), 1);
    }
}
