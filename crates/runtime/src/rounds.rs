//! Wave-based round progression and scoring.
use std::collections::BTreeSet;

use game_core::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSettings {
    pub enabled: bool,
    /// Enemies spawned in round one.
    pub base_enemies: u32,
    /// Multiplier applied per round after the first.
    pub growth: f64,
    pub score_per_kill: u32,
    /// Health restored to the player when a round is cleared.
    pub heal_per_round: u32,
    /// Random tiles tried per spawn before giving up.
    pub spawn_attempts: u32,
}

impl RoundSettings {
    pub const DEFAULT_BASE_ENEMIES: u32 = 2;
    pub const DEFAULT_GROWTH: f64 = 1.5;
    pub const DEFAULT_SCORE_PER_KILL: u32 = 10;
    pub const DEFAULT_HEAL_PER_ROUND: u32 = 5;
    pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 32;

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// `ceil(base_enemies * growth^(round - 1))`; round zero has no enemies.
    pub fn enemies_for_round(&self, round: u32) -> u32 {
        if round == 0 {
            return 0;
        }
        let exponent = i32::try_from(round - 1).unwrap_or(i32::MAX);
        (f64::from(self.base_enemies) * self.growth.powi(exponent)).ceil() as u32
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_enemies: Self::DEFAULT_BASE_ENEMIES,
            growth: Self::DEFAULT_GROWTH,
            score_per_kill: Self::DEFAULT_SCORE_PER_KILL,
            heal_per_round: Self::DEFAULT_HEAL_PER_ROUND,
            spawn_attempts: Self::DEFAULT_SPAWN_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundProgress {
    Continuing,
    /// The last tracked enemy of `round` is gone.
    Cleared { round: u32 },
}

/// Tracks the current round's enemies and the running score.
///
/// A cleared round does not start the next one immediately: the tracker
/// marks it pending and the worker begins it with the next player phase.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    settings: RoundSettings,
    round: u32,
    members: BTreeSet<EntityId>,
    score: u32,
    pending_next: bool,
}

impl RoundTracker {
    pub fn new(settings: RoundSettings) -> Self {
        Self {
            settings,
            round: 0,
            members: BTreeSet::new(),
            score: 0,
            pending_next: false,
        }
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> usize {
        self.members.len()
    }

    /// Advances to the next round and returns `(round, enemies_to_spawn)`.
    pub fn begin_next_round(&mut self) -> (u32, u32) {
        self.round += 1;
        self.pending_next = false;
        self.members.clear();
        (self.round, self.settings.enemies_for_round(self.round))
    }

    /// Counts `enemy` toward clearing the current round.
    pub fn track(&mut self, enemy: EntityId) {
        self.members.insert(enemy);
    }

    /// Adds one kill to the score and returns the new total.
    pub fn record_kill(&mut self) -> u32 {
        self.score = self.score.saturating_add(self.settings.score_per_kill);
        self.score
    }

    /// Forgets `enemy`, whether it was killed or despawned.
    pub fn enemy_removed(&mut self, enemy: EntityId) -> RoundProgress {
        if self.members.remove(&enemy) && self.members.is_empty() {
            self.pending_next = true;
            return RoundProgress::Cleared { round: self.round };
        }
        RoundProgress::Continuing
    }

    /// Returns `true` once after a round has been cleared.
    pub fn take_pending_round(&mut self) -> bool {
        std::mem::take(&mut self.pending_next)
    }
}
