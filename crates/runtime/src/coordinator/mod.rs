//! Turn state machine.
//!
//! [`TurnCoordinator`] enforces the strict alternation
//! `Transitioning -> PlayerPhase -> Transitioning -> EnemyPhase -> Transitioning`
//! and owns the enemy roster. It never touches the grid itself; the
//! simulation worker drives entities between the transitions it allows.
mod action;

use std::collections::BTreeSet;

use game_core::EntityId;
use serde::{Deserialize, Serialize};

pub use action::{ActionEffect, PlayerAction, PlayerActionReport};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    PlayerPhase,
    EnemyPhase,
    #[default]
    Transitioning,
}

#[derive(Debug, Default)]
pub struct TurnCoordinator {
    phase: TurnPhase,
    turn: u64,
    roster: BTreeSet<EntityId>,
}

impl TurnCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of player phases started so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// # Panics
    ///
    /// Panics if `enemy` is already registered.
    pub fn register(&mut self, enemy: EntityId) {
        assert!(
            self.roster.insert(enemy),
            "enemy {enemy} registered twice with the turn coordinator"
        );
    }

    /// Removes `enemy` from the roster. Returns `false` if it was not registered.
    pub fn unregister(&mut self, enemy: EntityId) -> bool {
        self.roster.remove(&enemy)
    }

    pub fn is_registered(&self, enemy: EntityId) -> bool {
        self.roster.contains(&enemy)
    }

    /// # Panics
    ///
    /// Panics unless the coordinator is transitioning.
    pub fn start_player_phase(&mut self) -> u64 {
        assert_eq!(
            self.phase,
            TurnPhase::Transitioning,
            "player phase can only start while transitioning"
        );
        self.phase = TurnPhase::PlayerPhase;
        self.turn += 1;
        self.turn
    }

    /// Accepts the player's action for the current phase.
    ///
    /// Returns `true` exactly once per player phase; every other call is
    /// ignored and returns `false`.
    pub fn commit_player_action(&mut self) -> bool {
        if self.phase != TurnPhase::PlayerPhase {
            return false;
        }
        self.phase = TurnPhase::Transitioning;
        true
    }

    /// Enters the enemy phase and returns the roster as it stands now.
    ///
    /// Enemies registered or removed afterwards do not change the returned
    /// order; callers check [`Self::is_registered`] before each enemy acts.
    ///
    /// # Panics
    ///
    /// Panics unless the coordinator is transitioning.
    pub fn start_enemy_phase(&mut self) -> Vec<EntityId> {
        assert_eq!(
            self.phase,
            TurnPhase::Transitioning,
            "enemy phase can only start while transitioning"
        );
        self.phase = TurnPhase::EnemyPhase;
        self.roster.iter().copied().collect()
    }

    /// # Panics
    ///
    /// Panics unless the enemy phase is active.
    pub fn end_enemy_phase(&mut self) {
        assert_eq!(
            self.phase,
            TurnPhase::EnemyPhase,
            "ending an enemy phase that is not active"
        );
        self.phase = TurnPhase::Transitioning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_transitioning_at_turn_zero() {
        let coordinator = TurnCoordinator::new();
        assert_eq!(coordinator.phase(), TurnPhase::Transitioning);
        assert_eq!(coordinator.turn(), 0);
    }

    #[test]
    fn second_commit_in_a_phase_is_ignored() {
        let mut coordinator = TurnCoordinator::new();
        coordinator.start_player_phase();

        assert!(coordinator.commit_player_action());
        assert!(!coordinator.commit_player_action());
        assert_eq!(coordinator.phase(), TurnPhase::Transitioning);

        coordinator.start_enemy_phase();
        assert!(!coordinator.commit_player_action());
        assert_eq!(coordinator.phase(), TurnPhase::EnemyPhase);
    }

    #[test]
    fn full_cycle_advances_turn() {
        let mut coordinator = TurnCoordinator::new();
        for expected in 1..=3 {
            assert_eq!(coordinator.start_player_phase(), expected);
            assert!(coordinator.commit_player_action());
            coordinator.start_enemy_phase();
            coordinator.end_enemy_phase();
        }
        assert_eq!(coordinator.turn(), 3);
    }

    #[test]
    fn enemy_snapshot_ignores_later_roster_changes() {
        let mut coordinator = TurnCoordinator::new();
        coordinator.register(EntityId(2));
        coordinator.register(EntityId(1));
        coordinator.start_player_phase();
        coordinator.commit_player_action();

        let snapshot = coordinator.start_enemy_phase();
        assert_eq!(snapshot, vec![EntityId(1), EntityId(2)]);

        coordinator.unregister(EntityId(1));
        coordinator.register(EntityId(3));
        assert_eq!(snapshot, vec![EntityId(1), EntityId(2)]);
        assert!(!coordinator.is_registered(EntityId(1)));
        assert!(coordinator.is_registered(EntityId(3)));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn double_registration_panics() {
        let mut coordinator = TurnCoordinator::new();
        coordinator.register(EntityId(5));
        coordinator.register(EntityId(5));
    }

    #[test]
    #[should_panic(expected = "not active")]
    fn ending_inactive_enemy_phase_panics() {
        let mut coordinator = TurnCoordinator::new();
        coordinator.end_enemy_phase();
    }

    #[test]
    #[should_panic(expected = "only start while transitioning")]
    fn player_phase_cannot_restart_mid_phase() {
        let mut coordinator = TurnCoordinator::new();
        coordinator.start_player_phase();
        coordinator.start_player_phase();
    }
}
