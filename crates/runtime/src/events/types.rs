//! Event types for different topics.

use game_core::{DamageOutcome, EnemyKind, EntityId, GenerationReport, Position};
use serde::{Deserialize, Serialize};

use crate::ai::EnemyOutcome;
use crate::coordinator::{ActionEffect, PlayerAction};
use crate::readiness::Subsystem;

/// Startup and shutdown milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    SubsystemReady { subsystem: Subsystem },
    /// An optional subsystem did not signal readiness before the startup timeout.
    SubsystemMissing { subsystem: Subsystem },
    GameOver { final_score: u32, turns: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    GenerationRequested,
    Generated { report: GenerationReport },
}

/// Phase transitions of the turn cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    PlayerPhaseStarted {
        turn: u64,
    },
    PlayerPhaseEnded {
        turn: u64,
        action: PlayerAction,
        effect: ActionEffect,
    },
    EnemyPhaseStarted {
        turn: u64,
        enemies: usize,
    },
    EnemyActed {
        enemy: EntityId,
        outcome: EnemyOutcome,
    },
    EnemyPhaseEnded {
        turn: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    Attacked {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
        outcome: DamageOutcome,
    },
    EntityDied {
        entity: EntityId,
        position: Position,
    },
}

/// Round progression and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    RoundStarted { round: u32, enemies: u32 },
    RoundEnded { round: u32 },
    ScoreChanged { score: u32 },
    EnemySpawned {
        enemy: EntityId,
        kind: EnemyKind,
        position: Position,
    },
}
