//! Read-only view of the simulation handed to clients and providers.
use game_core::{CardinalDirection, EnemyKind, EntityId, Position};
use serde::{Deserialize, Serialize};

use crate::coordinator::TurnPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub facing: CardinalDirection,
    pub health: i32,
    pub max_health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Position,
    pub facing: CardinalDirection,
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: TurnPhase,
    pub turn: u64,
    /// `None` until the player has been placed.
    pub player: Option<PlayerView>,
    /// Live enemies in id order.
    pub enemies: Vec<EnemyView>,
    pub score: u32,
    pub round: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn enemy(&self, id: EntityId) -> Option<&EnemyView> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn enemy_at(&self, position: Position) -> Option<&EnemyView> {
        self.enemies.iter().find(|enemy| enemy.position == position)
    }

    /// First enemy orthogonally adjacent to the player, with the direction to face it.
    pub fn adjacent_enemy(&self) -> Option<(CardinalDirection, &EnemyView)> {
        let player = self.player?;
        player
            .position
            .neighbors()
            .into_iter()
            .find_map(|(direction, position)| self.enemy_at(position).map(|enemy| (direction, enemy)))
    }

    pub fn nearest_enemy(&self) -> Option<&EnemyView> {
        let player = self.player?;
        self.enemies
            .iter()
            .min_by_key(|enemy| (enemy.position.manhattan_distance(player.position), enemy.id))
    }
}
