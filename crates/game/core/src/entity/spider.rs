use super::{DamageOutcome, Damageable, Enemy, EnemyKind, GridOccupant, apply_damage};
use crate::state::{CardinalDirection, EntityId, Position};

/// Basic melee enemy that chases the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spider {
    id: EntityId,
    position: Position,
    facing: CardinalDirection,
    health: i32,
    attack: u32,
}

impl Spider {
    pub fn new(id: EntityId, position: Position, health: i32, attack: u32) -> Self {
        Self {
            id,
            position,
            facing: CardinalDirection::default(),
            health,
            attack,
        }
    }
}

impl GridOccupant for Spider {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn facing(&self) -> CardinalDirection {
        self.facing
    }

    fn set_facing(&mut self, facing: CardinalDirection) {
        self.facing = facing;
    }
}

impl Damageable for Spider {
    fn health(&self) -> i32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        apply_damage(&mut self.health, amount)
    }

    // Spiders have no health cap.
    fn heal(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_add(amount);
    }
}

impl Enemy for Spider {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Spider
    }

    fn attack_damage(&self) -> u32 {
        self.attack
    }
}
