use super::{DamageOutcome, Damageable, GridOccupant, apply_damage};
use crate::state::{CardinalDirection, EntityId, Position};

/// The single controllable character. Always identified by [`EntityId::PLAYER`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    position: Position,
    facing: CardinalDirection,
    health: i32,
    max_health: i32,
    attack: u32,
}

impl Player {
    pub fn new(position: Position, max_health: i32, attack: u32) -> Self {
        Self {
            position,
            facing: CardinalDirection::default(),
            health: max_health,
            max_health,
            attack,
        }
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn attack_damage(&self) -> u32 {
        self.attack
    }

    /// The cell the player would strike with an attack.
    pub fn facing_target(&self) -> Position {
        self.position.step(self.facing)
    }
}

impl GridOccupant for Player {
    fn id(&self) -> EntityId {
        EntityId::PLAYER
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

impl Damageable for Player {
    fn health(&self) -> i32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        apply_damage(&mut self.health, amount)
    }

    /// Healing never exceeds max health.
    fn heal(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_faces_down_at_full_health() {
        let player = Player::new(Position::new(2, 2), 20, 5);
        assert_eq!(player.id(), EntityId::PLAYER);
        assert_eq!(player.facing(), CardinalDirection::Down);
        assert_eq!(player.health(), 20);
        assert_eq!(player.facing_target(), Position::new(2, 1));
    }

    #[test]
    fn heal_clamps_to_max_health() {
        let mut player = Player::new(Position::ORIGIN, 20, 5);
        player.take_damage(7);
        player.heal(3);
        assert_eq!(player.health(), 16);
        player.heal(50);
        assert_eq!(player.health(), 20);
    }

    #[test]
    fn dies_at_zero_health() {
        let mut player = Player::new(Position::ORIGIN, 20, 5);
        assert_eq!(
            player.take_damage(19),
            DamageOutcome::Survived { remaining: 1 }
        );
        assert!(!player.is_dead());
        assert_eq!(player.take_damage(1), DamageOutcome::Died);
        assert!(player.is_dead());
    }
}
