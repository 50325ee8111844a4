//! Entity capabilities and the concrete entity kinds.
//!
//! The grid and the turn logic only ever talk to entities through the small
//! capability traits below; concrete kinds live in their own modules and are
//! resolved from opaque [`EntityId`]s through [`EntityTable`].
mod player;
mod spider;
mod table;

use std::fmt;

pub use player::Player;
pub use spider::Spider;
pub use table::EntityTable;

use crate::state::{CardinalDirection, EntityId, Position};

/// Something that stands on exactly one grid cell.
///
/// `set_position` is only called by [`crate::GridStore`] as part of a placement
/// or move, so the recorded coordinate never drifts from the grid.
pub trait GridOccupant {
    fn id(&self) -> EntityId;

    fn position(&self) -> Position;

    fn set_position(&mut self, position: Position);

    fn facing(&self) -> CardinalDirection;

    fn set_facing(&mut self, facing: CardinalDirection);
}

/// Result of applying damage to a [`Damageable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageOutcome {
    Survived { remaining: i32 },
    Died,
}

impl DamageOutcome {
    pub fn is_fatal(self) -> bool {
        matches!(self, DamageOutcome::Died)
    }
}

pub trait Damageable {
    fn health(&self) -> i32;

    fn take_damage(&mut self, amount: u32) -> DamageOutcome;

    fn heal(&mut self, amount: u32);

    fn is_dead(&self) -> bool {
        self.health() <= 0
    }
}

/// Enemy kinds known to the simulation.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyKind {
    #[default]
    Spider,
}

/// A hostile occupant driven by the enemy phase.
pub trait Enemy: GridOccupant + Damageable + Send + Sync + fmt::Debug {
    fn kind(&self) -> EnemyKind;

    fn attack_damage(&self) -> u32;
}

pub(crate) fn apply_damage(health: &mut i32, amount: u32) -> DamageOutcome {
    let amount = i32::try_from(amount).unwrap_or(i32::MAX);
    *health = health.saturating_sub(amount);
    if *health <= 0 {
        DamageOutcome::Died
    } else {
        DamageOutcome::Survived { remaining: *health }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_reports_remaining_health() {
        let mut health = 10;
        assert_eq!(
            apply_damage(&mut health, 4),
            DamageOutcome::Survived { remaining: 6 }
        );
        assert_eq!(apply_damage(&mut health, 6), DamageOutcome::Died);
        assert_eq!(health, 0);
    }

    #[test]
    fn huge_damage_does_not_overflow() {
        let mut health = 3;
        assert!(apply_damage(&mut health, u32::MAX).is_fatal());
        assert!(health < 0);
    }

    #[test]
    fn enemy_kind_round_trips_through_strings() {
        assert_eq!(EnemyKind::Spider.to_string(), "spider");
        assert_eq!("SPIDER".parse::<EnemyKind>(), Ok(EnemyKind::Spider));
    }
}
