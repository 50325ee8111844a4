//! Enemy behaviour for the enemy phase.
//!
//! Every enemy kind currently shares one policy: strike the player when
//! orthogonally adjacent, otherwise take one step along an A* path toward
//! the player. Occupants are not obstacles to the planner, so a step into a
//! tile that another entity holds is refused and reported as
//! [`EnemyOutcome::Blocked`].
use game_core::{DamageOutcome, Damageable, EntityId, GridOccupant, PathOptions, Position};
use serde::{Deserialize, Serialize};

use crate::world::{StrikeResult, World};

/// What one enemy did with its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyOutcome {
    Attacked {
        target: EntityId,
        damage: u32,
        outcome: DamageOutcome,
    },
    Moved {
        from: Position,
        to: Position,
    },
    /// The next tile on the path was not free.
    Blocked { next: Position },
    NoPath,
    Idle,
}

/// Runs one action for `enemy` against the current world.
pub fn take_turn(world: &mut World, enemy: EntityId) -> (EnemyOutcome, Option<StrikeResult>) {
    let Some(actor) = world.entities().enemy(enemy) else {
        return (EnemyOutcome::Idle, None);
    };
    let from = actor.position();
    let damage = actor.attack_damage();

    let Some(target) = world
        .entities()
        .player()
        .filter(|player| !player.is_dead())
        .map(|player| player.position())
    else {
        return (EnemyOutcome::Idle, None);
    };

    if from.manhattan_distance(target) == 1 {
        return match world.strike(enemy, EntityId::PLAYER, damage) {
            Some(strike) => (
                EnemyOutcome::Attacked {
                    target: EntityId::PLAYER,
                    damage,
                    outcome: strike.outcome,
                },
                Some(strike),
            ),
            None => (EnemyOutcome::Idle, None),
        };
    }

    let Some(path) = world
        .pathfinder()
        .find_path(world.grid(), from, target, &PathOptions::walkable())
    else {
        tracing::debug!(
            target: "runtime::ai",
            %enemy,
            %from,
            %target,
            "no path to player"
        );
        return (EnemyOutcome::NoPath, None);
    };

    let Some(&next) = path.get(1) else {
        return (EnemyOutcome::Idle, None);
    };
    if !world.grid().is_walkable(next) || world.grid().has_occupant(next) {
        return (EnemyOutcome::Blocked { next }, None);
    }

    let moved = from
        .direction_to(next)
        .is_some_and(|direction| world.move_enemy(enemy, direction));
    if moved {
        (EnemyOutcome::Moved { from, to: next }, None)
    } else {
        (EnemyOutcome::Blocked { next }, None)
    }
}
