use game_core::{CardinalDirection, DamageOutcome, EntityId, Position};
use serde::{Deserialize, Serialize};

use super::TurnPhase;

/// Intent submitted by the player for one player phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Face `direction`, then try to step that way.
    Move(CardinalDirection),
    /// Strike the tile in the facing direction.
    Attack,
}

/// What a committed player action actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEffect {
    Moved { from: Position, to: Position },
    /// The move was refused by the grid; only facing changed.
    Bumped { facing: CardinalDirection },
    Hit {
        target: EntityId,
        damage: u32,
        outcome: DamageOutcome,
    },
    Missed { target: Position },
}

/// Reply to [`crate::RuntimeHandle::submit_player_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerActionReport {
    /// The action arrived outside the player phase and had no effect.
    Ignored { phase: TurnPhase },
    /// The action ended the player phase; the enemy phase has completed.
    Resolved {
        turn: u64,
        effect: ActionEffect,
        enemies_acted: usize,
    },
}

impl PlayerActionReport {
    pub fn effect(&self) -> Option<ActionEffect> {
        match self {
            PlayerActionReport::Resolved { effect, .. } => Some(*effect),
            PlayerActionReport::Ignored { .. } => None,
        }
    }
}
