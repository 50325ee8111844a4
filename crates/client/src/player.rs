//! Automatic player policy used by the headless client.
use async_trait::async_trait;
use runtime::{GameSnapshot, PlayerAction, PlayerProvider};

/// Stands its ground and fights whatever comes adjacent.
///
/// An adjacent enemy the player is not facing is turned toward with a move
/// (which bumps, since the tile is occupied); one it already faces is
/// attacked. With nothing adjacent the player swings at the air and lets the
/// enemies come.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPlayer;

impl AutoPlayer {
    pub fn choose(snapshot: &GameSnapshot) -> PlayerAction {
        let Some(player) = snapshot.player else {
            return PlayerAction::Attack;
        };
        match snapshot.adjacent_enemy() {
            Some((direction, _)) if direction != player.facing => PlayerAction::Move(direction),
            _ => PlayerAction::Attack,
        }
    }
}

#[async_trait]
impl PlayerProvider for AutoPlayer {
    async fn provide_action(&self, snapshot: &GameSnapshot) -> runtime::Result<PlayerAction> {
        Ok(Self::choose(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use game_core::{CardinalDirection, EnemyKind, EntityId, Position};
    use runtime::{EnemyView, PlayerView, TurnPhase};

    use super::*;

    fn snapshot(facing: CardinalDirection, enemies: &[(u32, Position)]) -> GameSnapshot {
        GameSnapshot {
            phase: TurnPhase::PlayerPhase,
            turn: 1,
            player: Some(PlayerView {
                position: Position::new(0, 0),
                facing,
                health: 20,
                max_health: 20,
            }),
            enemies: enemies
                .iter()
                .map(|&(id, position)| EnemyView {
                    id: EntityId(id),
                    kind: EnemyKind::Spider,
                    position,
                    facing: CardinalDirection::Down,
                    health: 10,
                })
                .collect(),
            score: 0,
            round: 1,
            game_over: false,
        }
    }

    #[test]
    fn turns_toward_adjacent_enemy() {
        let snapshot = snapshot(CardinalDirection::Down, &[(1, Position::new(1, 0))]);
        assert_eq!(
            AutoPlayer::choose(&snapshot),
            PlayerAction::Move(CardinalDirection::Right)
        );
    }

    #[test]
    fn attacks_enemy_it_faces() {
        let snapshot = snapshot(CardinalDirection::Up, &[(1, Position::new(0, 1))]);
        assert_eq!(AutoPlayer::choose(&snapshot), PlayerAction::Attack);
    }

    #[test]
    fn holds_position_when_nothing_is_adjacent() {
        let snapshot = snapshot(CardinalDirection::Left, &[(1, Position::new(4, 4))]);
        assert_eq!(AutoPlayer::choose(&snapshot), PlayerAction::Attack);
    }
}
