//! Authoritative simulation state owned by the simulation worker.
//!
//! [`World`] bundles the grid, the entity table and the stateless services
//! that read them. Every mutation of occupant positions goes through
//! [`GridStore`] so the grid and the entities never disagree.
use game_core::{
    CardinalDirection, ConfigError, DamageOutcome, Damageable, EntityId, EntityTable, GameConfig,
    GenerationReport, GridOccupant, GridStore, MapGenerator, Pathfinder, Player, Position, Spider,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::api::{EnemyView, PlayerView};
use crate::coordinator::ActionEffect;

const PLAYER_PLACEMENT_ATTEMPTS: u32 = 64;

/// Damage dealt by one entity to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeResult {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: u32,
    pub outcome: DamageOutcome,
    /// Where the target stood when hit.
    pub position: Position,
}

#[derive(Debug)]
pub struct World {
    config: GameConfig,
    grid: GridStore,
    entities: EntityTable,
    pathfinder: Pathfinder,
    generator: MapGenerator,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_grid(config, seed, GridStore::new())
    }

    /// Builds a world over pre-existing terrain instead of a generated map.
    pub fn with_grid(config: GameConfig, seed: u64, grid: GridStore) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = MapGenerator::new(config.generation.clone())?;
        Ok(Self {
            config,
            grid,
            entities: EntityTable::new(),
            pathfinder: Pathfinder::new(),
            generator,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn generate_map(&mut self) -> GenerationReport {
        self.generator
            .generate(&mut self.grid, &self.pathfinder, &mut self.rng)
    }

    /// Puts the player on a random free walkable tile.
    pub fn place_player(&mut self) -> Option<Position> {
        let position = self.random_free_tile(PLAYER_PLACEMENT_ATTEMPTS)?;
        let mut player = Player::new(
            position,
            self.config.player_max_health,
            self.config.player_attack,
        );
        if !self.grid.place_occupant(&mut player, position) {
            return None;
        }
        self.entities.spawn_player(player);
        Some(position)
    }

    /// Spawns a spider at `position` if the tile is walkable and free.
    pub fn spawn_enemy_at(&mut self, position: Position) -> Option<EntityId> {
        if !self.grid.is_walkable(position) || self.grid.has_occupant(position) {
            return None;
        }
        let id = self.entities.allocate_id();
        let mut spider = Spider::new(
            id,
            position,
            self.config.spider_health,
            self.config.spider_attack,
        );
        if !self.grid.place_occupant(&mut spider, position) {
            return None;
        }
        Some(self.entities.insert_enemy(Box::new(spider)))
    }

    /// Spawns a spider on a random free walkable tile, trying at most `attempts` tiles.
    pub fn spawn_enemy_randomly(&mut self, attempts: u32) -> Option<(EntityId, Position)> {
        let position = self.random_free_tile(attempts)?;
        self.spawn_enemy_at(position).map(|id| (id, position))
    }

    pub fn despawn_enemy(&mut self, id: EntityId) -> bool {
        match self.entities.remove_enemy(id) {
            Some(enemy) => {
                self.grid.remove_occupant(&*enemy);
                true
            }
            None => false,
        }
    }

    /// Turns the player to `direction`, then tries to step that way.
    pub fn move_player(&mut self, direction: CardinalDirection) -> ActionEffect {
        let Some(player) = self.entities.player_mut() else {
            return ActionEffect::Bumped { facing: direction };
        };
        player.set_facing(direction);
        let from = player.position();
        if self.grid.move_occupant(player, direction) {
            ActionEffect::Moved {
                from,
                to: player.position(),
            }
        } else {
            ActionEffect::Bumped { facing: direction }
        }
    }

    /// Strikes whatever occupies the tile the player faces.
    pub fn player_attack(&mut self) -> (ActionEffect, Option<StrikeResult>) {
        let Some(player) = self.entities.player() else {
            return (
                ActionEffect::Missed {
                    target: Position::ORIGIN,
                },
                None,
            );
        };
        let target_position = player.facing_target();
        let damage = player.attack_damage();

        let strike = self
            .grid
            .get_occupant(target_position)
            .and_then(|target| self.strike(EntityId::PLAYER, target, damage));
        match strike {
            Some(strike) => (
                ActionEffect::Hit {
                    target: strike.target,
                    damage,
                    outcome: strike.outcome,
                },
                Some(strike),
            ),
            None => (
                ActionEffect::Missed {
                    target: target_position,
                },
                None,
            ),
        }
    }

    /// Applies `damage` to `target`. A fatal hit removes the target from the
    /// grid; dead enemies also leave the entity table.
    pub fn strike(&mut self, attacker: EntityId, target: EntityId, damage: u32) -> Option<StrikeResult> {
        let (outcome, position) = if target.is_player() {
            let player = self.entities.player_mut()?;
            let outcome = player.take_damage(damage);
            let position = player.position();
            if outcome.is_fatal() {
                self.grid.remove_occupant(&*player);
            }
            (outcome, position)
        } else {
            let enemy = self.entities.enemy_mut(target)?;
            let outcome = enemy.take_damage(damage);
            let position = enemy.position();
            if outcome.is_fatal() && let Some(enemy) = self.entities.remove_enemy(target) {
                self.grid.remove_occupant(&*enemy);
            }
            (outcome, position)
        };

        Some(StrikeResult {
            attacker,
            target,
            damage,
            outcome,
            position,
        })
    }

    /// Steps an enemy one tile; its facing follows a successful move.
    pub fn move_enemy(&mut self, id: EntityId, direction: CardinalDirection) -> bool {
        let Some(enemy) = self.entities.enemy_mut(id) else {
            return false;
        };
        let moved = self.grid.move_occupant(&mut **enemy, direction);
        if moved {
            enemy.set_facing(direction);
        }
        moved
    }

    pub fn heal_player(&mut self, amount: u32) -> Option<i32> {
        let player = self.entities.player_mut()?;
        player.heal(amount);
        Some(player.health())
    }

    pub fn player_view(&self) -> Option<PlayerView> {
        self.entities.player().map(|player| PlayerView {
            position: player.position(),
            facing: player.facing(),
            health: player.health(),
            max_health: player.max_health(),
        })
    }

    pub fn enemy_views(&self) -> Vec<EnemyView> {
        self.entities
            .enemies()
            .map(|enemy| EnemyView {
                id: enemy.id(),
                kind: enemy.kind(),
                position: enemy.position(),
                facing: enemy.facing(),
                health: enemy.health(),
            })
            .collect()
    }

    fn random_free_tile(&mut self, attempts: u32) -> Option<Position> {
        (0..attempts).find_map(|_| {
            let position = self.grid.try_random_walkable_coord(&mut self.rng)?;
            (self.grid.is_walkable(position) && !self.grid.has_occupant(position))
                .then_some(position)
        })
    }
}
