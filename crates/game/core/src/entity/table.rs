use std::collections::BTreeMap;

use super::{Enemy, Player};
use crate::state::EntityId;

/// Resolves opaque [`EntityId`]s to the entities that own their own state.
///
/// Enemies are kept in id order so iteration is deterministic.
#[derive(Debug)]
pub struct EntityTable {
    player: Option<Player>,
    enemies: BTreeMap<EntityId, Box<dyn Enemy>>,
    next_id: u32,
}

impl EntityTable {
    pub fn new() -> Self {
        Self {
            player: None,
            enemies: BTreeMap::new(),
            next_id: EntityId::PLAYER.0 + 1,
        }
    }

    /// Hands out a fresh enemy identifier. Identifiers are never reused.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// # Panics
    ///
    /// Panics if an enemy with the same id is already present.
    pub fn insert_enemy(&mut self, enemy: Box<dyn Enemy>) -> EntityId {
        let id = enemy.id();
        assert!(!id.is_player(), "enemy cannot use the player id");
        let previous = self.enemies.insert(id, enemy);
        assert!(previous.is_none(), "enemy {id} inserted twice");
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&dyn Enemy> {
        self.enemies.get(&id).map(|enemy| &**enemy as &dyn Enemy)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Box<dyn Enemy>> {
        self.enemies.get_mut(&id)
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Box<dyn Enemy>> {
        self.enemies.remove(&id)
    }

    pub fn contains_enemy(&self, id: EntityId) -> bool {
        self.enemies.contains_key(&id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &dyn Enemy> + '_ {
        self.enemies.values().map(|enemy| &**enemy as &dyn Enemy)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}
