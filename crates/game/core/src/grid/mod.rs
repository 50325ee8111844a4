//! Authoritative tile and occupancy storage.
//!
//! [`GridStore`] is the single owner of cell records. It knows nothing about
//! how tiles were generated or how paths are chosen; it only answers "what is
//! here" and performs the one sanctioned operation that moves an occupant,
//! keeping the occupant's own coordinate and the grid in lockstep.
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rand::Rng;

use crate::entity::GridOccupant;
use crate::env::MapOracle;
use crate::state::{CardinalDirection, EntityId, Position, Tile};

/// How [`GridStore::set_tile`] treats a cell that already has a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Overwrite,
    /// Leave existing tiles untouched; only unset cells are written.
    KeepExisting,
}

/// Tile and occupant recorded for a single coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub tile: Tile,
    /// Weak reference to whoever stands here, resolved through the entity table.
    pub occupant: Option<EntityId>,
}

/// Running extent of every coordinate ever written: largest `x`, smallest `y`.
///
/// Informational only; nothing relies on it for correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridExtent {
    pub max_x: i32,
    pub min_y: i32,
}

#[derive(Clone, Debug, Default)]
pub struct GridStore {
    cells: HashMap<Position, CellRecord>,
    /// Every coordinate ever stamped pathable, duplicates included.
    walkable_pool: Vec<Position>,
    extent: Option<GridExtent>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `tile` at `position`, preserving any occupant already recorded.
    ///
    /// Returns `false` when `mode` is [`WriteMode::KeepExisting`] and the cell
    /// already had a tile, in which case nothing changes.
    pub fn set_tile(&mut self, position: Position, tile: Tile, mode: WriteMode) -> bool {
        match self.cells.entry(position) {
            Entry::Occupied(mut entry) => {
                if mode == WriteMode::KeepExisting {
                    return false;
                }
                entry.get_mut().tile = tile;
            }
            Entry::Vacant(entry) => {
                entry.insert(CellRecord {
                    tile,
                    occupant: None,
                });
            }
        }

        self.extent = Some(match self.extent {
            Some(extent) => GridExtent {
                max_x: extent.max_x.max(position.x),
                min_y: extent.min_y.min(position.y),
            },
            None => GridExtent {
                max_x: position.x,
                min_y: position.y,
            },
        });

        if tile.is_pathable() {
            self.walkable_pool.push(position);
        }
        true
    }

    pub fn get_tile(&self, position: Position) -> Option<Tile> {
        self.cells.get(&position).map(|cell| cell.tile)
    }

    pub fn cell(&self, position: Position) -> Option<&CellRecord> {
        self.cells.get(&position)
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.get_tile(position).is_some_and(Tile::is_pathable)
    }

    pub fn has_occupant(&self, position: Position) -> bool {
        self.get_occupant(position).is_some()
    }

    pub fn get_occupant(&self, position: Position) -> Option<EntityId> {
        self.cells.get(&position).and_then(|cell| cell.occupant)
    }

    /// Records `occupant` at `position`. No-op returning `false` on unset cells,
    /// so occupancy can never create a cell without a tile.
    pub fn set_occupant(&mut self, position: Position, occupant: EntityId) -> bool {
        match self.cells.get_mut(&position) {
            Some(cell) => {
                cell.occupant = Some(occupant);
                true
            }
            None => false,
        }
    }

    /// Clears and returns whatever occupant was recorded at `position`.
    pub fn clear_occupant(&mut self, position: Position) -> Option<EntityId> {
        self.cells
            .get_mut(&position)
            .and_then(|cell| cell.occupant.take())
    }

    /// Puts a freshly spawned occupant onto the grid at `position`.
    ///
    /// The target must be walkable and empty. On success the occupant's own
    /// coordinate is updated to match.
    pub fn place_occupant<O>(&mut self, occupant: &mut O, position: Position) -> bool
    where
        O: GridOccupant + ?Sized,
    {
        if !self.is_walkable(position) || self.has_occupant(position) {
            return false;
        }
        self.set_occupant(position, occupant.id());
        occupant.set_position(position);
        true
    }

    /// Removes `occupant` from the cell it claims to stand on, if the grid agrees.
    pub fn remove_occupant<O>(&mut self, occupant: &O) -> bool
    where
        O: GridOccupant + ?Sized,
    {
        let position = occupant.position();
        if self.get_occupant(position) != Some(occupant.id()) {
            return false;
        }
        self.clear_occupant(position).is_some()
    }

    /// Moves `occupant` one step in `direction`.
    ///
    /// Succeeds only when the destination is pathable and empty; the source
    /// cell is cleared, the destination claimed, and the occupant's recorded
    /// coordinate updated together. Anything else leaves all state untouched.
    pub fn move_occupant<O>(&mut self, occupant: &mut O, direction: CardinalDirection) -> bool
    where
        O: GridOccupant + ?Sized,
    {
        let id = occupant.id();
        let source = occupant.position();
        let target = source.step(direction);

        if self.get_occupant(source) != Some(id) {
            tracing::debug!(
                target: "game_core::grid",
                occupant = %id,
                position = %source,
                "occupant not recorded at its own position; move refused"
            );
            return false;
        }

        match self.cells.get(&target) {
            Some(cell) if cell.tile.is_pathable() && cell.occupant.is_none() => {}
            _ => return false,
        }

        self.clear_occupant(source);
        self.set_occupant(target, id);
        occupant.set_position(target);
        true
    }

    /// Uniform pick from the walkable pool.
    ///
    /// # Panics
    ///
    /// Panics if nothing has ever been stamped pathable; callers that can
    /// legitimately see an empty dungeon use [`Self::try_random_walkable_coord`].
    pub fn random_walkable_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        self.try_random_walkable_coord(rng)
            .unwrap_or_else(|| panic!("random walkable coordinate requested from an empty pool"))
    }

    pub fn try_random_walkable_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        if self.walkable_pool.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.walkable_pool.len());
        Some(self.walkable_pool[index])
    }

    pub fn adjacent_coords(&self, position: Position) -> [(CardinalDirection, Position); 4] {
        position.neighbors()
    }

    pub fn walkable_pool(&self) -> &[Position] {
        &self.walkable_pool
    }

    /// Distinct coordinates whose current tile is pathable.
    pub fn walkable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.tile.is_pathable())
            .map(|(position, _)| *position)
    }

    pub fn extent(&self) -> Option<GridExtent> {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl MapOracle for GridStore {
    fn tile(&self, position: Position) -> Option<Tile> {
        self.get_tile(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Spider;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn floor(grid: &mut GridStore, xs: std::ops::RangeInclusive<i32>, ys: std::ops::RangeInclusive<i32>) {
        for x in xs {
            for y in ys.clone() {
                grid.set_tile(Position::new(x, y), Tile::Pathable, WriteMode::Overwrite);
            }
        }
    }

    #[test]
    fn adjacent_coords_are_the_four_axis_neighbors() {
        let mut grid = GridStore::new();
        floor(&mut grid, 0..=2, 0..=2);
        let center = Position::new(1, 1);

        let adjacent = grid.adjacent_coords(center);
        let mut positions: Vec<Position> = adjacent.iter().map(|(_, position)| *position).collect();
        positions.sort();
        let mut expected = vec![
            Position::new(1, 2),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(2, 1),
        ];
        expected.sort();
        assert_eq!(positions, expected);

        for (direction, position) in adjacent {
            assert_eq!(center.step(direction), position);
            assert!(grid.is_walkable(position));
        }

        // Off the edge of the stamped area the coordinates are still reported.
        let corner = grid.adjacent_coords(Position::new(0, 0));
        assert!(corner.iter().any(|(_, position)| grid.get_tile(*position).is_none()));
    }

    #[test]
    fn keep_existing_preserves_pathable_tiles() {
        let mut grid = GridStore::new();
        let position = Position::new(2, 3);
        assert!(grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite));
        assert!(!grid.set_tile(position, Tile::Blocked, WriteMode::KeepExisting));
        assert_eq!(grid.get_tile(position), Some(Tile::Pathable));

        assert!(grid.set_tile(Position::new(9, 9), Tile::Blocked, WriteMode::KeepExisting));
        assert_eq!(grid.get_tile(Position::new(9, 9)), Some(Tile::Blocked));
    }

    #[test]
    fn overwrite_keeps_occupant() {
        let mut grid = GridStore::new();
        let position = Position::new(1, 1);
        grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite);
        grid.set_occupant(position, EntityId(7));
        grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite);
        assert_eq!(grid.get_occupant(position), Some(EntityId(7)));
    }

    #[test]
    fn extent_tracks_max_x_and_min_y() {
        let mut grid = GridStore::new();
        assert_eq!(grid.extent(), None);
        grid.set_tile(Position::new(3, 4), Tile::Pathable, WriteMode::Overwrite);
        grid.set_tile(Position::new(-2, -6), Tile::Blocked, WriteMode::Overwrite);
        grid.set_tile(Position::new(8, 10), Tile::Blocked, WriteMode::Overwrite);
        assert_eq!(grid.extent(), Some(GridExtent { max_x: 8, min_y: -6 }));
    }

    #[test]
    fn walkable_pool_keeps_duplicates() {
        let mut grid = GridStore::new();
        let position = Position::new(0, 0);
        grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite);
        grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite);
        grid.set_tile(Position::new(1, 0), Tile::Blocked, WriteMode::Overwrite);
        assert_eq!(grid.walkable_pool(), &[position, position]);
        assert_eq!(grid.walkable_positions().count(), 1);
    }

    #[test]
    fn occupancy_on_unset_cell_is_a_no_op() {
        let mut grid = GridStore::new();
        let position = Position::new(4, 4);
        assert!(!grid.set_occupant(position, EntityId(1)));
        assert_eq!(grid.clear_occupant(position), None);
        assert!(grid.is_empty());
        assert!(!grid.has_occupant(position));
    }

    #[test]
    fn unset_and_blocked_cells_are_not_walkable() {
        let mut grid = GridStore::new();
        grid.set_tile(Position::new(0, 0), Tile::Blocked, WriteMode::Overwrite);
        assert!(!grid.is_walkable(Position::new(0, 0)));
        assert!(!grid.is_walkable(Position::new(5, 5)));
    }

    #[test]
    fn random_walkable_coord_samples_pool() {
        let mut grid = GridStore::new();
        floor(&mut grid, 0..=2, 0..=2);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..32 {
            assert!(grid.is_walkable(grid.random_walkable_coord(&mut rng)));
        }
    }

    #[test]
    #[should_panic(expected = "empty pool")]
    fn random_walkable_coord_panics_on_empty_pool() {
        let grid = GridStore::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        grid.random_walkable_coord(&mut rng);
    }

    #[test]
    fn move_succeeds_into_empty_floor() {
        let mut grid = GridStore::new();
        floor(&mut grid, 0..=1, 0..=0);
        let mut spider = Spider::new(EntityId(1), Position::ORIGIN, 10, 2);
        assert!(grid.place_occupant(&mut spider, Position::ORIGIN));

        assert!(grid.move_occupant(&mut spider, CardinalDirection::Right));
        assert_eq!(spider.position(), Position::new(1, 0));
        assert_eq!(grid.get_occupant(Position::new(1, 0)), Some(EntityId(1)));
        assert!(!grid.has_occupant(Position::ORIGIN));
    }

    #[test]
    fn move_into_blocked_unset_or_occupied_cell_fails() {
        let mut grid = GridStore::new();
        floor(&mut grid, 0..=1, 0..=0);
        grid.set_tile(Position::new(0, 1), Tile::Blocked, WriteMode::Overwrite);

        let mut first = Spider::new(EntityId(1), Position::ORIGIN, 10, 2);
        let mut second = Spider::new(EntityId(2), Position::ORIGIN, 10, 2);
        assert!(grid.place_occupant(&mut first, Position::ORIGIN));
        assert!(grid.place_occupant(&mut second, Position::new(1, 0)));

        assert!(!grid.move_occupant(&mut first, CardinalDirection::Up));
        assert!(!grid.move_occupant(&mut first, CardinalDirection::Left));
        assert!(!grid.move_occupant(&mut first, CardinalDirection::Right));
        assert_eq!(first.position(), Position::ORIGIN);
        assert_eq!(grid.get_occupant(Position::ORIGIN), Some(EntityId(1)));
        assert_eq!(grid.get_occupant(Position::new(1, 0)), Some(EntityId(2)));
    }

    #[test]
    fn place_refuses_occupied_cell() {
        let mut grid = GridStore::new();
        floor(&mut grid, 0..=0, 0..=0);
        let mut first = Spider::new(EntityId(1), Position::ORIGIN, 10, 2);
        let mut second = Spider::new(EntityId(2), Position::new(3, 3), 10, 2);
        assert!(grid.place_occupant(&mut first, Position::ORIGIN));
        assert!(!grid.place_occupant(&mut second, Position::ORIGIN));
        assert_eq!(second.position(), Position::new(3, 3));
        assert!(grid.remove_occupant(&first));
        assert!(!grid.has_occupant(Position::ORIGIN));
    }

    proptest! {
        #[test]
        fn moves_never_desync_or_stack_occupants(
            blocked in proptest::collection::vec((0i32..6, 0i32..6), 0..10),
            moves in proptest::collection::vec((0usize..3, 0usize..4), 0..200),
        ) {
            let mut grid = GridStore::new();
            floor(&mut grid, 0..=5, 0..=5);
            for (x, y) in blocked {
                grid.set_tile(Position::new(x, y), Tile::Blocked, WriteMode::Overwrite);
            }

            let starts = [Position::new(0, 0), Position::new(5, 5), Position::new(0, 5)];
            let mut spiders: Vec<Spider> = Vec::new();
            for (index, start) in starts.into_iter().enumerate() {
                grid.set_tile(start, Tile::Pathable, WriteMode::Overwrite);
                let mut spider = Spider::new(EntityId(index as u32 + 1), start, 10, 2);
                prop_assert!(grid.place_occupant(&mut spider, start));
                spiders.push(spider);
            }

            for (who, direction) in moves {
                grid.move_occupant(&mut spiders[who], CardinalDirection::ALL[direction]);

                for spider in &spiders {
                    prop_assert_eq!(grid.get_occupant(spider.position()), Some(spider.id()));
                }
                let occupied = grid
                    .walkable_positions()
                    .filter(|position| grid.has_occupant(*position))
                    .count();
                prop_assert_eq!(occupied, spiders.len());
            }
        }
    }
}
