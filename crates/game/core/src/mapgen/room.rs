use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::MapBounds;
use crate::state::Position;

/// A connected blob of stamped floor, alive only while a map is generated.
#[derive(Clone, Debug, Default)]
pub(super) struct Room {
    tiles: Vec<Position>,
    members: HashSet<Position>,
}

impl Room {
    pub(super) fn from_tiles(tiles: impl IntoIterator<Item = Position>) -> Self {
        let mut room = Self::default();
        room.extend(tiles);
        room
    }

    fn extend(&mut self, tiles: impl IntoIterator<Item = Position>) {
        for tile in tiles {
            if self.members.insert(tile) {
                self.tiles.push(tile);
            }
        }
    }

    pub(super) fn len(&self) -> usize {
        self.tiles.len()
    }

    pub(super) fn contains(&self, position: Position) -> bool {
        self.members.contains(&position)
    }

    /// True when any pair of tiles across the two rooms overlaps or is
    /// orthogonally adjacent (distance ≤ 1).
    pub(super) fn touches(&self, other: &Room) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.tiles.iter().any(|tile| {
            large.contains(*tile)
                || tile
                    .neighbors()
                    .iter()
                    .any(|(_, neighbor)| large.contains(*neighbor))
        })
    }

    /// Union of both rooms; `self`'s tiles keep their order, new tiles follow.
    pub(super) fn merged_with(mut self, other: Room) -> Room {
        self.extend(other.tiles);
        self
    }

    /// Tiles with at least one orthogonal neighbour outside the room.
    pub(super) fn edge_tiles(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .copied()
            .filter(|tile| {
                tile.neighbors()
                    .iter()
                    .any(|(_, neighbor)| !self.contains(*neighbor))
            })
            .collect()
    }

    /// Random edge tile, or any tile when the room has no edge. `None` only
    /// for an empty room.
    pub(super) fn random_edge_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let edges = self.edge_tiles();
        if edges.is_empty() {
            self.tiles.choose(rng).copied()
        } else {
            edges.choose(rng).copied()
        }
    }

    pub(super) fn bounds(&self) -> Option<MapBounds> {
        let first = *self.tiles.first()?;
        Some(
            self.tiles
                .iter()
                .fold(MapBounds::point(first), |bounds, tile| bounds.including(*tile)),
        )
    }
}

/// Adds `stamp` to `rooms`, first folding in every room it touches until no
/// remaining room touches the union.
pub(super) fn absorb(rooms: &mut Vec<Room>, mut stamp: Room) {
    while let Some(index) = rooms.iter().position(|room| room.touches(&stamp)) {
        let existing = rooms.remove(index);
        stamp = existing.merged_with(stamp);
    }
    rooms.push(stamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i32, y: i32, size: i32) -> Room {
        Room::from_tiles((0..size).flat_map(|i| (0..size).map(move |j| Position::new(x + i, y - j))))
    }

    #[test]
    fn adjacent_rooms_touch_but_diagonal_ones_do_not() {
        let base = square(0, 0, 2);
        assert!(base.touches(&square(2, 0, 2)));
        assert!(base.touches(&square(1, 0, 2)));
        assert!(!base.touches(&square(2, -2, 2)));
        assert!(!base.touches(&square(3, 0, 2)));
    }

    #[test]
    fn absorb_merges_transitively() {
        let mut rooms = Vec::new();
        absorb(&mut rooms, square(0, 0, 2));
        absorb(&mut rooms, square(4, 0, 2));
        assert_eq!(rooms.len(), 2);

        // Bridges both existing rooms at once.
        absorb(&mut rooms, square(2, 0, 2));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 12);
    }

    #[test]
    fn merge_drops_duplicate_tiles() {
        let merged = square(0, 0, 3).merged_with(square(1, -1, 3));
        assert_eq!(merged.len(), 9 + 9 - 4);
    }

    #[test]
    fn edge_tiles_exclude_the_interior() {
        let room = square(0, 0, 3);
        let edges = room.edge_tiles();
        assert_eq!(edges.len(), 8);
        assert!(!edges.contains(&Position::new(1, -1)));
    }

    #[test]
    fn single_tile_room_is_its_own_edge() {
        let room = square(5, 5, 1);
        assert_eq!(room.edge_tiles(), vec![Position::new(5, 5)]);
        let bounds = room.bounds().expect("non-empty room");
        assert_eq!(bounds.min, Position::new(5, 5));
        assert_eq!(bounds.max, Position::new(5, 5));
    }
}
