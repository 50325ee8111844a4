use crate::state::{Position, Tile};

/// Read-only tile lookup over an unbounded grid.
pub trait MapOracle {
    /// Recorded tile at `position`, or `None` when the cell is unset.
    fn tile(&self, position: Position) -> Option<Tile>;

    /// True iff the recorded tile is [`Tile::Pathable`]. Unset cells are not walkable.
    fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_pathable)
    }

    fn contains(&self, position: Position) -> bool {
        self.tile(position).is_some()
    }
}

impl<T: MapOracle + ?Sized> MapOracle for &T {
    fn tile(&self, position: Position) -> Option<Tile> {
        (**self).tile(position)
    }
}
