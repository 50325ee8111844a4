/// Walkability class recorded for a grid cell.
///
/// A cell with no recorded tile is *unset*; APIs model that as `None` rather
/// than a third variant so "never generated" cannot be written by accident.
/// Unset cells are never walkable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tile {
    Pathable,
    Blocked,
}

impl Tile {
    pub fn is_pathable(self) -> bool {
        matches!(self, Tile::Pathable)
    }
}
