use std::fmt;

/// Opaque handle for an entity standing on the grid.
///
/// The grid only ever stores this identifier; the entity itself lives in
/// [`crate::EntityTable`] and is resolved through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// The grid is unbounded in every direction, so negative coordinates are
/// ordinary addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn step(self, direction: CardinalDirection) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Sum of the absolute axis differences.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Straight-line distance, used to rank candidate corridor endpoints.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }

    /// The four axis-aligned neighbours, keyed by direction. No diagonals.
    pub fn neighbors(self) -> [(CardinalDirection, Position); 4] {
        CardinalDirection::ALL.map(|direction| (direction, self.step(direction)))
    }

    /// Direction of travel from `self` to `other`.
    ///
    /// Horizontal movement wins when both axes differ. Returns `None` when
    /// the positions are equal.
    pub fn direction_to(self, other: Position) -> Option<CardinalDirection> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx > 0 {
            Some(CardinalDirection::Right)
        } else if dx < 0 {
            Some(CardinalDirection::Left)
        } else if dy > 0 {
            Some(CardinalDirection::Up)
        } else if dy < 0 {
            Some(CardinalDirection::Down)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned movement and facing directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CardinalDirection {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::Up,
        CardinalDirection::Down,
        CardinalDirection::Left,
        CardinalDirection::Right,
    ];

    /// Unit vector for this direction; `Up` increases `y`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::Up => (0, 1),
            CardinalDirection::Down => (0, -1),
            CardinalDirection::Left => (-1, 0),
            CardinalDirection::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            CardinalDirection::Up => CardinalDirection::Down,
            CardinalDirection::Down => CardinalDirection::Up,
            CardinalDirection::Left => CardinalDirection::Right,
            CardinalDirection::Right => CardinalDirection::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn manhattan_distance_handles_negative_coordinates() {
        let from = Position::new(-5, -3);
        let to = Position::new(2, 4);
        assert_eq!(from.manhattan_distance(to), 14);
        assert_eq!(Position::new(0, 0).manhattan_distance(Position::new(3, 4)), 7);
    }

    #[test]
    fn neighbors_are_axis_aligned() {
        let origin = Position::new(5, 5);
        let neighbors = origin.neighbors();

        assert_eq!(neighbors.len(), 4);
        for (direction, neighbor) in neighbors {
            assert_eq!(origin.manhattan_distance(neighbor), 1);
            assert_eq!(origin.direction_to(neighbor), Some(direction));
        }
    }

    #[test]
    fn direction_to_prefers_horizontal_axis() {
        let origin = Position::ORIGIN;
        assert_eq!(
            origin.direction_to(Position::new(2, 3)),
            Some(CardinalDirection::Right)
        );
        assert_eq!(
            origin.direction_to(Position::new(0, -1)),
            Some(CardinalDirection::Down)
        );
        assert_eq!(origin.direction_to(origin), None);
    }

    proptest! {
        #[test]
        fn manhattan_distance_is_symmetric(
            ax in -1000i32..1000, ay in -1000i32..1000,
            bx in -1000i32..1000, by in -1000i32..1000,
        ) {
            let a = Position::new(ax, ay);
            let b = Position::new(bx, by);
            prop_assert_eq!(a.manhattan_distance(b), b.manhattan_distance(a));
            prop_assert_eq!(a.manhattan_distance(a), 0);
            prop_assert_eq!(a.manhattan_distance(b) == 0, a == b);
        }

        #[test]
        fn step_then_opposite_returns_home(x in -1000i32..1000, y in -1000i32..1000, index in 0usize..4) {
            let direction = CardinalDirection::ALL[index];
            let start = Position::new(x, y);
            prop_assert_eq!(start.step(direction).step(direction.opposite()), start);
        }
    }
}
