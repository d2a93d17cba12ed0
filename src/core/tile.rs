//! Tiles: positioned, power-of-two valued tokens.
//!
//! A tile only does position bookkeeping. `previous_position` and
//! `merged_from` are per-turn animation metadata; they are reset at the
//! start of every move and never influence game outcome, with one
//! exception: a tile whose `merged_from` is set cannot absorb another
//! merge in the same turn.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Stable identifier of a tile within one grid's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// The two tiles consumed by a merge, as they stood when they combined.
///
/// `moving` has already been converged onto the merge cell; its
/// `previous_position` tells a renderer where it slid in from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedFrom {
    pub moving: Tile,
    pub target: Tile,
}

/// A grid-resident value token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub x: i32,
    pub y: i32,
    pub value: u32,
    pub previous_position: Option<Position>,
    pub merged_from: Option<Box<MergedFrom>>,
}

impl Tile {
    /// Create a tile at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a power of two of at least 2.
    #[must_use]
    pub fn new(id: TileId, position: Position, value: u32) -> Self {
        assert!(is_tile_value(value), "tile value must be a power of two >= 2, got {value}");
        Self {
            id,
            x: position.x,
            y: position.y,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Copy the current coordinates into `previous_position`.
    pub fn save_position(&mut self) {
        self.previous_position = Some(self.position());
    }

    /// Overwrite the current coordinates.
    pub fn update_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Whether this tile already absorbed a merge this turn.
    #[must_use]
    pub fn has_merged(&self) -> bool {
        self.merged_from.is_some()
    }

    /// Persistent form of this tile (animation metadata excluded).
    #[must_use]
    pub fn serialize(&self) -> TileSnapshot {
        TileSnapshot {
            position: self.position(),
            value: self.value,
        }
    }
}

/// Serialized tile: `{ "position": { "x", "y" }, "value" }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub position: Position,
    pub value: u32,
}

/// Whether `value` is a legal tile value.
#[must_use]
pub const fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}
