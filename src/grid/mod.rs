//! The game board.
//!
//! `GridState` owns the tiles and answers spatial queries; `Traversals` and
//! `FarthestPosition` are the two geometric helpers move resolution needs.
//! The grid has no notion of score or turns.

pub mod state;
pub mod traversal;

pub use state::{CellList, GridSnapshot, GridState};
pub use traversal::{FarthestPosition, Traversals};
