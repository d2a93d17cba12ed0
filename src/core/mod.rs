//! Core engine types: positions, tiles, RNG, configuration, errors.
//!
//! These are the leaf building blocks. The grid and the session are built
//! on top of them and never reach into the RNG or tile internals directly.

pub mod position;
pub mod tile;
pub mod rng;
pub mod config;
pub mod error;

pub use position::{Direction, Position, Vector};
pub use tile::{is_tile_value, MergedFrom, Tile, TileId, TileSnapshot};
pub use rng::{GameRng, GameRngState, RandomSource};
pub use config::{SessionConfig, DEFAULT_SIZE, DEFAULT_WIN_VALUE, START_TILES};
pub use error::SessionError;
