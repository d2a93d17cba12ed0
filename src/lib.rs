//! # rust-2048
//!
//! A deterministic sliding-tile merge game engine.
//!
//! ## Design Principles
//!
//! 1. **Deterministic core**: all randomness flows through an injected
//!    `RandomSource`, so a seed (or a scripted source) reproduces a game.
//!
//! 2. **Collaborators at the edges**: rendering, input and persistence are
//!    traits. The session owns its grid and only tells collaborators about
//!    completed transactions.
//!
//! 3. **Arena, not aliases**: tiles live in an arena keyed by `TileId`; the
//!    grid stores ids. Removing a tile mid-move never leaves a stale reference.
//!
//! ## Modules
//!
//! - `core`: positions, directions, tiles, RNG, configuration, errors
//! - `grid`: grid state, traversal order, farthest-position search
//! - `session`: move resolution and the game lifecycle
//! - `render`: render adapter trait and a text renderer
//! - `input`: commands, input sources, ordered callback registry
//! - `persistence`: storage capabilities and session snapshots
//!
//! ## Example
//!
//! ```
//! use rust_2048::{Direction, GameSession, SessionConfig};
//!
//! let mut session = GameSession::in_memory(SessionConfig::default().with_seed(42));
//! let outcome = session.make_move(Direction::Left);
//! assert!(session.score() >= outcome.score_delta);
//! ```

pub mod core;
pub mod grid;
pub mod session;
pub mod render;
pub mod input;
pub mod persistence;

// Re-export commonly used types
pub use crate::core::{
    Direction, Position, Vector,
    Tile, TileId, TileSnapshot, MergedFrom,
    GameRng, GameRngState, RandomSource,
    SessionConfig, SessionError,
};

pub use crate::grid::{GridState, GridSnapshot, Traversals, FarthestPosition};

pub use crate::session::{GameSession, SessionStatus, MoveOutcome};

pub use crate::render::{RenderAdapter, Metadata, TextRenderer, NullRenderer};

pub use crate::input::{Command, CommandQueue, InputSource, Listeners};

pub use crate::persistence::{
    PersistenceAdapter, StorageManager, SessionSnapshot,
    Storage, MemoryStorage, FileStorage,
};
