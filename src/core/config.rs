//! Session configuration parameters.

use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::rng::GameRng;
use super::tile::is_tile_value;

/// Number of tiles spawned when a fresh game starts.
pub const START_TILES: usize = 2;

/// Default side length of the grid.
pub const DEFAULT_SIZE: usize = 4;

/// Value of the winning tile.
pub const DEFAULT_WIN_VALUE: u32 = 2048;

/// Session configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length of the square grid (default: 4).
    pub size: usize,

    /// Seed for the spawn RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Merging into a tile of exactly this value wins the game.
    ///
    /// The game is always played to 2048. This only exists so tests and
    /// benchmarks can reach a win on a small grid without scripting a
    /// thousand moves.
    pub win_value: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: None,
            win_value: DEFAULT_WIN_VALUE,
        }
    }
}

impl SessionConfig {
    /// Create a new config with custom grid size.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn with_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Grid size must be at least 1");
        self.size = size;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with a lowered win value, for tests.
    pub fn with_win_value(mut self, value: u32) -> Self {
        assert!(is_tile_value(value), "Win value must be a power of two >= 2");
        self.win_value = value;
        self
    }

    /// Check the fields a deserialized config could get wrong.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `size` is zero or `win_value` is not a power of
    /// two of at least 2.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.size == 0 {
            return Err(SessionError::invalid_config("grid size must be at least 1"));
        }
        if !is_tile_value(self.win_value) {
            return Err(SessionError::invalid_config(format!(
                "win value {} is not a power of two >= 2",
                self.win_value
            )));
        }
        Ok(())
    }

    /// Build the spawn RNG described by this config.
    #[must_use]
    pub fn rng(&self) -> GameRng {
        match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        }
    }
}
