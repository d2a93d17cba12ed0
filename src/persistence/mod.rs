//! Persistence: best score and in-progress session state.
//!
//! ## Layers
//!
//! - `Storage`: raw string key/value capability (`MemoryStorage`, `FileStorage`)
//! - `PersistenceAdapter`: what the session needs (state + best score)
//! - `StorageManager`: the adapter over any `Storage`, using the keys
//!   `"bestScore"` and `"gameState"`
//!
//! Persistence is fire-and-forget from the session's point of view: the
//! session logs adapter errors and carries on.

mod snapshot;
mod storage;

pub use snapshot::SessionSnapshot;
pub use storage::{FileStorage, MemoryStorage, Storage};

use tracing::{instrument, warn};

use crate::core::SessionError;

/// Key holding the best score.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Key holding the serialized session.
pub const GAME_STATE_KEY: &str = "gameState";

/// Load/save interface consumed by the session.
pub trait PersistenceAdapter {
    /// Stored session, if any.
    ///
    /// # Errors
    ///
    /// A stored value that cannot be decoded is reported as corrupt.
    fn get_state(&self) -> Result<Option<SessionSnapshot>, SessionError>;

    /// Replace the stored session.
    fn set_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError>;

    /// Forget the stored session.
    fn clear_state(&mut self) -> Result<(), SessionError>;

    /// Best score so far; 0 when nothing (readable) is stored.
    fn best_score(&self) -> u64;

    /// Replace the best score.
    fn set_best_score(&mut self, score: u64) -> Result<(), SessionError>;
}

/// `PersistenceAdapter` over an injected `Storage`.
#[derive(Clone, Debug, Default)]
pub struct StorageManager<S: Storage> {
    storage: S,
}

impl StorageManager<MemoryStorage> {
    /// Manager over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl<S: Storage> StorageManager<S> {
    /// Wrap `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the underlying storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Unwrap the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: Storage> PersistenceAdapter for StorageManager<S> {
    fn get_state(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        match self.storage.get(GAME_STATE_KEY)? {
            Some(json) => SessionSnapshot::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(level = "trace", skip_all, fields(score = snapshot.score))]
    fn set_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let json = snapshot.to_json()?;
        self.storage.set(GAME_STATE_KEY, json)
    }

    fn clear_state(&mut self) -> Result<(), SessionError> {
        self.storage.remove(GAME_STATE_KEY)
    }

    fn best_score(&self) -> u64 {
        match self.storage.get(BEST_SCORE_KEY) {
            Ok(Some(text)) => text.trim().parse().unwrap_or_else(|_| {
                warn!(value = %text, "ignoring unreadable best score");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                warn!(error = %err, "failed to read best score");
                0
            }
        }
    }

    fn set_best_score(&mut self, score: u64) -> Result<(), SessionError> {
        self.storage.set(BEST_SCORE_KEY, score.to_string())
    }
}

impl<P: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<P> {
    fn get_state(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        (**self).get_state()
    }

    fn set_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        (**self).set_state(snapshot)
    }

    fn clear_state(&mut self) -> Result<(), SessionError> {
        (**self).clear_state()
    }

    fn best_score(&self) -> u64 {
        (**self).best_score()
    }

    fn set_best_score(&mut self, score: u64) -> Result<(), SessionError> {
        (**self).set_best_score(score)
    }
}
