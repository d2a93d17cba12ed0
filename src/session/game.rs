//! Game session: one game's lifecycle over a single grid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::moves::{slide_tiles, MoveOutcome};
use crate::core::{
    Direction, GameRng, RandomSource, SessionConfig, SessionError, TileSnapshot, START_TILES,
};
use crate::grid::GridState;
use crate::input::{Command, InputSource};
use crate::persistence::{MemoryStorage, PersistenceAdapter, SessionSnapshot, StorageManager};
use crate::render::{Metadata, NullRenderer, RenderAdapter};

/// Where a session sits in its state machine.
///
/// ```text
/// Playing --(merge reaches win value)--> WonNotKept --(keep playing)--> WonKeptPlaying
///    \______________________ no moves left after a spawn ______________________/--> Over
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    WonNotKept,
    WonKeptPlaying,
    Over,
}

impl SessionStatus {
    /// True if moves are no longer accepted.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::WonNotKept | SessionStatus::Over)
    }
}

/// One game: grid, score and win/over flags, plus its collaborators.
///
/// The session exclusively owns its grid. Every public operation is a
/// complete transaction; the renderer and persistence adapter are only told
/// about the result afterwards, and their failures never roll anything back.
pub struct GameSession<R = GameRng, P = StorageManager<MemoryStorage>, A = NullRenderer>
where
    R: RandomSource,
    P: PersistenceAdapter,
    A: RenderAdapter,
{
    config: SessionConfig,
    grid: GridState,
    score: u64,
    over: bool,
    won: bool,
    keep_playing: bool,
    rng: R,
    persistence: P,
    renderer: A,
}

impl GameSession {
    /// Session with in-memory persistence and no renderer.
    #[must_use]
    pub fn in_memory(config: SessionConfig) -> Self {
        let rng = config.rng();
        Self::new(config, rng, StorageManager::in_memory(), NullRenderer)
    }
}

impl<R, P, A> GameSession<R, P, A>
where
    R: RandomSource,
    P: PersistenceAdapter,
    A: RenderAdapter,
{
    /// Create a session, resuming stored state when it is usable.
    ///
    /// A stored snapshot that is corrupt, or sized for a different grid, is
    /// discarded and a fresh game is started instead.
    #[instrument(skip_all, fields(size = config.size))]
    pub fn new(config: SessionConfig, rng: R, persistence: P, renderer: A) -> Self {
        let mut session = Self {
            grid: GridState::empty(config.size),
            config,
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            rng,
            persistence,
            renderer,
        };
        session.setup();
        session
    }

    fn setup(&mut self) {
        match self.persistence.get_state() {
            Ok(Some(snapshot)) => match self.restore(&snapshot) {
                Ok(()) => info!(score = self.score, "resumed stored game"),
                Err(err) => {
                    warn!(error = %err, "discarding stored game");
                    if let Err(err) = self.persistence.clear_state() {
                        warn!(error = %err, "failed to clear stored game");
                    }
                    self.start_fresh();
                }
            },
            Ok(None) => self.start_fresh(),
            Err(err) => {
                warn!(error = %err, "failed to load stored game");
                if err.is_corrupt() {
                    if let Err(err) = self.persistence.clear_state() {
                        warn!(error = %err, "failed to clear stored game");
                    }
                }
                self.start_fresh();
            }
        }

        self.actuate();
    }

    /// Replace the grid, score and flags with a snapshot's.
    ///
    /// Leaves the session untouched on error. Does not notify collaborators.
    ///
    /// # Errors
    ///
    /// `StateCorrupt` if the snapshot's grid is malformed or its size differs
    /// from the configured size.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        if snapshot.grid.size != self.config.size {
            return Err(SessionError::corrupt(format!(
                "stored grid size {} does not match configured size {}",
                snapshot.grid.size, self.config.size
            )));
        }

        self.grid = GridState::from_serialized(&snapshot.grid)?;
        self.score = snapshot.score;
        self.over = snapshot.over;
        self.won = snapshot.won;
        self.keep_playing = snapshot.keep_playing;
        Ok(())
    }

    fn start_fresh(&mut self) {
        self.grid = GridState::empty(self.config.size);
        self.score = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = false;

        for _ in 0..START_TILES {
            self.add_random_tile();
        }
        info!(size = self.config.size, "started new game");
    }

    fn add_random_tile(&mut self) -> Option<TileSnapshot> {
        if !self.grid.cells_available() {
            return None;
        }

        let value = self.rng.tile_value();
        let position = self.grid.random_available_cell(&mut self.rng)?;
        self.grid.add_tile(position, value);
        Some(TileSnapshot { position, value })
    }

    // === Commands ===

    /// Slide every tile towards `direction`.
    ///
    /// No-op if the session is terminated or nothing can move. Otherwise
    /// merges, spawns one tile, re-evaluates game over and actuates.
    #[instrument(skip(self), fields(direction = %direction))]
    pub fn make_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.is_terminated() {
            debug!("session terminated, ignoring move");
            return MoveOutcome::default();
        }

        // O(1) thanks to the persistent grid; restored when nothing moves so
        // an ineffective move leaves no trace at all.
        let before = self.grid.clone();
        let slide = slide_tiles(&mut self.grid, direction, self.config.win_value);
        if !slide.moved {
            self.grid = before;
            debug!("nothing moved");
            return MoveOutcome::default();
        }

        self.score += slide.score_delta;

        let first_win = slide.reached_win && !self.won;
        if slide.reached_win {
            self.won = true;
        }
        if first_win {
            info!(score = self.score, "reached the winning tile");
        }

        let spawned = self.add_random_tile();

        if !self.grid.moves_available() {
            self.over = true;
            info!(score = self.score, "game over");
        }

        debug!(
            score = self.score,
            gained = slide.score_delta,
            merges = slide.merges,
            "move resolved"
        );
        self.actuate();

        MoveOutcome {
            moved: true,
            score_delta: slide.score_delta,
            merges: slide.merges,
            spawned,
            won: first_win,
            over: self.over,
        }
    }

    /// Discard the current game and start a fresh one.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        if let Err(err) = self.persistence.clear_state() {
            warn!(error = %err, "failed to clear stored game");
        }
        self.renderer.continue_game();
        self.start_fresh();
        self.actuate();
    }

    /// Keep accepting moves after the winning tile. Irreversible.
    #[instrument(skip(self))]
    pub fn keep_playing(&mut self) {
        self.keep_playing = true;
        self.renderer.continue_game();
        self.actuate();
    }

    /// Dispatch one command.
    ///
    /// Non-move commands return the default outcome; `Quit` is ignored.
    pub fn handle(&mut self, command: Command) -> MoveOutcome {
        match command {
            Command::Move(direction) => self.make_move(direction),
            Command::Restart => {
                self.restart();
                MoveOutcome::default()
            }
            Command::KeepPlaying => {
                self.keep_playing();
                MoveOutcome::default()
            }
            Command::Quit => MoveOutcome::default(),
        }
    }

    /// Drain `source` until it runs dry or yields `Quit`.
    ///
    /// Returns the number of commands handled.
    pub fn run<I: InputSource + ?Sized>(&mut self, source: &mut I) -> usize {
        let mut handled = 0;
        while let Some(command) = source.next_command() {
            if command == Command::Quit {
                break;
            }
            self.handle(command);
            handled += 1;
        }
        handled
    }

    fn actuate(&mut self) {
        if self.persistence.best_score() < self.score {
            if let Err(err) = self.persistence.set_best_score(self.score) {
                warn!(error = %err, "failed to store best score");
            }
        }

        // Only a lost game is forgotten; a won game can still be continued.
        let stored = if self.over {
            self.persistence.clear_state()
        } else {
            self.persistence.set_state(&self.serialize())
        };
        if let Err(err) = stored {
            warn!(error = %err, "failed to store game");
        }

        let metadata = self.metadata();
        self.renderer.actuate(&self.grid, &metadata);
    }

    // === Queries ===

    /// Current grid.
    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// No moves remain.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// The winning tile has been reached this session.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// The player chose to continue past the winning tile.
    #[must_use]
    pub fn is_keep_playing(&self) -> bool {
        self.keep_playing
    }

    /// Moves are no longer accepted.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    /// Position in the session state machine.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match (self.over, self.won, self.keep_playing) {
            (true, _, _) => SessionStatus::Over,
            (false, true, false) => SessionStatus::WonNotKept,
            (false, true, true) => SessionStatus::WonKeptPlaying,
            (false, false, _) => SessionStatus::Playing,
        }
    }

    /// Largest tile value on the grid.
    #[must_use]
    pub fn highest_tile(&self) -> u32 {
        self.grid.highest_value()
    }

    /// Summary handed to renderers.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata {
            score: self.score,
            best_score: self.persistence.best_score().max(self.score),
            over: self.over,
            won: self.won,
            terminated: self.is_terminated(),
        }
    }

    /// Persistent form of the session.
    #[must_use]
    pub fn serialize(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: self.grid.serialize(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    // === Collaborators ===

    /// Borrow the renderer.
    pub fn renderer(&self) -> &A {
        &self.renderer
    }

    /// Mutably borrow the renderer.
    pub fn renderer_mut(&mut self) -> &mut A {
        &mut self.renderer
    }

    /// Borrow the persistence adapter.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Mutably borrow the random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R, P, A> std::fmt::Debug for GameSession<R, P, A>
where
    R: RandomSource,
    P: PersistenceAdapter,
    A: RenderAdapter,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("size", &self.config.size)
            .field("score", &self.score)
            .field("status", &self.status())
            .field("tiles", &self.grid.tile_count())
            .finish()
    }
}
