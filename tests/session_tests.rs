//! Session lifecycle integration tests: setup, restart, keep playing,
//! persistence and render notifications.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{
    session_from_rows, session_from_snapshot, snapshot_from_rows, RecordingRenderer, ScriptedRng,
};
use rust_2048::input::CommandKind;
use rust_2048::persistence::{BEST_SCORE_KEY, GAME_STATE_KEY};
use rust_2048::{
    Command, CommandQueue, Direction, GameSession, GridState, Listeners, MemoryStorage,
    PersistenceAdapter, Position, SessionConfig, SessionError, SessionSnapshot, SessionStatus,
    Storage, StorageManager, TileSnapshot,
};

// =============================================================================
// Setup
// =============================================================================

/// Test that a fresh session spawns two tiles and actuates once.
#[test]
fn test_fresh_session() {
    let session = GameSession::new(
        SessionConfig::default(),
        ScriptedRng::new().with_values(&[2, 4]).with_cells(&[0, 5]),
        StorageManager::in_memory(),
        RecordingRenderer::default(),
    );

    assert_eq!(session.grid().tile_count(), 2);
    assert_eq!(session.grid().cell_at(Position::new(0, 0)).unwrap().value, 2);
    // Second draw: index 5 among the 15 remaining cells is (1, 2).
    assert_eq!(session.grid().cell_at(Position::new(1, 2)).unwrap().value, 4);

    assert_eq!(session.renderer().actuations.len(), 1);
    assert_eq!(session.renderer().continue_calls, 0);
    assert_eq!(session.status(), SessionStatus::Playing);
}

/// Test that a stored game is resumed as-is.
#[test]
fn test_resume_stored_game() {
    let mut snapshot = snapshot_from_rows(
        &[&[2, 0, 0, 0], &[0, 64, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 8]],
        300,
    );
    snapshot.won = true;
    snapshot.keep_playing = true;

    let session = session_from_snapshot(&snapshot, ScriptedRng::new());

    assert_eq!(session.serialize(), snapshot);
    assert_eq!(session.score(), 300);
    assert_eq!(session.status(), SessionStatus::WonKeptPlaying);
}

/// Test that a snapshot with a misplaced tile is discarded for a fresh game.
#[test]
fn test_corrupt_snapshot_starts_fresh() {
    let mut snapshot = snapshot_from_rows(
        &[&[2, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        500,
    );
    snapshot.grid.cells[0][0] = Some(TileSnapshot {
        position: Position::new(3, 3),
        value: 2,
    });

    let session = session_from_snapshot(&snapshot, ScriptedRng::new());

    assert_eq!(session.score(), 0);
    assert_eq!(session.grid().tile_count(), 2);
    // The stored state now reflects the fresh game.
    assert_eq!(session.persistence().get_state().unwrap(), Some(session.serialize()));
}

/// Test that unparsable stored state is discarded for a fresh game.
#[test]
fn test_garbage_state_starts_fresh() {
    let mut storage = MemoryStorage::new();
    storage.set(GAME_STATE_KEY, "{ definitely not a game".to_string()).unwrap();

    let session = GameSession::new(
        SessionConfig::default(),
        ScriptedRng::new(),
        StorageManager::new(storage),
        RecordingRenderer::default(),
    );

    assert_eq!(session.score(), 0);
    assert_eq!(session.grid().tile_count(), 2);
}

/// Test that a game stored for another grid size is not resumed.
#[test]
fn test_size_mismatch_starts_fresh() {
    let snapshot = snapshot_from_rows(&[&[2, 0, 0], &[0, 0, 0], &[0, 0, 4]], 12);

    let mut persistence = StorageManager::in_memory();
    persistence.set_state(&snapshot).unwrap();
    let session = GameSession::new(
        SessionConfig::default().with_size(4),
        ScriptedRng::new(),
        persistence,
        RecordingRenderer::default(),
    );

    assert_eq!(session.grid().size(), 4);
    assert_eq!(session.score(), 0);
}

// =============================================================================
// Restart and Keep Playing
// =============================================================================

/// Test that restart resets score and flags from a won game.
#[test]
fn test_restart_resets_everything() {
    let mut session = session_from_rows(
        &[&[1024, 1024, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );
    session.make_move(Direction::Left);
    assert!(session.is_won());

    session.restart();

    assert_eq!(session.score(), 0);
    assert!(!session.is_won());
    assert!(!session.is_over());
    assert!(!session.is_keep_playing());
    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.grid().tile_count(), 2);
    assert_eq!(session.renderer().continue_calls, 1);
}

/// Test that keep playing clears the overlay and is persisted.
#[test]
fn test_keep_playing_notifies_and_persists() {
    let mut session = session_from_rows(
        &[&[1024, 1024, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );
    session.make_move(Direction::Left);
    let actuations = session.renderer().actuations.len();

    session.keep_playing();

    assert_eq!(session.renderer().continue_calls, 1);
    assert_eq!(session.renderer().actuations.len(), actuations + 1);
    assert!(!session.renderer().actuations.last().unwrap().terminated);

    let stored = session.persistence().get_state().unwrap().unwrap();
    assert!(stored.keep_playing);
    assert!(stored.won);
}

/// Test that keep playing never reverts, even across calls.
#[test]
fn test_keep_playing_is_idempotent() {
    let mut session = session_from_rows(
        &[&[2, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );

    session.keep_playing();
    session.keep_playing();
    assert!(session.is_keep_playing());
    assert_eq!(session.status(), SessionStatus::Playing);
}

// =============================================================================
// Persistence
// =============================================================================

/// Test that the best score tracks the highest score seen.
#[test]
fn test_best_score_updates() {
    let mut session = session_from_rows(
        &[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );
    assert_eq!(session.persistence().best_score(), 0);

    session.make_move(Direction::Left);
    assert_eq!(session.persistence().best_score(), 4);
    assert_eq!(session.renderer().actuations.last().unwrap().best_score, 4);

    session.restart();
    assert_eq!(session.score(), 0);
    assert_eq!(session.persistence().best_score(), 4);
    assert_eq!(session.renderer().actuations.last().unwrap().best_score, 4);
}

/// Test that a lower score never lowers the stored best.
#[test]
fn test_best_score_is_not_lowered() {
    let mut persistence = StorageManager::in_memory();
    persistence.set_best_score(1000).unwrap();
    persistence
        .set_state(&snapshot_from_rows(
            &[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            0,
        ))
        .unwrap();

    let mut session = GameSession::new(
        SessionConfig::default(),
        ScriptedRng::new(),
        persistence,
        RecordingRenderer::default(),
    );
    session.make_move(Direction::Left);

    assert_eq!(session.persistence().best_score(), 1000);
    assert_eq!(
        session.persistence().storage().get(BEST_SCORE_KEY).unwrap().as_deref(),
        Some("1000")
    );
}

/// Test that every move persists the new state.
#[test]
fn test_moves_are_persisted() {
    let mut session = session_from_rows(
        &[&[0, 0, 0, 2], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );

    session.make_move(Direction::Left);

    let stored = session.persistence().get_state().unwrap().unwrap();
    assert_eq!(stored, session.serialize());
}

/// Test that game over clears the stored state.
#[test]
fn test_game_over_clears_state() {
    let mut session = session_from_rows(
        &[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[8, 16, 32, 0]],
        ScriptedRng::new().with_values(&[4]),
    );

    session.make_move(Direction::Right);

    assert!(session.is_over());
    assert_eq!(session.persistence().get_state().unwrap(), None);
}

/// Persistence adapter whose writes always fail.
#[derive(Default)]
struct BrokenPersistence {
    writes: usize,
}

impl PersistenceAdapter for BrokenPersistence {
    fn get_state(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        Ok(None)
    }

    fn set_state(&mut self, _snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        self.writes += 1;
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }

    fn clear_state(&mut self) -> Result<(), SessionError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }

    fn best_score(&self) -> u64 {
        0
    }

    fn set_best_score(&mut self, _score: u64) -> Result<(), SessionError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}

/// Test that persistence failures never block play.
#[test]
fn test_persistence_failure_does_not_block() {
    let mut session = GameSession::new(
        SessionConfig::default().with_seed(11),
        rust_2048::GameRng::new(11),
        BrokenPersistence::default(),
        RecordingRenderer::default(),
    );

    let mut moved = 0;
    for direction in Direction::ALL.iter().cycle().take(20) {
        if session.make_move(*direction).moved {
            moved += 1;
        }
    }

    assert!(moved > 0);
    assert_eq!(session.renderer().actuations.len(), 1 + moved);
    assert!(session.persistence().writes >= moved);

    session.restart();
    assert_eq!(session.score(), 0);
}

/// Test that sessions survive a trip through a file on disk.
#[test]
fn test_file_backed_resume() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let saved = {
        let storage = rust_2048::FileStorage::open(&path).unwrap();
        let mut session = GameSession::new(
            SessionConfig::default().with_seed(5),
            rust_2048::GameRng::new(5),
            StorageManager::new(storage),
            RecordingRenderer::default(),
        );
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            session.make_move(direction);
        }
        session.serialize()
    };

    let storage = rust_2048::FileStorage::open(&path).unwrap();
    let resumed = GameSession::new(
        SessionConfig::default(),
        ScriptedRng::new(),
        StorageManager::new(storage),
        RecordingRenderer::default(),
    );

    assert_eq!(resumed.serialize(), saved);
}

// =============================================================================
// Round Trip
// =============================================================================

/// Test that serialize then from_serialized reproduces the grid and flags.
#[test]
fn test_serialize_round_trip() {
    let mut session = GameSession::in_memory(SessionConfig::default().with_seed(99));
    for direction in Direction::ALL.iter().cycle().take(12) {
        session.make_move(*direction);
    }

    let snapshot = session.serialize();
    let json = snapshot.to_json().unwrap();
    let decoded = SessionSnapshot::from_json(&json).unwrap();
    let grid = GridState::from_serialized(&decoded.grid).unwrap();

    assert_eq!(decoded, snapshot);
    assert_eq!(grid.serialize(), snapshot.grid);
    for (pos, tile) in grid.cells() {
        assert_eq!(tile.map(|t| t.value), session.grid().cell_at(pos).map(|t| t.value));
    }
}

// =============================================================================
// Input Wiring
// =============================================================================

/// Test driving a session from a command queue.
#[test]
fn test_run_command_queue() {
    let mut session = session_from_rows(
        &[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    );
    let mut queue = CommandQueue::from_script("L r q L").unwrap();

    let handled = session.run(&mut queue);

    assert_eq!(handled, 2);
    assert_eq!(queue.len(), 1, "commands after quit stay queued");
    assert_eq!(session.score(), 0, "restart reset the score");
    assert_eq!(session.persistence().best_score(), 4);
}

/// Test driving a session through registered callbacks.
#[test]
fn test_listeners_drive_session() {
    let session = Rc::new(RefCell::new(session_from_rows(
        &[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        ScriptedRng::new(),
    )));
    let order = RefCell::new(Vec::new());

    let mut listeners = Listeners::new();
    {
        let session = Rc::clone(&session);
        listeners.on(CommandKind::Move, move |command| {
            session.borrow_mut().handle(command);
        });
    }
    listeners.on(CommandKind::Move, |_| order.borrow_mut().push("after move"));
    {
        let session = Rc::clone(&session);
        listeners.on(CommandKind::KeepPlaying, move |command| {
            session.borrow_mut().handle(command);
        });
    }

    listeners.emit(Command::Move(Direction::Left));
    assert_eq!(session.borrow().score(), 4);
    assert_eq!(*order.borrow(), vec!["after move"]);

    listeners.emit(Command::KeepPlaying);
    assert!(session.borrow().is_keep_playing());
}
