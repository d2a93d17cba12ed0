//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use rust_2048::{
    GameSession, GridSnapshot, GridState, Metadata, MemoryStorage, PersistenceAdapter, Position,
    RandomSource, RenderAdapter, SessionConfig, SessionSnapshot, StorageManager,
};

/// Random source answering from scripted queues.
///
/// When a queue runs dry it falls back to cell index 0 and value 2.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    cells: VecDeque<usize>,
    values: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cells(mut self, cells: &[usize]) -> Self {
        self.cells.extend(cells);
        self
    }

    pub fn with_values(mut self, values: &[u32]) -> Self {
        self.values.extend(values);
        self
    }
}

impl RandomSource for ScriptedRng {
    fn cell_index(&mut self, len: usize) -> usize {
        self.cells.pop_front().unwrap_or(0).min(len - 1)
    }

    fn tile_value(&mut self) -> u32 {
        self.values.pop_front().unwrap_or(2)
    }
}

/// Renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub actuations: Vec<Metadata>,
    pub grids: Vec<GridSnapshot>,
    pub continue_calls: usize,
}

impl RenderAdapter for RecordingRenderer {
    fn actuate(&mut self, grid: &GridState, metadata: &Metadata) {
        self.actuations.push(*metadata);
        self.grids.push(grid.serialize());
    }

    fn continue_game(&mut self) {
        self.continue_calls += 1;
    }
}

pub type TestSession = GameSession<ScriptedRng, StorageManager<MemoryStorage>, RecordingRenderer>;

/// Build a grid from rows listed top to bottom; 0 marks an empty cell.
pub fn grid_from_rows(rows: &[&[u32]]) -> GridState {
    let mut grid = GridState::empty(rows.len());
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), rows.len(), "grid must be square");
        for (x, &value) in row.iter().enumerate() {
            if value != 0 {
                grid.add_tile(Position::new(x as i32, y as i32), value);
            }
        }
    }
    grid
}

/// Read a grid back as rows, top to bottom.
pub fn rows(grid: &GridState) -> Vec<Vec<u32>> {
    let size = grid.size() as i32;
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| grid.cell_at(Position::new(x, y)).map_or(0, |tile| tile.value))
                .collect()
        })
        .collect()
}

/// Snapshot of a game in progress on the given rows.
pub fn snapshot_from_rows(rows: &[&[u32]], score: u64) -> SessionSnapshot {
    SessionSnapshot {
        grid: grid_from_rows(rows).serialize(),
        score,
        over: false,
        won: false,
        keep_playing: false,
    }
}

/// Resume a session from `snapshot` with a scripted RNG.
pub fn session_from_snapshot(snapshot: &SessionSnapshot, rng: ScriptedRng) -> TestSession {
    let mut persistence = StorageManager::in_memory();
    persistence.set_state(snapshot).unwrap();

    let config = SessionConfig::default().with_size(snapshot.grid.size);
    GameSession::new(config, rng, persistence, RecordingRenderer::default())
}

/// Resume a session on the given rows with score 0.
pub fn session_from_rows(rows: &[&[u32]], rng: ScriptedRng) -> TestSession {
    session_from_snapshot(&snapshot_from_rows(rows, 0), rng)
}
