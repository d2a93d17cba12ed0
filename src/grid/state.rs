//! Grid state: the tile arena and the cell matrix.
//!
//! ## Layout
//!
//! Tiles live in an arena keyed by `TileId`. The matrix stores only
//! `Option<TileId>`, so removing a tile mid-traversal can never leave a
//! dangling or aliased reference in another cell.
//!
//! The matrix is indexed `[x][y]` (column first) and flattened into a single
//! vector of `size * size` slots, which keeps every column the same length
//! by construction. Both collections are `im` persistent structures, so
//! cloning a grid to hand a snapshot to a renderer is O(1).
//!
//! ## Invariants
//!
//! - A tile present in the matrix sits at the slot matching its own `(x, y)`.
//! - Every arena entry is referenced by exactly one slot, and vice versa.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{instrument, trace};

use crate::core::{
    is_tile_value, Direction, Position, RandomSource, SessionError, Tile, TileId, TileSnapshot,
};

/// Positions of empty cells. Inline capacity covers a standard 4x4 grid.
pub type CellList = SmallVec<[Position; 16]>;

/// Serialized grid: `{ "size": n, "cells": [[null | tile; n]; n] }`.
///
/// `cells[x][y]` holds the tile whose position is `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

/// An N x N board of optional tiles.
#[derive(Clone, Debug)]
pub struct GridState {
    size: usize,
    cells: Vector<Option<TileId>>,
    tiles: ImHashMap<TileId, Tile>,
    next_tile_id: u32,
}

impl GridState {
    /// A grid with every cell unset.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        assert!(size > 0, "Grid size must be at least 1");
        Self {
            size,
            cells: std::iter::repeat(None).take(size * size).collect(),
            tiles: ImHashMap::new(),
            next_tile_id: 0,
        }
    }

    /// Rebuild a grid from a prior snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StateCorrupt` if the matrix is not
    /// `size x size`, a stored tile's position disagrees with its slot, or
    /// a stored value is not a power of two of at least 2.
    #[instrument(skip(snapshot), fields(size = snapshot.size))]
    pub fn from_serialized(snapshot: &GridSnapshot) -> Result<Self, SessionError> {
        let size = snapshot.size;
        if size == 0 {
            return Err(SessionError::corrupt("grid size is zero"));
        }
        if snapshot.cells.len() != size {
            return Err(SessionError::corrupt(format!(
                "grid has {} columns, expected {}",
                snapshot.cells.len(),
                size
            )));
        }

        let mut grid = Self::empty(size);
        for (x, column) in snapshot.cells.iter().enumerate() {
            if column.len() != size {
                return Err(SessionError::corrupt(format!(
                    "column {} has {} cells, expected {}",
                    x,
                    column.len(),
                    size
                )));
            }

            for (y, stored) in column.iter().enumerate() {
                let Some(stored) = stored else { continue };
                let slot = Position::new(x as i32, y as i32);

                if stored.position != slot {
                    return Err(SessionError::corrupt(format!(
                        "tile at slot {} records position {}",
                        slot, stored.position
                    )));
                }
                if !is_tile_value(stored.value) {
                    return Err(SessionError::corrupt(format!(
                        "tile at {} has invalid value {}",
                        slot, stored.value
                    )));
                }

                grid.add_tile(slot, stored.value);
            }
        }

        trace!(tiles = grid.tile_count(), "grid restored");
        Ok(grid)
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tiles on the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    // === Queries ===

    /// Check whether `pos` lies on the grid.
    #[must_use]
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        let size = self.size as i32;
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        self.is_within_bounds(pos)
            .then(|| pos.x as usize * self.size + pos.y as usize)
    }

    /// The tile at `pos`, or `None` if the cell is empty or off the grid.
    #[must_use]
    pub fn cell_at(&self, pos: Position) -> Option<&Tile> {
        let id = self.id_at(pos)?;
        self.tiles.get(&id)
    }

    /// The id of the tile at `pos`, if any.
    #[must_use]
    pub fn id_at(&self, pos: Position) -> Option<TileId> {
        let slot = self.slot(pos)?;
        self.cells[slot]
    }

    /// Look up a tile by id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// True if `pos` is on the grid and holds no tile.
    #[must_use]
    pub fn cell_available(&self, pos: Position) -> bool {
        self.slot(pos).is_some_and(|slot| self.cells[slot].is_none())
    }

    /// True if `pos` holds a tile.
    #[must_use]
    pub fn cell_occupied(&self, pos: Position) -> bool {
        self.id_at(pos).is_some()
    }

    /// All cells as `(position, tile)` pairs, `x` outer and `y` inner.
    ///
    /// Each call starts a fresh pass; the iterator borrows the grid and
    /// never mutates it.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&Tile>)> + '_ {
        self.positions().map(move |pos| (pos, self.cell_at(pos)))
    }

    /// Occupied cells only, in the same order as `cells()`.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells().filter_map(|(_, tile)| tile)
    }

    fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size as i32;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }

    /// Every unset cell, `x` outer and `y` inner.
    #[must_use]
    pub fn available_cells(&self) -> CellList {
        self.cells()
            .filter(|(_, tile)| tile.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// True if at least one cell is empty.
    #[must_use]
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// A uniformly chosen empty cell, or `None` if the grid is full.
    pub fn random_available_cell<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            return None;
        }
        Some(cells[rng.cell_index(cells.len())])
    }

    /// True if some tile has an orthogonal neighbour of equal value.
    ///
    /// Adjacency is symmetric, so each cell only tests its four neighbours.
    #[must_use]
    pub fn tile_matches_available(&self) -> bool {
        self.tiles().any(|tile| {
            Direction::ALL.iter().any(|direction| {
                self.cell_at(tile.position().step(direction.vector()))
                    .is_some_and(|other| other.value == tile.value)
            })
        })
    }

    /// True if any move could still change the grid.
    #[must_use]
    pub fn moves_available(&self) -> bool {
        self.cells_available() || self.tile_matches_available()
    }

    /// Largest tile value on the grid, or 0 if empty.
    #[must_use]
    pub fn highest_value(&self) -> u32 {
        self.tiles.values().map(|tile| tile.value).max().unwrap_or(0)
    }

    // === Mutation ===

    /// Allocate a fresh tile id.
    pub fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    /// Create a tile with a fresh id at `pos` and insert it.
    pub fn add_tile(&mut self, pos: Position, value: u32) -> TileId {
        let id = self.alloc_id();
        self.insert_tile(Tile::new(id, pos, value));
        id
    }

    /// Place `tile` at its own recorded position.
    ///
    /// # Panics
    ///
    /// Panics if the tile's position is off the grid or already occupied.
    pub fn insert_tile(&mut self, tile: Tile) {
        let pos = tile.position();
        let slot = self.slot(pos).unwrap_or_else(|| panic!("tile position {pos} is off the grid"));
        assert!(self.cells[slot].is_none(), "cell {pos} is already occupied");

        self.cells.set(slot, Some(tile.id));
        self.tiles.insert(tile.id, tile);
    }

    /// Clear a tile's cell and drop it from the arena.
    ///
    /// Returns the removed tile, or `None` if `id` is not on the grid.
    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        if let Some(slot) = self.slot(tile.position()) {
            self.cells.set(slot, None);
        }
        Some(tile)
    }

    /// Move a tile to `to`, keeping its fields and its slot in sync.
    ///
    /// # Panics
    ///
    /// Panics if `to` is off the grid or held by a different tile.
    pub fn move_tile(&mut self, id: TileId, to: Position) {
        let Some(from) = self.tiles.get(&id).map(Tile::position) else {
            return;
        };
        if from == to {
            return;
        }

        let target = self.slot(to).unwrap_or_else(|| panic!("destination {to} is off the grid"));
        assert!(self.cells[target].is_none(), "destination {to} is already occupied");

        if let Some(source) = self.slot(from) {
            self.cells.set(source, None);
        }
        self.cells.set(target, Some(id));
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.update_position(to);
        }
    }

    /// Clear merge markers and record current positions on every tile.
    pub fn prepare_tiles(&mut self) {
        let ids: SmallVec<[TileId; 16]> = self.cells.iter().flatten().copied().collect();
        for id in ids {
            if let Some(tile) = self.tiles.get_mut(&id) {
                tile.merged_from = None;
                tile.save_position();
            }
        }
    }

    /// Persistent form of the grid (animation metadata excluded).
    #[must_use]
    pub fn serialize(&self) -> GridSnapshot {
        let size = self.size as i32;
        let cells = (0..size)
            .map(|x| {
                (0..size)
                    .map(|y| self.cell_at(Position::new(x, y)).map(Tile::serialize))
                    .collect()
            })
            .collect();

        GridSnapshot {
            size: self.size,
            cells,
        }
    }
}
