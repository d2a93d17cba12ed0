//! Move resolution: slide and merge every tile in one direction.
//!
//! ## Algorithm
//!
//! 1. Clear merge markers and record each tile's position.
//! 2. Visit cells nearest the destination edge first (`Traversals`).
//! 3. For each tile, find the farthest free cell along the vector. If the
//!    cell beyond it holds an equal tile that has not merged this turn, the
//!    two combine there; otherwise the tile slides to the farthest cell.
//!
//! A merged tile carries `merged_from`, which blocks it from absorbing a
//! second merge in the same turn: `[2, 2, 4, _]` left gives `[4, 4, _, _]`,
//! not `[8, _, _, _]`.

use crate::core::{Direction, MergedFrom, Position, Tile, TileSnapshot};
use crate::grid::{GridState, Traversals};

/// What sliding the tiles did, before any spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slide {
    /// Some tile ended the slide on a different cell.
    pub moved: bool,
    /// Sum of the values of every tile created by a merge.
    pub score_delta: u64,
    /// Number of merges.
    pub merges: u32,
    /// A merge produced the winning value.
    pub reached_win: bool,
}

/// Observable result of one `GameSession::make_move` call.
///
/// A move on a terminated session, or one that moves nothing, yields the
/// default (all-zero) outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub score_delta: u64,
    pub merges: u32,
    /// Tile spawned after the slide.
    pub spawned: Option<TileSnapshot>,
    /// This move produced the first winning tile of the session.
    pub won: bool,
    /// This move ended the game.
    pub over: bool,
}

/// Slide every tile on `grid` towards `direction`.
///
/// Merges producing exactly `win_value` set `reached_win`. Sessions always
/// pass 2048 unless a test lowered it through `SessionConfig`. Spawning and
/// terminal detection are left to the caller.
pub fn slide_tiles(grid: &mut GridState, direction: Direction, win_value: u32) -> Slide {
    let vector = direction.vector();
    let traversals = Traversals::new(grid.size(), vector);
    let mut slide = Slide::default();

    grid.prepare_tiles();

    for cell in traversals.positions() {
        let Some(tile) = grid.cell_at(cell) else {
            continue;
        };
        let (id, value) = (tile.id, tile.value);
        let positions = grid.find_farthest_position(cell, vector);

        let target = value.checked_mul(2).and_then(|doubled| {
            grid.cell_at(positions.next)
                .filter(|next| next.value == value && !next.has_merged())
                .map(|next| (next.id, doubled))
        });

        let landed: Position = match target {
            Some((target_id, doubled)) => {
                if let (Some(mut moving), Some(absorbed)) = (grid.remove_tile(id), grid.remove_tile(target_id)) {
                    // Converge onto the merge cell so renderers can animate the slide in.
                    moving.update_position(positions.next);

                    let mut merged = Tile::new(grid.alloc_id(), positions.next, doubled);
                    merged.merged_from = Some(Box::new(MergedFrom {
                        moving,
                        target: absorbed,
                    }));
                    grid.insert_tile(merged);

                    slide.score_delta += u64::from(doubled);
                    slide.merges += 1;
                    if doubled == win_value {
                        slide.reached_win = true;
                    }
                }
                positions.next
            }
            None => {
                grid.move_tile(id, positions.farthest);
                positions.farthest
            }
        };

        if landed != cell {
            slide.moved = true;
        }
    }

    slide
}
