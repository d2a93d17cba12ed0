//! Traversal ordering and farthest-position search for a move.

use smallvec::SmallVec;

use super::state::GridState;
use crate::core::{Position, Vector};

/// Cell visitation order for one move.
///
/// Cells nearest the destination edge come first, so a tile processed later
/// never lands on a tile that has already been placed this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traversals {
    pub xs: SmallVec<[i32; 8]>,
    pub ys: SmallVec<[i32; 8]>,
}

impl Traversals {
    /// Build the traversal for `vector` on a grid of side `size`.
    #[must_use]
    pub fn new(size: usize, vector: Vector) -> Self {
        let mut xs: SmallVec<[i32; 8]> = (0..size as i32).collect();
        let mut ys: SmallVec<[i32; 8]> = (0..size as i32).collect();

        if vector.dx == 1 {
            xs.reverse();
        }
        if vector.dy == 1 {
            ys.reverse();
        }

        Self { xs, ys }
    }

    /// Positions in visitation order: `x` outer, `y` inner.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.xs
            .iter()
            .flat_map(move |&x| self.ys.iter().map(move |&y| Position::new(x, y)))
    }
}

/// Result of sliding from a cell until blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarthestPosition {
    /// Last empty, in-bounds cell reached (the start cell if blocked at once).
    pub farthest: Position,
    /// One step beyond `farthest`; may be off the grid.
    pub next: Position,
}

impl GridState {
    /// Walk from `start` along `vector` while the next cell is free.
    #[must_use]
    pub fn find_farthest_position(&self, start: Position, vector: Vector) -> FarthestPosition {
        let mut farthest = start;
        let mut next = start.step(vector);

        while self.cell_available(next) {
            farthest = next;
            next = next.step(vector);
        }

        FarthestPosition { farthest, next }
    }
}
