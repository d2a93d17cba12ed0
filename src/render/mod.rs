//! Render adapters.
//!
//! The session hands every completed transaction to a `RenderAdapter` as a
//! read-only grid plus `Metadata`. Renderers never mutate the grid; they get
//! a shared reference and the grid's `im` storage makes holding on to a
//! clone cheap if they need one.

mod text;

pub use text::TextRenderer;

use serde::{Deserialize, Serialize};

use crate::grid::GridState;

/// Per-actuation summary passed alongside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub score: u64,
    pub best_score: u64,
    pub over: bool,
    pub won: bool,
    /// `over || (won && !keep_playing)`: no further moves are accepted.
    pub terminated: bool,
}

/// Consumer of session snapshots.
pub trait RenderAdapter {
    /// Called after every completed move, restart and keep-playing action.
    fn actuate(&mut self, grid: &GridState, metadata: &Metadata);

    /// Called on restart and keep-playing; any won/over overlay should clear.
    fn continue_game(&mut self);
}

/// Renderer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl RenderAdapter for NullRenderer {
    fn actuate(&mut self, _grid: &GridState, _metadata: &Metadata) {}

    fn continue_game(&mut self) {}
}

impl<A: RenderAdapter + ?Sized> RenderAdapter for Box<A> {
    fn actuate(&mut self, grid: &GridState, metadata: &Metadata) {
        (**self).actuate(grid, metadata);
    }

    fn continue_game(&mut self) {
        (**self).continue_game();
    }
}
