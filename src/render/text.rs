//! Plain-text renderer for terminals and logs.

use std::io::Write;

use tracing::warn;

use super::{Metadata, RenderAdapter};
use crate::core::Position;
use crate::grid::GridState;

/// Draws the grid as a boxed table after every actuation.
///
/// ```text
/// Score: 8 (+4)   Best: 8
/// +------+------+------+------+
/// |    4 |    4 |      |      |
/// ...
/// ```
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    last_score: u64,
    message: Option<&'static str>,
}

impl<W: Write> TextRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_score: 0,
            message: None,
        }
    }

    /// Message currently shown, if the game is terminated.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, grid: &GridState, metadata: &Metadata) -> std::io::Result<()> {
        let width = grid.highest_value().max(1000).to_string().len() + 2;
        let size = grid.size() as i32;
        let border = format!("+{}", format!("{}+", "-".repeat(width)).repeat(grid.size()));

        let gained = metadata.score.saturating_sub(self.last_score);
        if gained > 0 {
            writeln!(self.out, "Score: {} (+{})   Best: {}", metadata.score, gained, metadata.best_score)?;
        } else {
            writeln!(self.out, "Score: {}   Best: {}", metadata.score, metadata.best_score)?;
        }

        writeln!(self.out, "{border}")?;
        for y in 0..size {
            write!(self.out, "|")?;
            for x in 0..size {
                match grid.cell_at(Position::new(x, y)) {
                    Some(tile) => write!(self.out, "{:>w$} |", tile.value, w = width - 1)?,
                    None => write!(self.out, "{:w$}|", "", w = width)?,
                }
            }
            writeln!(self.out)?;
            writeln!(self.out, "{border}")?;
        }

        if let Some(message) = self.message {
            writeln!(self.out, "{message}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> RenderAdapter for TextRenderer<W> {
    fn actuate(&mut self, grid: &GridState, metadata: &Metadata) {
        if metadata.terminated {
            if metadata.over {
                self.message = Some("Game over!");
            } else if metadata.won {
                self.message = Some("You win!");
            }
        }

        if let Err(err) = self.draw(grid, metadata) {
            warn!(error = %err, "failed to draw grid");
        }
        self.last_score = metadata.score;
    }

    fn continue_game(&mut self) {
        self.message = None;
    }
}
