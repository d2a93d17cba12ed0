//! Game sessions and move resolution.
//!
//! `slide_tiles` is the pure grid algorithm; `GameSession` wraps it with
//! scoring, spawning, win/over detection and collaborator notification.

mod game;
mod moves;

pub use game::{GameSession, SessionStatus};
pub use moves::{slide_tiles, MoveOutcome, Slide};
