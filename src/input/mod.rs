//! Input: abstract commands and the sources that produce them.
//!
//! Front ends translate keys, buttons or swipes into `Command`s. The session
//! either pulls them from an `InputSource` or has them pushed through a
//! `Listeners` registry.

mod listeners;

pub use listeners::{CommandKind, Listeners};

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Direction;

/// A request for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Slide every tile in a direction.
    Move(Direction),
    /// Discard the current game and start a fresh one.
    Restart,
    /// Continue after reaching the winning tile.
    KeepPlaying,
    /// Stop reading input. Front-end only; the session ignores it.
    Quit,
}

impl Command {
    /// The event kind this command is dispatched under.
    #[must_use]
    pub fn kind(self) -> Option<CommandKind> {
        match self {
            Command::Move(_) => Some(CommandKind::Move),
            Command::Restart => Some(CommandKind::Restart),
            Command::KeepPlaying => Some(CommandKind::KeepPlaying),
            Command::Quit => None,
        }
    }
}

/// Something that yields commands until exhausted.
pub trait InputSource {
    /// Next command, or `None` when there is no more input.
    fn next_command(&mut self) -> Option<Command>;
}

/// FIFO of pre-recorded commands.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Number of commands not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if every command has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Parse a compact move script such as `"ULDR r c"`.
    ///
    /// `U R D L` are moves, `r` restarts, `c` keeps playing, `q` quits.
    /// Whitespace is ignored. Returns the first unrecognised character on
    /// failure.
    pub fn from_script(script: &str) -> Result<Self, char> {
        let mut queue = Self::new();
        for ch in script.chars().filter(|c| !c.is_whitespace()) {
            let command = match ch {
                'U' => Command::Move(Direction::Up),
                'R' => Command::Move(Direction::Right),
                'D' => Command::Move(Direction::Down),
                'L' => Command::Move(Direction::Left),
                'r' => Command::Restart,
                'c' => Command::KeepPlaying,
                'q' => Command::Quit,
                other => return Err(other),
            };
            queue.push(command);
        }
        Ok(queue)
    }
}

impl FromIterator<Command> for CommandQueue {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}

impl InputSource for CommandQueue {
    fn next_command(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }
}

/// Map a key name to a command.
///
/// Arrow keys, vim keys (`k l j h`) and `w d s a` move; `r` restarts.
/// The terminal front end also binds `c` to keep playing and `q` to quit.
#[must_use]
pub fn command_for_key(key: &str) -> Option<Command> {
    if let Some(direction) = direction_for_key(key) {
        return Some(Command::Move(direction));
    }
    match key {
        "r" => Some(Command::Restart),
        "c" => Some(Command::KeepPlaying),
        "q" => Some(Command::Quit),
        _ => None,
    }
}

/// Map a key name to a move direction.
#[must_use]
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "k" | "w" => Some(Direction::Up),
        "ArrowRight" | "l" | "d" => Some(Direction::Right),
        "ArrowDown" | "j" | "s" => Some(Direction::Down),
        "ArrowLeft" | "h" | "a" => Some(Direction::Left),
        _ => None,
    }
}

/// Shortest swipe, in screen units, that counts as a move.
pub const SWIPE_THRESHOLD: f64 = 10.0;

/// Map a touch swipe from start to end to a move direction.
///
/// `dx` grows to the right and `dy` grows downward. Swipes no longer than
/// `SWIPE_THRESHOLD` on both axes are ignored. The longer axis decides; a
/// tie goes to the vertical axis.
#[must_use]
pub fn direction_for_swipe(dx: f64, dy: f64) -> Option<Direction> {
    let (abs_dx, abs_dy) = (dx.abs(), dy.abs());
    if abs_dx.max(abs_dy) <= SWIPE_THRESHOLD {
        return None;
    }

    let direction = if abs_dx > abs_dy {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}
