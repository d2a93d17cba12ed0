//! Callback registry for push-style input.

use rustc_hash::FxHashMap;

use super::Command;

/// The three event kinds an input source emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move,
    Restart,
    KeepPlaying,
}

type Callback<'a> = Box<dyn FnMut(Command) + 'a>;

/// Per-kind callback lists.
///
/// Callbacks for one kind fire synchronously, in registration order, before
/// `emit` returns.
#[derive(Default)]
pub struct Listeners<'a> {
    callbacks: FxHashMap<CommandKind, Vec<Callback<'a>>>,
}

impl<'a> Listeners<'a> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind`.
    pub fn on(&mut self, kind: CommandKind, callback: impl FnMut(Command) + 'a) {
        self.callbacks.entry(kind).or_default().push(Box::new(callback));
    }

    /// Deliver `command` to every callback registered for its kind.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&mut self, command: Command) -> usize {
        let Some(kind) = command.kind() else {
            return 0;
        };
        let Some(callbacks) = self.callbacks.get_mut(&kind) else {
            return 0;
        };

        for callback in callbacks.iter_mut() {
            callback(command);
        }
        callbacks.len()
    }

    /// Number of callbacks registered for `kind`.
    #[must_use]
    pub fn count(&self, kind: CommandKind) -> usize {
        self.callbacks.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("move", &self.count(CommandKind::Move))
            .field("restart", &self.count(CommandKind::Restart))
            .field("keep_playing", &self.count(CommandKind::KeepPlaying))
            .finish()
    }
}
