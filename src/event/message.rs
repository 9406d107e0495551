//! Navigation commands and the queue that defers them.
//!
//! Handlers run while their widget is checked out of the arena, so a screen
//! change requested from a callback cannot run on the spot. It is wrapped in
//! a [`Command`], pushed onto the [`CommandQueue`], and executed as soon as no
//! handler is in flight (at the latest, at the end of the dispatch pass).

use std::collections::VecDeque;

use crate::app::Ui;
use crate::error::Result;
use crate::screen::{ScreenId, View};

/// Builds a fresh screen. Runs after the new screen became current, so every
/// widget it adds belongs to that screen.
pub type ScreenFactory = Box<dyn FnOnce(&Ui) -> Result<Box<dyn View>>>;

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Where a screen change leads.
pub enum Destination {
    /// A new screen, built by the factory. Only valid going forward.
    Fresh(ScreenFactory),
    /// A screen that already exists. Only valid going backward.
    Existing(ScreenId),
}

impl Destination {
    /// Wrap a typed view factory.
    pub fn fresh<F, V>(factory: F) -> Self
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        Destination::Fresh(Box::new(move |ui: &Ui| -> Result<Box<dyn View>> {
            Ok(Box::new(factory(ui)?))
        }))
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Destination::Fresh(_))
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Fresh(_) => f.write_str("Fresh(..)"),
            Destination::Existing(id) => f.debug_tuple("Existing").field(id).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A deferred navigation request.
#[derive(Debug)]
pub enum Command {
    /// Switch to a destination.
    Change(Destination),
    /// Return to the parent of whichever screen is current when this runs.
    Back,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Change(Destination::Fresh(_)) => "forward",
            Command::Change(Destination::Existing(_)) => "backward",
            Command::Back => "back",
        }
    }
}

// ---------------------------------------------------------------------------
// CommandQueue
// ---------------------------------------------------------------------------

/// FIFO of pending navigation commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Enqueue a command for later execution.
    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Take the oldest pending command.
    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    /// Drop every pending command.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of pending commands.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Blank;
    use slotmap::SlotMap;

    // ── Destination ──────────────────────────────────────────────────

    #[test]
    fn fresh_and_existing() {
        let mut screens: SlotMap<ScreenId, ()> = SlotMap::with_key();
        let id = screens.insert(());
        assert!(Destination::fresh(|_: &Ui| Ok(Blank)).is_fresh());
        assert!(!Destination::Existing(id).is_fresh());
        assert_eq!(format!("{:?}", Destination::fresh(|_: &Ui| Ok(Blank))), "Fresh(..)");
    }

    // ── Queue ────────────────────────────────────────────────────────

    #[test]
    fn new_queue_is_empty() {
        let queue = CommandQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn commands_pop_in_order() {
        let mut queue = CommandQueue::default();
        queue.push(Command::Back);
        queue.push(Command::Change(Destination::fresh(|_: &Ui| Ok(Blank))));
        assert_eq!(queue.pending_count(), 2);

        assert_eq!(queue.pop().map(|c| c.name()), Some("back"));
        assert_eq!(queue.pop().map(|c| c.name()), Some("forward"));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = CommandQueue::new();
        queue.push(Command::Back);
        queue.push(Command::Back);
        queue.clear();
        assert!(queue.is_empty());
    }
}
