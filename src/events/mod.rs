//! Terminal event polling.

mod handler;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;

/// Events delivered to the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// The tick interval elapsed without input.
    Tick,
}
