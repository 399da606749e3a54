//! Event handler implementation.
//!
//! Polls crossterm and converts terminal events to [`Event`]s.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// Polls the terminal for input, yielding a tick when idle.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler that ticks every `tick_rate_ms` milliseconds.
    ///
    /// A zero rate is raised to one millisecond so polling never spins.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Poll for the next event.
    ///
    /// Blocks until input arrives or the tick rate elapses.
    pub fn next(&self) -> std::io::Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        Ok(convert(event::read()?))
    }
}

fn convert(event: CrosstermEvent) -> Event {
    match event {
        // Key release and repeat events are reported on some platforms.
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        _ => Event::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_with_tick_rate() {
        let handler = EventHandler::with_tick_rate(50);
        assert_eq!(handler.tick_rate, Duration::from_millis(50));
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let handler = EventHandler::with_tick_rate(0);
        assert_eq!(handler.tick_rate, Duration::from_millis(1));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(convert(CrosstermEvent::Key(release)), Event::Tick);

        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(convert(CrosstermEvent::Key(press)), Event::Key(press));
    }

    #[test]
    fn test_resize() {
        assert_eq!(convert(CrosstermEvent::Resize(80, 24)), Event::Resize(80, 24));
    }
}
