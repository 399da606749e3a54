//! Loading indicator for in-flight server calls.
//!
//! The indicator counts outstanding requests so overlapping calls keep the
//! spinner running until the last one completes.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    message: String,
    spinner_state: usize,
    pending: usize,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and show `message` while it runs.
    pub fn start(&mut self, message: impl Into<String>) {
        if self.pending == 0 {
            self.spinner_state = 0;
        }
        self.pending += 1;
        self.message = message.into();
    }

    /// Register a completed request.
    pub fn finish(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.pending > 0
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Advance the spinner. Called on every tick.
    pub fn tick(&mut self) {
        if self.is_active() {
            self.spinner_state = (self.spinner_state + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_state]
    }

    /// Render left-aligned in a status line.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.is_active() {
            return;
        }

        let text = format!("{} {}", self.spinner_frame(), self.message);
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(theme().accent))
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_requests() {
        let mut loader = LoadingIndicator::new();
        loader.start("Loading resumes...");
        loader.start("Deleting resume...");
        assert_eq!(loader.message(), "Deleting resume...");

        loader.finish();
        assert!(loader.is_active());
        loader.finish();
        assert!(!loader.is_active());

        // Extra completions never underflow.
        loader.finish();
        assert!(!loader.is_active());
    }

    #[test]
    fn test_tick_only_when_active() {
        let mut loader = LoadingIndicator::new();
        loader.tick();
        assert_eq!(loader.spinner_state, 0);

        loader.start("x");
        loader.tick();
        assert_eq!(loader.spinner_state, 1);
    }

    #[test]
    fn test_tick_wraps() {
        let mut loader = LoadingIndicator::new();
        loader.start("x");
        for _ in 0..SPINNER_FRAMES.len() {
            loader.tick();
        }
        assert_eq!(loader.spinner_state, 0);
    }
}
