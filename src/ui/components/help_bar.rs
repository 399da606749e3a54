//! Keyboard hint line at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Build the hint line for `(key, description)` pairs.
pub fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let t = theme();
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, description)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(t.accent),
        ));
        spans.push(Span::styled(format!(" {}", description), t.hint_style()));
    }
    Line::from(spans)
}

pub fn render_help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    frame.render_widget(Paragraph::new(hint_line(hints)), area);
}
