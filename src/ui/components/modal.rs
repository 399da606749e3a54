//! Blocking modal dialogs.
//!
//! While a dialog is visible it receives every key press.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::theme;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Outcome of a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction<T> {
    Confirm(T),
    Cancel,
}

/// A yes/no prompt guarding an action carrying `T`.
#[derive(Debug)]
pub struct ConfirmDialog<T> {
    title: String,
    message: String,
    pending: Option<T>,
}

impl<T> Default for ConfirmDialog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConfirmDialog<T> {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            pending: None,
        }
    }

    /// Ask for confirmation of `action`.
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>, action: T) {
        self.title = title.into();
        self.message = message.into();
        self.pending = Some(action);
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Handle a key press. Closing the dialog yields the outcome.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ConfirmAction<T>> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.pending.take().map(ConfirmAction::Confirm)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending = None;
                Some(ConfirmAction::Cancel)
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.is_visible() {
            return;
        }
        let t = theme();

        let dialog_area = centered_rect(area, 50.min(area.width.saturating_sub(4)), 7);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.title), t.title_style()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.warning));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .margin(1)
            .split(inner);

        let message = Paragraph::new(Span::styled(
            self.message.as_str(),
            Style::default().fg(t.fg).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        let hint = Line::from(vec![
            Span::styled("y", Style::default().fg(t.success)),
            Span::raw(": yes  "),
            Span::styled("n/Esc", Style::default().fg(t.error)),
            Span::raw(": cancel"),
        ]);
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[1]);
    }
}

/// An error the user must dismiss before doing anything else.
#[derive(Debug, Default)]
pub struct ErrorDialog {
    title: String,
    message: Option<String>,
}

impl ErrorDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = Some(message.into());
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true when the key dismissed the dialog.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ') => {
                self.message = None;
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = &self.message else {
            return;
        };
        let t = theme();

        let width = 60.min(area.width.saturating_sub(4));
        let inner_width = width.saturating_sub(4).max(1) as usize;
        let lines = message
            .lines()
            .map(|l| l.chars().count().div_ceil(inner_width).max(1))
            .sum::<usize>() as u16;
        let dialog_area = centered_rect(area, width, (lines + 5).min(area.height));
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(t.error).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.error));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .horizontal_margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new(message.as_str())
                .style(Style::default().fg(t.fg))
                .wrap(Wrap { trim: false }),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled("Enter/Esc: dismiss", t.hint_style()))
                .alignment(Alignment::Center),
            chunks[1],
        );
    }
}
