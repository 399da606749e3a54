//! Resume list dialog.
//!
//! A popup listing stored resumes, with per-entry actions for viewing,
//! editing, exporting and deleting.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::modal::centered_rect;
use crate::api::{ResumeId, ResumeSummary};
use crate::ui::theme::theme;

/// Action returned from the resume picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumePickerAction {
    View(ResumeId),
    Edit(ResumeId),
    Export(ResumeId),
    Delete(ResumeId),
    /// Fetch the list again.
    Refresh,
    Close,
}

/// Modal list of stored resumes.
#[derive(Debug, Default)]
pub struct ResumePicker {
    entries: Vec<ResumeSummary>,
    selected: usize,
    visible: bool,
    /// True between opening and the arrival of the list.
    loading: bool,
    list_state: ListState,
}

impl ResumePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the dialog with no entries while the list is fetched.
    pub fn show(&mut self) {
        self.entries.clear();
        self.selected = 0;
        self.list_state.select(None);
        self.loading = true;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.loading = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the entries with a fetched list.
    pub fn set_entries(&mut self, entries: Vec<ResumeSummary>) {
        self.entries = entries;
        self.loading = false;
        self.selected = 0;
        self.list_state
            .select(if self.entries.is_empty() { None } else { Some(0) });
    }

    /// Mark the fetch as finished without entries.
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }

    pub fn entries(&self) -> &[ResumeSummary] {
        &self.entries
    }

    pub fn selected_id(&self) -> Option<&ResumeId> {
        self.entries.get(self.selected).map(|e| &e.id)
    }

    fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
            self.list_state.select(Some(self.selected));
        }
    }

    fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.list_state.select(Some(self.selected));
        }
    }

    /// Handle keyboard input.
    ///
    /// Item actions leave the dialog open; the caller decides whether to
    /// hide it.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ResumePickerAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.move_down();
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.move_up();
                None
            }
            (KeyCode::Enter, _) | (KeyCode::Char('v'), KeyModifiers::NONE) => {
                self.selected_id().cloned().map(ResumePickerAction::View)
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                self.selected_id().cloned().map(ResumePickerAction::Edit)
            }
            (KeyCode::Char('x'), KeyModifiers::NONE) => {
                self.selected_id().cloned().map(ResumePickerAction::Export)
            }
            (KeyCode::Char('d'), KeyModifiers::NONE) => {
                self.selected_id().cloned().map(ResumePickerAction::Delete)
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(ResumePickerAction::Refresh),
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.visible = false;
                Some(ResumePickerAction::Close)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }
        let t = theme();

        let dialog_width = 56u16.min(area.width.saturating_sub(4));
        let item_count = self.entries.len().max(1) as u16;
        // Borders (2) + items + hint (1) + margin (1)
        let dialog_height = (item_count.min(12) + 4).min(area.height.saturating_sub(4));
        let dialog_area = centered_rect(area, dialog_width, dialog_height);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(" Resumes ", t.title_style()))
            .borders(Borders::ALL)
            .border_style(t.border_style(true));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let list_height = inner.height.saturating_sub(1);
        let list_area = Rect {
            height: list_height,
            ..inner
        };
        let hint_area = Rect {
            y: inner.y + list_height,
            height: 1,
            ..inner
        };

        if self.entries.is_empty() {
            let text = if self.loading {
                "Loading..."
            } else {
                "No resumes"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, t.hint_style())).alignment(Alignment::Center),
                list_area,
            );
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|e| ListItem::new(Span::styled(e.label(), Style::default().fg(t.fg))))
                .collect();
            let list = List::new(items)
                .highlight_style(t.selection_style())
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, list_area, &mut self.list_state);
        }

        let hint = Paragraph::new(Span::styled(
            "Enter:view  e:edit  x:export  d:delete  r:refresh  Esc:close",
            t.hint_style(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(hint, hint_area);
    }
}
