//! Read-only resume view.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::api::ResumeId;
use crate::resume::{render_lines, render_record, Record, RenderNode};
use crate::ui::theme::theme;

/// Action returned from the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    Back,
    Edit(ResumeId),
    Export(ResumeId),
}

#[derive(Debug, Default)]
pub struct DetailView {
    resume_id: Option<ResumeId>,
    nodes: Vec<RenderNode>,
    lines: Vec<Line<'static>>,
    scroll: u16,
    /// Visible rows at the last render, for page scrolling.
    page_height: u16,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed content with a rendering of `record`.
    pub fn show(&mut self, id: ResumeId, record: &Record) {
        self.nodes = render_record(record);
        self.lines = render_lines(&self.nodes);
        self.resume_id = Some(id);
        self.scroll = 0;
    }

    pub fn resume_id(&self) -> Option<&ResumeId> {
        self.resume_id.as_ref()
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn max_scroll(&self) -> u16 {
        (self.lines.len() as u16).saturating_sub(self.page_height.max(1))
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = next as u16;
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<DetailAction> {
        let page = self.page_height.max(1) as i32;
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => self.scroll_by(1),
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => self.scroll_by(-1),
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.scroll_by(page)
            }
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.scroll_by(-page)
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => self.scroll = 0,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.scroll = self.max_scroll(),
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                return self.resume_id.clone().map(DetailAction::Edit)
            }
            (KeyCode::Char('x'), KeyModifiers::NONE) => {
                return self.resume_id.clone().map(DetailAction::Export)
            }
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                return Some(DetailAction::Back)
            }
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let title = match &self.resume_id {
            Some(id) => format!(" Resume {} ", id),
            None => " Resume ".to_string(),
        };
        let block = Block::default()
            .title(Span::styled(title, t.title_style()))
            .borders(Borders::ALL)
            .border_style(t.border_style(true));

        self.page_height = area.height.saturating_sub(2);
        self.scroll = self.scroll.min(self.max_scroll());

        let content = if self.lines.is_empty() {
            vec![Line::from(Span::styled("Nothing to display", t.hint_style()))]
        } else {
            self.lines.clone()
        };
        frame.render_widget(
            Paragraph::new(content).block(block).scroll((self.scroll, 0)),
            area,
        );

        if self.lines.len() > self.page_height as usize {
            let mut state = ScrollbarState::new(self.max_scroll() as usize)
                .position(self.scroll as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }
}
