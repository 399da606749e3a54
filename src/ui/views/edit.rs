//! Resume edit form view.
//!
//! The view owns a [`ResumeForm`] and one editor widget per control. Edits
//! are written back to the form as they happen; the form is only sent to the
//! server when the user asks to save it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::ResumeId;
use crate::resume::{ControlKind, FormControl, Record, ResumeForm};
use crate::ui::components::{TextEditor, TextInput};
use crate::ui::theme::theme;

const SINGLE_LINE_HEIGHT: u16 = 3;
const MULTI_LINE_HEIGHT: u16 = 7;

/// Action returned from the edit view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Back,
    /// Submit the form.
    Save,
}

#[derive(Debug, Clone)]
enum EditorWidget {
    Line(TextInput),
    Multi(TextEditor),
}

impl EditorWidget {
    fn for_control(control: &FormControl) -> Self {
        match control.kind {
            ControlKind::SingleLine => EditorWidget::Line(TextInput::with_value(&control.value)),
            ControlKind::MultiLine => EditorWidget::Multi(TextEditor::new(&control.value)),
        }
    }

    fn value(&self) -> String {
        match self {
            EditorWidget::Line(input) => input.value().to_string(),
            EditorWidget::Multi(editor) => editor.content(),
        }
    }

    fn height(&self) -> u16 {
        match self {
            EditorWidget::Line(_) => SINGLE_LINE_HEIGHT,
            EditorWidget::Multi(_) => MULTI_LINE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
struct FieldEditor {
    name: String,
    label: String,
    widget: EditorWidget,
}

/// A row of the scrolling form layout.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Header(String),
    Control(usize),
}

#[derive(Debug, Default)]
pub struct EditView {
    resume_id: Option<ResumeId>,
    form: ResumeForm,
    editors: Vec<FieldEditor>,
    rows: Vec<Row>,
    focus: usize,
    /// Top of the viewport, in terminal rows from the top of the form.
    offset: u16,
}

impl EditView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the form from `record` and rebuild the editors.
    pub fn load(&mut self, id: ResumeId, record: &Record) {
        self.form.populate(record);
        self.resume_id = Some(id);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.editors.clear();
        self.rows.clear();

        self.rows.push(Row::Header("General".to_string()));
        for control in self.form.general() {
            self.rows.push(Row::Control(self.editors.len()));
            self.editors.push(editor_for(control));
        }

        for section in self.form.sections() {
            for group in &section.groups {
                self.rows
                    .push(Row::Header(format!("{} #{}", section.title(), group.index + 1)));
                for control in &group.controls {
                    self.rows.push(Row::Control(self.editors.len()));
                    self.editors.push(editor_for(control));
                }
            }
        }

        self.focus = 0;
        self.offset = 0;
    }

    pub fn resume_id(&self) -> Option<&ResumeId> {
        self.resume_id.as_ref()
    }

    pub fn form(&self) -> &ResumeForm {
        &self.form
    }

    /// Name of the focused control.
    pub fn focused_name(&self) -> Option<&str> {
        self.editors.get(self.focus).map(|e| e.name.as_str())
    }

    fn focus_next(&mut self) {
        if !self.editors.is_empty() {
            self.focus = (self.focus + 1) % self.editors.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.editors.is_empty() {
            self.focus = (self.focus + self.editors.len() - 1) % self.editors.len();
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<EditAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return Some(EditAction::Back),
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => return Some(EditAction::Save),
            (KeyCode::Tab, KeyModifiers::NONE) => self.focus_next(),
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => self.focus_prev(),
            // Enter moves on from a single-line control and breaks lines in a multi-line one.
            (KeyCode::Enter, _)
                if matches!(
                    self.editors.get(self.focus).map(|e| &e.widget),
                    Some(EditorWidget::Line(_))
                ) =>
            {
                self.focus_next()
            }
            _ => {
                let Some(editor) = self.editors.get_mut(self.focus) else {
                    return None;
                };
                let changed = match &mut editor.widget {
                    EditorWidget::Line(input) => input.handle_input(key),
                    EditorWidget::Multi(text) => text.handle_input(key),
                };
                if changed {
                    let value = editor.widget.value();
                    self.form.set_value(&editor.name, value);
                }
            }
        }
        None
    }

    /// Vertical position and height of every row.
    fn row_extents(&self) -> Vec<(u16, u16)> {
        let mut y = 0u16;
        self.rows
            .iter()
            .map(|row| {
                let height = match row {
                    Row::Header(_) => 1,
                    Row::Control(i) => self.editors[*i].widget.height(),
                };
                let extent = (y, height);
                y = y.saturating_add(height);
                extent
            })
            .collect()
    }

    /// Move the viewport so the focused control is fully visible.
    fn follow_focus(&mut self, extents: &[(u16, u16)], viewport: u16) {
        let Some(row) = self.rows.iter().position(|r| *r == Row::Control(self.focus)) else {
            return;
        };
        let (control_top, height) = extents[row];
        let bottom = control_top + height;
        if height >= viewport {
            // Taller than the viewport: keep the control's top edge visible.
            self.offset = control_top;
            return;
        }
        // Show the group header with the first control of a group.
        let top = if row > 0 && matches!(self.rows[row - 1], Row::Header(_)) {
            control_top - 1
        } else {
            control_top
        };
        if top < self.offset {
            self.offset = top;
        } else if bottom > self.offset + viewport {
            self.offset = bottom.saturating_sub(viewport);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let position = format!("{}/{}", self.focus + 1, self.form.control_count());
        let title = match &self.resume_id {
            Some(id) => format!(" Edit resume {}  {} ", id, position),
            None => format!(" Edit resume  {} ", position),
        };
        let block = Block::default()
            .title(Span::styled(title, t.title_style()))
            .borders(Borders::ALL)
            .border_style(t.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let extents = self.row_extents();
        self.follow_focus(&extents, inner.height);

        for (row, (top, height)) in self.rows.clone().iter().zip(extents) {
            if top < self.offset || top >= self.offset + inner.height {
                continue;
            }
            // Rows cut by the bottom edge are only drawn when nothing else fits.
            let visible = (self.offset + inner.height - top).min(height);
            if visible < height && top != self.offset {
                continue;
            }
            let row_area = Rect {
                x: inner.x,
                y: inner.y + (top - self.offset),
                width: inner.width,
                height: visible,
            };
            match row {
                Row::Header(text) => frame.render_widget(
                    Paragraph::new(Span::styled(
                        text.as_str(),
                        Style::default().fg(t.label).add_modifier(Modifier::BOLD),
                    )),
                    row_area,
                ),
                Row::Control(i) => {
                    let focused = *i == self.focus;
                    let editor = &mut self.editors[*i];
                    match &mut editor.widget {
                        EditorWidget::Line(input) => {
                            input.render_with_label(frame, row_area, &editor.label, focused)
                        }
                        EditorWidget::Multi(text) => {
                            text.render(frame, row_area, &editor.label, focused)
                        }
                    }
                }
            }
        }
    }
}

fn editor_for(control: &FormControl) -> FieldEditor {
    FieldEditor {
        name: control.name.clone(),
        label: control.label.clone(),
        widget: EditorWidget::for_control(control),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> Record {
        record(json!({
            "first_name": "Ana",
            "experiences": [
                {"title": "Eng", "bullet_points": ["a", "b"]}
            ]
        }))
    }

    #[test]
    fn test_load_builds_editors_for_every_control() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        assert_eq!(view.editors.len(), view.form().control_count());
        assert_eq!(view.focused_name(), Some("first_name"));
        assert!(view
            .rows
            .contains(&Row::Header("Experiences #1".to_string())));
    }

    #[test]
    fn test_bullet_points_use_multi_line_editor() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        let editor = view
            .editors
            .iter()
            .find(|e| e.name == "experiences-0-bullet_points")
            .unwrap();
        assert!(matches!(editor.widget, EditorWidget::Multi(_)));
        assert_eq!(editor.widget.value(), "a\nb");
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        let count = view.editors.len();

        view.handle_input(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(view.focus, count - 1);
        view.handle_input(key(KeyCode::Tab));
        assert_eq!(view.focus, 0);
        view.handle_input(key(KeyCode::Enter));
        assert_eq!(view.focused_name(), Some("last_name"));
    }

    #[test]
    fn test_typing_updates_form() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        view.handle_input(key(KeyCode::Char('!')));
        assert_eq!(view.form().value("first_name"), Some("Ana!"));
    }

    #[test]
    fn test_reload_discards_previous_groups() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        view.load(ResumeId::new("2"), &record(json!({"first_name": "Bo"})));
        assert!(view.form().sections().iter().all(|s| s.groups.is_empty()));
        assert_eq!(view.editors.len(), 7);
        assert_eq!(view.focus, 0);
    }

    #[test]
    fn test_follow_focus_scrolls_down_and_up() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        let extents = view.row_extents();

        view.focus = view.editors.len() - 1;
        view.follow_focus(&extents, 10);
        assert!(view.offset > 0);

        view.focus = 0;
        view.follow_focus(&extents, 10);
        assert_eq!(view.offset, 0);
    }

    #[test]
    fn test_esc_goes_back() {
        let mut view = EditView::new();
        assert_eq!(view.handle_input(key(KeyCode::Esc)), Some(EditAction::Back));
    }

    #[test]
    fn test_ctrl_s_saves() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        assert_eq!(
            view.handle_input(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(EditAction::Save)
        );
        // A plain 's' is typed into the focused control.
        assert_eq!(view.handle_input(key(KeyCode::Char('s'))), None);
        assert_eq!(view.form().value("first_name"), Some("Anas"));
    }

    #[test]
    fn test_tall_control_pinned_to_top_on_short_viewport() {
        let mut view = EditView::new();
        view.load(ResumeId::new("1"), &sample());
        let extents = view.row_extents();
        let multi = view
            .editors
            .iter()
            .position(|e| e.name == "experiences-0-bullet_points")
            .unwrap();
        let row = view
            .rows
            .iter()
            .position(|r| *r == Row::Control(multi))
            .unwrap();

        view.focus = multi;
        view.follow_focus(&extents, MULTI_LINE_HEIGHT - 2);
        assert_eq!(view.offset, extents[row].0);
    }
}
