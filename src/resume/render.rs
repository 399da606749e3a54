//! Read-only rendering of resume records.
//!
//! Rendering happens in two steps. [`render_record`] is a pure function from
//! a record to a tree of labeled [`RenderNode`]s. Attaching that tree to the
//! terminal ([`render_lines`]) or to plain text ([`render_plain_text`]) is a
//! separate step, so the same record always produces the same output and a
//! re-render never accumulates on top of a previous one.
//!
//! Skip rules, applied at every depth:
//! - a field whose name contains `id` (any case) is never shown
//! - null, empty strings, and empty sequences or records are never shown
//! - a list or block whose content renders to nothing is dropped entirely

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::value::{Record, Value};
use crate::ui::theme::theme;

/// Indentation added per nesting level.
const INDENT: &str = "  ";

/// A node of the render tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    /// A single labeled line, e.g. `First_name: Ana`.
    Field { label: String, value: String },
    /// A labeled list of items.
    List { label: String, items: Vec<ListItem> },
    /// A labeled block holding a nested record.
    Block {
        label: String,
        children: Vec<RenderNode>,
    },
}

/// An item of a [`RenderNode::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// A scalar item, shown as plain text.
    Text(String),
    /// A record item, rendered one level deeper.
    Record(Vec<RenderNode>),
}

/// Whether a field name marks a non-displayable identifier.
pub fn is_hidden_field(name: &str) -> bool {
    name.to_lowercase().contains("id")
}

/// Capitalize the first character of a field name for display.
pub fn format_key(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render every displayable field of a record.
pub fn render_record(record: &Record) -> Vec<RenderNode> {
    record
        .iter()
        .filter_map(|(name, value)| render_field(name, value))
        .collect()
}

/// Render a single field, or nothing if a skip rule applies.
pub fn render_field(name: &str, value: &Value) -> Option<RenderNode> {
    if is_hidden_field(name) || value.is_empty() {
        return None;
    }

    let label = format_key(name);
    match value {
        Value::Scalar(scalar) => scalar
            .display_text()
            .map(|value| RenderNode::Field { label, value }),
        Value::Sequence(items) => {
            let items: Vec<ListItem> = items.iter().filter_map(render_item).collect();
            (!items.is_empty()).then_some(RenderNode::List { label, items })
        }
        Value::Record(record) => {
            let children = render_record(record);
            (!children.is_empty()).then_some(RenderNode::Block { label, children })
        }
    }
}

fn render_item(value: &Value) -> Option<ListItem> {
    if value.is_empty() {
        return None;
    }

    match value {
        Value::Scalar(scalar) => scalar.display_text().map(ListItem::Text),
        Value::Record(record) => {
            let nodes = render_record(record);
            (!nodes.is_empty()).then_some(ListItem::Record(nodes))
        }
        // Nested sequences are shown like a record keyed by position.
        Value::Sequence(items) => {
            let nodes: Vec<RenderNode> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| render_field(&i.to_string(), v))
                .collect();
            (!nodes.is_empty()).then_some(ListItem::Record(nodes))
        }
    }
}

/// One output line of a flattened render tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Nesting depth, used for indentation.
    pub depth: usize,
    /// Label part of the line, without the trailing colon.
    pub label: Option<String>,
    /// Text after the label (or the whole line for list items).
    pub text: String,
}

impl RenderedLine {
    fn labeled(depth: usize, label: &str, text: impl Into<String>) -> Self {
        Self {
            depth,
            label: Some(label.to_string()),
            text: text.into(),
        }
    }

    fn plain(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            label: None,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::plain(0, "")
    }

    /// Plain-text form of this line, indentation included.
    pub fn to_text(&self) -> String {
        if self.label.is_none() && self.text.is_empty() {
            return String::new();
        }
        let indent = INDENT.repeat(self.depth);
        match &self.label {
            Some(label) if self.text.is_empty() => format!("{}{}:", indent, label),
            Some(label) => format!("{}{}: {}", indent, label, self.text),
            None => format!("{}{}", indent, self.text),
        }
    }
}

/// Flatten a render tree into indented lines.
pub fn flatten(nodes: &[RenderNode]) -> Vec<RenderedLine> {
    let mut out = Vec::new();
    flatten_into(nodes, 0, &mut out);
    out
}

fn flatten_into(nodes: &[RenderNode], depth: usize, out: &mut Vec<RenderedLine>) {
    for node in nodes {
        match node {
            RenderNode::Field { label, value } => {
                out.push(RenderedLine::labeled(depth, label, value.as_str()));
            }
            RenderNode::List { label, items } => {
                out.push(RenderedLine::labeled(depth, label, ""));
                let mut previous_was_record = false;
                for item in items {
                    match item {
                        ListItem::Text(text) => {
                            out.push(RenderedLine::plain(depth + 1, text.as_str()));
                            previous_was_record = false;
                        }
                        ListItem::Record(children) => {
                            if previous_was_record {
                                out.push(RenderedLine::blank());
                            }
                            flatten_into(children, depth + 1, out);
                            previous_was_record = true;
                        }
                    }
                }
            }
            RenderNode::Block { label, children } => {
                out.push(RenderedLine::labeled(depth, label, ""));
                flatten_into(children, depth + 1, out);
            }
        }
    }
}

/// Attach a render tree to styled terminal lines.
pub fn render_lines(nodes: &[RenderNode]) -> Vec<Line<'static>> {
    let t = theme();
    flatten(nodes)
        .into_iter()
        .map(|line| {
            let indent = INDENT.repeat(line.depth);
            match line.label {
                Some(label) => {
                    let mut spans = vec![
                        Span::raw(indent),
                        Span::styled(
                            format!("{}:", label),
                            Style::default().fg(t.label).add_modifier(Modifier::BOLD),
                        ),
                    ];
                    if !line.text.is_empty() {
                        spans.push(Span::raw(" "));
                        spans.push(Span::styled(line.text, Style::default().fg(t.fg)));
                    }
                    Line::from(spans)
                }
                None if line.text.is_empty() => Line::raw(""),
                None => Line::from(vec![
                    Span::raw(indent),
                    Span::styled(line.text, Style::default().fg(t.fg)),
                ]),
            }
        })
        .collect()
}

/// Render a record straight to plain text, one line per rendered line.
pub fn render_plain_text(record: &Record) -> String {
    flatten(&render_record(record))
        .iter()
        .map(RenderedLine::to_text)
        .collect::<Vec<_>>()
        .join("\n")
}
