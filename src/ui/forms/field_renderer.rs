//! Field rendering utilities for forms

use crate::state::{FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";

/// Rows a field occupies, borders included
pub fn field_height(field: &FormField) -> u16 {
    if field.is_multiline {
        6
    } else {
        3
    }
}

/// Draw a form field, with its validation message under the border
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_color = match (error.is_some(), is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let content = if field.is_select() {
        Paragraph::new(select_line(field, is_active, style))
    } else if field.is_multiline {
        Paragraph::new(text_lines(field, is_active, style))
    } else {
        let line = text_lines(field, is_active, style)
            .into_iter()
            .next()
            .unwrap_or_default();
        Paragraph::new(line)
    };

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

fn select_line(field: &FormField, is_active: bool, style: Style) -> Line<'static> {
    let display = field.display_value();
    let creatable = matches!(&field.value, FieldValue::Choice(c) if c.creatable);

    let mut spans = Vec::new();
    if is_active {
        spans.push(Span::styled("◂ ", Style::default().fg(Color::Cyan)));
    }
    if display.is_empty() {
        let placeholder = if is_active && creatable {
            "(selecione ou digite)"
        } else {
            "(vazio)"
        };
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(display, style));
    }
    if is_active {
        spans.push(Span::styled(" ▸", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Text split into lines, with the cursor drawn at its char position
fn text_lines(field: &FormField, is_active: bool, style: Style) -> Vec<Line<'static>> {
    let text = field.as_text();

    if !is_active {
        if text.is_empty() {
            return vec![Line::from(Span::styled(
                "(vazio)",
                Style::default().fg(Color::DarkGray),
            ))];
        }
        return text
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
    }

    let cursor_style = Style::default().fg(Color::Cyan);
    let mut remaining = field.cursor;
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let len = line.chars().count();
        if remaining <= len {
            let before: String = line.chars().take(remaining).collect();
            let after: String = line.chars().skip(remaining).collect();
            lines.push(Line::from(vec![
                Span::styled(before, style),
                Span::styled(CURSOR, cursor_style),
                Span::styled(after, style),
            ]));
            remaining = usize::MAX;
        } else {
            if remaining != usize::MAX {
                remaining -= len + 1;
            }
            lines.push(Line::from(Span::styled(line.to_string(), style)));
        }
    }
    lines
}
