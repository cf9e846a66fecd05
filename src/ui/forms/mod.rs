//! Form rendering module
//!
//! Every record form is drawn by the same routine: a vertical run of
//! fields scrolled so the focused one stays visible, and a help line.

mod field_renderer;

use crate::app::App;
use crate::cep::LookupState;
use crate::platform::SAVE_SHORTCUT;
use crate::state::{Form, FormMode, FormState};
use field_renderer::{draw_field, field_height};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;

/// Draw the open form of the current view
pub fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.state.form.as_form() else {
        return;
    };

    let noun = app.state.current_view.title();
    let title = match app.state.form.mode() {
        Some(FormMode::Edit(_)) => format!(" Editar {} ", noun.to_lowercase()),
        _ => format!(" Cadastrar {} ", noun.to_lowercase()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    draw_fields(frame, chunks[0], form);

    let lookup = match app.state.form {
        FormState::Client(_) | FormState::Supplier(_) => Some(app.lookup_state()),
        _ => None,
    };
    let uploads = matches!(
        app.state.form,
        FormState::Supplier(_) | FormState::Product(_)
    );
    draw_help_text(frame, chunks[1], lookup, uploads);
}

fn draw_fields(frame: &mut Frame, area: Rect, form: &dyn Form) {
    let fields = &form.field_set().fields;
    let heights: Vec<u16> = fields.iter().map(field_height).collect();
    let range = visible_range(&heights, form.active_field(), area.height);

    let mut y = area.y;
    for index in range {
        let field = &fields[index];
        let height = heights[index].min(area.y + area.height - y);
        let field_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        let error = form.field_set().error(&field.name);
        draw_field(frame, field_area, field, index == form.active_field(), error);
        y += height;
    }
}

/// Indices of the fields that fit in `available` rows with `active` shown
pub fn visible_range(heights: &[u16], active: usize, available: u16) -> Range<usize> {
    if heights.is_empty() {
        return 0..0;
    }
    let active = active.min(heights.len() - 1);

    let mut start = 0;
    let mut used: u16 = heights[..=active].iter().sum();
    while used > available && start < active {
        used -= heights[start];
        start += 1;
    }

    let mut end = active + 1;
    while end < heights.len() && used + heights[end] <= available {
        used += heights[end];
        end += 1;
    }

    start..end
}

fn draw_help_text(frame: &mut Frame, area: Rect, lookup: Option<&LookupState>, uploads: bool) {
    let key = Style::default().fg(Color::Cyan);
    let text = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("Tab", key),
        Span::styled(" próximo  ", text),
        Span::styled("←→", key),
        Span::styled(" opções  ", text),
        Span::styled(SAVE_SHORTCUT, key),
        Span::styled(" salvar  ", text),
    ];
    if uploads {
        spans.push(Span::styled("^U", key));
        spans.push(Span::styled(" arquivo  ", text));
    }
    spans.push(Span::styled("Esc", key));
    spans.push(Span::styled(" cancelar", text));

    if let Some(hint) = lookup.and_then(lookup_hint) {
        spans.push(Span::raw("  "));
        spans.push(hint);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Progress shown while a CEP lookup runs; failures stay silent
fn lookup_hint(state: &LookupState) -> Option<Span<'static>> {
    match state {
        LookupState::Pending { cep } => Some(Span::styled(
            format!("Buscando CEP {cep}..."),
            Style::default().fg(Color::Yellow),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_everything_fits() {
        assert_eq!(visible_range(&[3, 3, 6], 0, 20), 0..3);
    }

    #[test]
    fn test_scrolls_to_active_field() {
        let heights = [3, 3, 3, 3, 3];
        assert_eq!(visible_range(&heights, 0, 9), 0..3);
        assert_eq!(visible_range(&heights, 4, 9), 2..5);
    }

    #[test]
    fn test_active_field_taller_than_area() {
        assert_eq!(visible_range(&[3, 6, 3], 1, 4), 1..2);
    }

    #[test]
    fn test_only_pending_lookup_is_shown() {
        let pending = LookupState::Pending {
            cep: "01310100".to_string(),
        };
        let hint = lookup_hint(&pending).map(|s| s.content.to_string());
        assert_eq!(hint.as_deref(), Some("Buscando CEP 01310100..."));

        let failed = LookupState::Failed {
            cep: "99999999".to_string(),
        };
        assert!(lookup_hint(&failed).is_none());
        assert!(lookup_hint(&LookupState::Idle).is_none());
    }

    #[test]
    fn test_empty_form() {
        assert_eq!(visible_range(&[], 0, 10), 0..0);
    }
}
