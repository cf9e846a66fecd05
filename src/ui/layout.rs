//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::{View, DASHBOARD_ITEMS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Sidebar
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Sidebar entry highlighted for `view`: the list itself or the list a form belongs to
fn is_section_selected(section: View, view: View) -> bool {
    section == view || view.list_view() == Some(section)
}

/// Draw the sidebar with boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(DASHBOARD_ITEMS.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, section) in DASHBOARD_ITEMS.iter().enumerate() {
        let is_selected = is_section_selected(*section, app.state.current_view);
        render_sidebar_button(frame, chunks[idx + 1], section.title(), is_selected);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    let conn_status = if app.state.api_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    spans.push(Span::styled(
        get_view_hints(app.state.current_view),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let quit_hint = " ^C:sair ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: View) -> String {
    match view {
        View::Dashboard => "j/k:navegar  Enter:abrir  q:sair".to_string(),
        View::Suppliers => {
            "j/k:navegar  n:novo  e:editar  d:apagar  t:ativar  y:copiar  r:recarregar  Esc:voltar"
                .to_string()
        }
        View::Products | View::Clients => {
            "j/k:navegar  n:novo  e:editar  d:apagar  y:copiar  r:recarregar  Esc:voltar"
                .to_string()
        }
        View::SupplierForm | View::ProductForm => {
            format!("Tab:próximo  {SAVE_SHORTCUT}:salvar  ^U:enviar arquivo  Esc:cancelar")
        }
        View::ClientForm => format!("Tab:próximo  {SAVE_SHORTCUT}:salvar  Esc:cancelar"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_highlights_its_list() {
        assert!(is_section_selected(View::Clients, View::ClientForm));
        assert!(is_section_selected(View::Suppliers, View::Suppliers));
        assert!(!is_section_selected(View::Products, View::ClientForm));
        assert!(!is_section_selected(View::Products, View::Dashboard));
    }

    #[test]
    fn test_supplier_hints_include_toggle() {
        assert!(get_view_hints(View::Suppliers).contains("t:ativar"));
        assert!(!get_view_hints(View::Clients).contains("t:ativar"));
    }

    #[test]
    fn test_upload_hint_only_where_files_apply() {
        assert!(get_view_hints(View::SupplierForm).contains("^U"));
        assert!(get_view_hints(View::ProductForm).contains("^U"));
        assert!(!get_view_hints(View::ClientForm).contains("^U"));
    }
}
