//! Dashboard menu

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::{View, DASHBOARD_ITEMS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn description(view: View) -> &'static str {
    match view {
        View::Suppliers => "Razão social, CNPJ, endereço e representante",
        View::Products => "Código, unidade de medida, marca e categoria",
        View::Clients => "Pessoas e empresas atendidas",
        _ => "",
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Cadastro ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(DASHBOARD_ITEMS.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "O que deseja gerenciar?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "j/k para escolher, Enter para abrir",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(heading, rows[0]);

    for (idx, view) in DASHBOARD_ITEMS.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(0)])
            .split(rows[idx + 1]);

        let is_selected = idx == app.state.selected_index;
        render_sidebar_button(frame, columns[0], view.title(), is_selected);

        let color = if is_selected {
            Color::White
        } else {
            Color::DarkGray
        };
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", description(*view)),
                Style::default().fg(color),
            )),
        ]);
        frame.render_widget(text, columns[1]);
    }
}
