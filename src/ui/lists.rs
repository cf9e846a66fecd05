//! Supplier, product and client list views

use super::widgets::{render_placeholder, render_scrollable_list};
use crate::app::App;
use crate::state::{City, LookupItem, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// A table column: header and width in chars
type Column = (&'static str, usize);

const SUPPLIER_COLUMNS: &[Column] = &[
    ("Razão social", 28),
    ("CNPJ", 20),
    ("Telefone", 16),
    ("Cidade", 22),
    ("Status", 8),
];

const PRODUCT_COLUMNS: &[Column] = &[
    ("Código", 8),
    ("Nome", 28),
    ("Un.", 4),
    ("Marca", 16),
    ("Categoria", 16),
];

const CLIENT_COLUMNS: &[Column] = &[
    ("Nome", 28),
    ("CPF/CNPJ", 20),
    ("Telefone", 16),
    ("Cidade", 22),
];

pub fn draw_suppliers(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app
        .state
        .suppliers
        .iter()
        .map(|s| {
            let (status, color) = if s.active {
                ("ativo", Color::Green)
            } else {
                ("inativo", Color::Red)
            };
            vec![
                (s.name_social_reason.clone(), Color::White),
                (s.cnpj.clone(), Color::Cyan),
                (s.tel.clone(), Color::Gray),
                (city_name(s.city.as_ref()), Color::Gray),
                (status.to_string(), color),
            ]
        })
        .collect();
    draw_table(frame, area, app, View::Suppliers, SUPPLIER_COLUMNS, rows);
}

pub fn draw_products(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app
        .state
        .products
        .iter()
        .map(|p| {
            let name_of = |item: Option<&LookupItem>| {
                item.map(|i| i.name.clone()).unwrap_or_default()
            };
            vec![
                (p.code.clone(), Color::Cyan),
                (p.name.clone(), Color::White),
                (p.measure_unit.clone(), Color::Gray),
                (name_of(p.brand.as_ref()), Color::Gray),
                (name_of(p.category.as_ref()), Color::Gray),
            ]
        })
        .collect();
    draw_table(frame, area, app, View::Products, PRODUCT_COLUMNS, rows);
}

pub fn draw_clients(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app
        .state
        .clients
        .iter()
        .map(|c| {
            vec![
                (c.name.clone(), Color::White),
                (c.document.clone(), Color::Cyan),
                (c.tel.clone(), Color::Gray),
                (city_name(c.city.as_ref()), Color::Gray),
            ]
        })
        .collect();
    draw_table(frame, area, app, View::Clients, CLIENT_COLUMNS, rows);
}

fn city_name(city: Option<&City>) -> String {
    city.map(City::display_name).unwrap_or_default()
}

fn draw_table(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    view: View,
    columns: &[Column],
    rows: Vec<Vec<(String, Color)>>,
) {
    let block = Block::default()
        .title(format!(" {} ({}) ", view.title(), rows.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if rows.is_empty() {
        render_placeholder(
            frame,
            area,
            block,
            "Nenhum registro encontrado.\nPressione 'n' para cadastrar.",
        );
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let mut header = vec![Span::raw(" ")];
    header.extend(columns.iter().map(|(title, width)| {
        Span::styled(
            cell(title, *width),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let mut spans = vec![Span::styled(prefix, Style::default().fg(Color::Cyan))];
            spans.extend(
                row.into_iter()
                    .zip(columns)
                    .map(|((value, color), (_, width))| {
                        Span::styled(cell(&value, *width), Style::default().fg(color))
                    }),
            );
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}

/// Text cut or padded to `width` chars, plus a separating space
fn cell(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count > width {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}… ")
    } else {
        format!("{value:<width$} ")
    }
}
