//! Confirmation dialog component for destructive actions

use super::base::centered_rect;
use crate::state::PendingDelete;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a confirmation dialog for delete action
pub fn render_confirm_dialog(frame: &mut Frame, action: &PendingDelete) {
    let dialog_width = 50u16;
    let dialog_height = 10u16;
    let dialog_area = centered_rect(frame.area(), dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let max_display_len = (dialog_width - 6) as usize;
    let display_text = truncate_string(&action.label, max_display_len);

    let mut content = vec![
        Line::from(Span::styled(
            "Confirmar exclusão",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Deseja realmente apagar",
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled(display_text, Style::default().fg(Color::Cyan)),
            Span::styled("?", Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    let options = [("Cancelar", Color::White), ("Apagar", Color::Red)];
    for (i, (label, base_color)) in options.into_iter().enumerate() {
        let is_selected = action.selected_option == i;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(base_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    content.push(Line::from(vec![
        Span::styled("←→", Style::default().fg(Color::Cyan)),
        Span::styled(" escolher  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirmar  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancelar", Style::default().fg(Color::DarkGray)),
    ]));

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Truncate a string to a maximum number of chars with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_string("João", 10), "João");
        assert_eq!(truncate_string("Distribuição São João", 10), "Distrib...");
    }
}
