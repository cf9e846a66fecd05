//! File path prompt for logo and image uploads

use super::base::centered_rect;
use crate::state::PendingUpload;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const CURSOR: &str = "▌";

/// Render the path prompt of a pending upload
pub fn render_upload_dialog(frame: &mut Frame, upload: &PendingUpload) {
    let dialog_width = 60u16;
    let dialog_height = 8u16;
    let dialog_area = centered_rect(frame.area(), dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let visible = (dialog_width - 4) as usize;
    let content = vec![
        Line::from(Span::styled(
            upload.title(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Caminho do arquivo:",
            Style::default().fg(Color::White),
        )),
        path_line(upload.path.as_text(), upload.path.cursor, visible),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::styled(" enviar  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::styled(" cancelar", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Path with the cursor, scrolled so the cursor stays inside `width` chars
fn path_line(text: &str, cursor: usize, width: usize) -> Line<'static> {
    let skip = (cursor + 1).saturating_sub(width);
    let before: String = text.chars().skip(skip).take(cursor.saturating_sub(skip)).collect();
    let after: String = text
        .chars()
        .skip(cursor)
        .take(width.saturating_sub(before.chars().count() + 1))
        .collect();

    Line::from(vec![
        Span::styled(before, Style::default().fg(Color::Yellow)),
        Span::styled(CURSOR, Style::default().fg(Color::Cyan)),
        Span::styled(after, Style::default().fg(Color::Yellow)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_short_path_is_shown_whole() {
        assert_eq!(rendered(&path_line("/tmp/logo.png", 4, 40)), "/tmp▌/logo.png");
    }

    #[test]
    fn test_long_path_scrolls_to_cursor() {
        let path = "/home/usuário/imagens/fornecedores/logo.png";
        let end = path.chars().count();
        let line = rendered(&path_line(path, end, 10));
        assert_eq!(line, "/logo.png▌");
        assert_eq!(line.chars().count(), 10);
    }
}
