//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, List, ListState, Paragraph},
    Frame,
};

/// Render a list that scrolls to keep `selected_index` in view.
///
/// ```ignore
/// let list = List::new(items).block(block);
/// render_scrollable_list(frame, area, list, app.state.selected_index);
/// ```
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Render a dimmed message inside `block`, for views with nothing to list
pub fn render_placeholder(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let content = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(content, area);
}
