//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod lists;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_error_dialog, render_upload_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (sidebar_area, main_area) = layout::create_layout(area);
    layout::draw_sidebar(frame, sidebar_area, app);

    match app.state.current_view {
        View::Dashboard => dashboard::draw(frame, main_area, app),
        View::Suppliers => lists::draw_suppliers(frame, main_area, app),
        View::Products => lists::draw_products(frame, main_area, app),
        View::Clients => lists::draw_clients(frame, main_area, app),
        View::SupplierForm | View::ProductForm | View::ClientForm => {
            forms::draw_form(frame, main_area, app)
        }
    }

    layout::draw_status_bar(frame, app);

    if let Some(pending) = &app.state.pending_delete {
        render_confirm_dialog(frame, pending);
    }

    if let Some(upload) = &app.state.pending_upload {
        render_upload_dialog(frame, upload);
    }

    // Errors stay on top of everything else
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_count());
    }
}
