//! Application state definitions

use super::entities::{City, Client, LookupItem, LookupKind, Product, Supplier};
use super::forms::{FormField, FormState};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Suppliers,
    SupplierForm,
    Products,
    ProductForm,
    Clients,
    ClientForm,
}

impl View {
    pub fn is_form_view(&self) -> bool {
        matches!(
            self,
            View::SupplierForm | View::ProductForm | View::ClientForm
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Suppliers => "Fornecedores",
            View::SupplierForm => "Fornecedor",
            View::Products => "Produtos",
            View::ProductForm => "Produto",
            View::Clients => "Clientes",
            View::ClientForm => "Cliente",
        }
    }

    /// Form view opened from a list view
    pub fn form_view(&self) -> Option<View> {
        match self {
            View::Suppliers => Some(View::SupplierForm),
            View::Products => Some(View::ProductForm),
            View::Clients => Some(View::ClientForm),
            _ => None,
        }
    }

    /// List view a form returns to
    pub fn list_view(&self) -> Option<View> {
        match self {
            View::SupplierForm => Some(View::Suppliers),
            View::ProductForm => Some(View::Products),
            View::ClientForm => Some(View::Clients),
            _ => None,
        }
    }
}

/// Entries of the dashboard menu, in display order
pub const DASHBOARD_ITEMS: [View; 3] = [View::Suppliers, View::Products, View::Clients];

/// Brands, models, categories and manufacturers offered by the product form
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub brands: Vec<LookupItem>,
    pub models: Vec<LookupItem>,
    pub categories: Vec<LookupItem>,
    pub manufacturers: Vec<LookupItem>,
}

impl LookupTables {
    pub fn get(&self, kind: LookupKind) -> &[LookupItem] {
        match kind {
            LookupKind::Brand => &self.brands,
            LookupKind::Model => &self.models,
            LookupKind::Category => &self.categories,
            LookupKind::Manufacturer => &self.manufacturers,
        }
    }

    pub fn set(&mut self, kind: LookupKind, items: Vec<LookupItem>) {
        match kind {
            LookupKind::Brand => self.brands = items,
            LookupKind::Model => self.models = items,
            LookupKind::Category => self.categories = items,
            LookupKind::Manufacturer => self.manufacturers = items,
        }
    }
}

/// Delete waiting for the user to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    /// List view the record belongs to
    pub view: View,
    pub id: String,
    /// Name shown in the dialog
    pub label: String,
    /// Which option is selected (0 = Cancel, 1 = Delete)
    pub selected_option: usize,
}

impl PendingDelete {
    pub fn new(view: View, id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            view,
            id: id.into(),
            label: label.into(),
            selected_option: 0,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.selected_option == 1
    }

    pub fn toggle_option(&mut self) {
        self.selected_option = 1 - self.selected_option.min(1);
    }
}

/// Logo or image upload waiting for a file path
#[derive(Debug, Clone)]
pub struct PendingUpload {
    /// Form view the upload was requested from
    pub view: View,
    pub id: String,
    pub path: FormField,
}

impl PendingUpload {
    pub fn new(view: View, id: impl Into<String>) -> Self {
        Self {
            view,
            id: id.into(),
            path: FormField::text("path", "Arquivo", false),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.view {
            View::SupplierForm => "Enviar logo",
            _ => "Enviar imagem",
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Data
    pub clients: Vec<Client>,
    pub suppliers: Vec<Supplier>,
    pub products: Vec<Product>,
    pub cities: Vec<City>,
    pub lookups: LookupTables,

    // Selection
    pub selected_index: usize,

    // UI state
    pub api_connected: bool,
    pub pending_delete: Option<PendingDelete>,
    pub pending_upload: Option<PendingUpload>,
    error_queue: VecDeque<String>,

    // Form state
    pub form: FormState,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Number of rows in the current list view
    pub fn list_len(&self) -> usize {
        match self.current_view {
            View::Dashboard => DASHBOARD_ITEMS.len(),
            View::Clients => self.clients.len(),
            View::Suppliers => self.suppliers.len(),
            View::Products => self.products.len(),
            _ => 0,
        }
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.clients.get(self.selected_index)
    }

    pub fn selected_supplier(&self) -> Option<&Supplier> {
        self.suppliers.get(self.selected_index)
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.get(self.selected_index)
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    /// Error currently shown
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    /// Number of queued errors, including the one shown
    pub fn error_count(&self) -> usize {
        self.error_queue.len()
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Drop the open form
    pub fn clear_form(&mut self) {
        self.form = FormState::None;
    }
}
