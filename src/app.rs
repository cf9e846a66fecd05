//! Application state and core logic

use crate::api::{ApiClient, ApiError, BackendApi};
use crate::cep::{BrasilApiClient, CepLookup, LookupState};
use crate::config::TuiConfig;
use crate::state::{
    AppState, ClientForm, FormMode, FormState, LookupKind, PendingDelete, PendingUpload,
    ProductForm, SupplierForm, View, DASHBOARD_ITEMS,
};
use crate::validation::{validate_client, validate_product, validate_supplier};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Persistence backend
    api: Box<dyn BackendApi>,
    /// CEP lookups for the address forms
    resolver: crate::cep::AddressResolver,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance talking to the configured services
    pub async fn new(config: &TuiConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_url(), config.timeout())?;
        let cep = BrasilApiClient::new(config.cep_url(), config.timeout())?;
        info!(
            "Using API at {} and CEP service at {}",
            api.base_url(),
            config.cep_url()
        );

        let mut app = Self::with_backends(Box::new(api), Arc::new(cep));
        app.load_reference_data().await;
        Ok(app)
    }

    /// Create an App over arbitrary backends
    pub fn with_backends(api: Box<dyn BackendApi>, cep: Arc<dyn CepLookup>) -> Self {
        Self {
            state: AppState::default(),
            api,
            resolver: crate::cep::AddressResolver::new(cep),
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Lifecycle of the last CEP lookup of the open form
    pub fn lookup_state(&self) -> &LookupState {
        self.resolver.state()
    }

    /// Load cities and product lookups; marks the API as reachable or not
    pub async fn load_reference_data(&mut self) {
        self.refresh_cities().await;
        if self.state.api_connected {
            self.refresh_lookups().await;
        }
    }

    async fn refresh_cities(&mut self) {
        match self.api.list_cities().await {
            Ok(cities) => {
                debug!("Loaded {} cities", cities.len());
                self.state.cities = cities;
                self.state.api_connected = true;
            }
            Err(e) => {
                warn!("Failed to load cities: {e}");
                self.state.api_connected = !matches!(e, ApiError::Transport(_));
            }
        }
    }

    async fn refresh_lookups(&mut self) {
        for kind in LookupKind::ALL {
            match self.api.list_lookup(kind).await {
                Ok(items) => {
                    if let FormState::Product(form) = &mut self.state.form {
                        form.set_lookup_options(kind, &items);
                    }
                    self.state.lookups.set(kind, items);
                }
                Err(e) => warn!("Failed to load {} list: {e}", kind.label()),
            }
        }
    }

    /// Apply every finished CEP lookup to the open form
    pub fn drain_lookups(&mut self) {
        while let Some(outcome) = self.resolver.try_recv() {
            match &mut self.state.form {
                FormState::Client(form) => {
                    self.resolver.apply(form, &self.state.cities, outcome);
                }
                FormState::Supplier(form) => {
                    self.resolver.apply(form, &self.state.cities, outcome);
                }
                _ => self.resolver.discard(outcome),
            }
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Handle delete confirmation (modal)
        if self.state.pending_delete.is_some() {
            self.handle_delete_dialog_key(key).await;
            return Ok(());
        }

        // Handle upload path prompt (modal)
        if self.state.pending_upload.is_some() {
            self.handle_upload_dialog_key(key).await;
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::Dashboard => self.handle_dashboard_key(key).await,
            View::Clients | View::Suppliers | View::Products => self.handle_list_key(key).await,
            View::ClientForm | View::SupplierForm | View::ProductForm => {
                self.handle_form_key(key).await
            }
        }

        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = view;
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        // Skip form views in history to go back to the last non-form view
        while let Some(view) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            return;
        }
        self.state.current_view = View::Dashboard;
    }

    /// Handle keys in the dashboard menu
    async fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(DASHBOARD_ITEMS.len())
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(&view) = DASHBOARD_ITEMS.get(self.state.selected_index) {
                    self.open_list(view).await;
                }
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    /// Show a list view and fetch its rows
    async fn open_list(&mut self, view: View) {
        self.navigate(view);
        self.state.reset_selection();
        self.reload_list().await;
    }

    /// Handle keys shared by the three list views
    async fn handle_list_key(&mut self, key: KeyEvent) {
        let view = self.state.current_view;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.state.list_len();
                self.state.move_selection_down(len);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('n') => self.open_create_form(view).await,
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(view).await,
            KeyCode::Char('d') => self.request_delete(view),
            KeyCode::Char('r') => self.reload_list().await,
            KeyCode::Char('y') => self.copy_selected(view),
            KeyCode::Char('t') if view == View::Suppliers => self.toggle_supplier().await,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
                self.go_back();
                self.state.reset_selection();
            }
            _ => {}
        }
    }

    /// Fetch the rows of the current list view
    async fn reload_list(&mut self) {
        let loaded = match self.state.current_view {
            View::Clients => self
                .api
                .list_clients()
                .await
                .map(|rows| self.state.clients = rows),
            View::Suppliers => self
                .api
                .list_suppliers()
                .await
                .map(|rows| self.state.suppliers = rows),
            View::Products => self
                .api
                .list_products()
                .await
                .map(|rows| self.state.products = rows),
            _ => return,
        };

        match loaded {
            Ok(()) => {
                self.state.api_connected = true;
                let len = self.state.list_len();
                self.state.clamp_selection(len);
            }
            Err(e) => {
                error!("Failed to load {}: {e}", self.state.current_view.title());
                if matches!(e, ApiError::Transport(_)) {
                    self.state.api_connected = false;
                }
                self.push_error(format!(
                    "Falha ao carregar {}: {e}",
                    self.state.current_view.title().to_lowercase()
                ));
            }
        }
    }

    /// Open an empty form for the list's entity
    async fn open_create_form(&mut self, view: View) {
        self.resolver.reset();
        self.state.form = match view {
            View::Clients => {
                self.refresh_cities().await;
                FormState::Client(ClientForm::new(&self.state.cities))
            }
            View::Suppliers => {
                self.refresh_cities().await;
                FormState::Supplier(SupplierForm::new(&self.state.cities))
            }
            View::Products => {
                self.refresh_lookups().await;
                FormState::Product(ProductForm::new(&self.state.lookups))
            }
            _ => return,
        };
        if let Some(form_view) = view.form_view() {
            self.navigate(form_view);
        }
    }

    /// Fetch the selected record and open it in an edit form
    async fn open_edit_form(&mut self, view: View) {
        let id = match view {
            View::Clients => self.state.selected_client().map(|c| c.id.clone()),
            View::Suppliers => self.state.selected_supplier().map(|s| s.id.clone()),
            View::Products => self.state.selected_product().map(|p| p.id.clone()),
            _ => None,
        };
        let Some(id) = id else {
            return;
        };

        self.resolver.reset();
        let form = match view {
            View::Clients => {
                self.refresh_cities().await;
                self.api
                    .get_client(&id)
                    .await
                    .map(|c| FormState::Client(ClientForm::from_client(&c, &self.state.cities)))
            }
            View::Suppliers => {
                self.refresh_cities().await;
                self.api.get_supplier(&id).await.map(|s| {
                    FormState::Supplier(SupplierForm::from_supplier(&s, &self.state.cities))
                })
            }
            _ => {
                self.refresh_lookups().await;
                self.api.get_product(&id).await.map(|p| {
                    FormState::Product(ProductForm::from_product(&p, &self.state.lookups))
                })
            }
        };

        match form {
            Ok(form) => {
                self.state.form = form;
                if let Some(form_view) = view.form_view() {
                    self.navigate(form_view);
                }
            }
            Err(e) => {
                error!("Failed to load record {id}: {e}");
                self.push_error(format!("Falha ao carregar registro: {e}"));
            }
        }
    }

    /// Handle keys in the create/edit forms
    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.leave_field(true),
            KeyCode::BackTab => self.leave_field(false),
            // Save (Ctrl+S or Cmd+W / Ctrl+W)
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_form().await;
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_form().await;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_upload();
            }
            KeyCode::Esc => {
                self.state.clear_form();
                self.resolver.reset();
                self.go_back();
            }
            KeyCode::Enter => {
                if self.state.form.is_active_field_multiline() {
                    if let Some(field) = self.state.form.get_active_field_mut() {
                        field.insert_char('\n');
                    }
                } else {
                    self.leave_field(true);
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.insert_char(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.backspace();
                }
            }
            KeyCode::Left => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.cursor_right();
                }
            }
            KeyCode::Home => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.cursor_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.cursor_end();
                }
            }
            _ => {}
        }
    }

    /// Move focus, starting a CEP lookup when focus leaves the CEP field
    fn leave_field(&mut self, forward: bool) {
        let leaving_cep = self.state.form.active_field_name() == Some("cep");
        if forward {
            self.state.form.next_field();
        } else {
            self.state.form.prev_field();
        }
        if leaving_cep {
            self.start_cep_lookup();
        }
    }

    fn start_cep_lookup(&mut self) {
        match &self.state.form {
            FormState::Client(form) => {
                self.resolver.on_postal_code_blur(form);
            }
            FormState::Supplier(form) => {
                self.resolver.on_postal_code_blur(form);
            }
            _ => {}
        }
    }

    /// Validate and submit the open form
    async fn save_form(&mut self) {
        if self.state.form.active_field_name() == Some("cep") {
            self.start_cep_lookup();
        }

        let submitted: Result<&'static str, ApiError> = match &mut self.state.form {
            FormState::None => return,
            FormState::Client(form) => {
                let payload = form.to_payload();
                let errors = validate_client(&payload);
                if !errors.is_empty() {
                    form.fields.set_errors(errors);
                    return;
                }
                form.fields.errors.clear();
                match &form.mode {
                    FormMode::Create => self
                        .api
                        .create_client(&payload)
                        .await
                        .map(|_| "Cliente cadastrado!"),
                    FormMode::Edit(id) => self
                        .api
                        .update_client(id, &payload)
                        .await
                        .map(|_| "Cliente atualizado!"),
                }
            }
            FormState::Supplier(form) => {
                let payload = form.to_payload();
                let errors = validate_supplier(&payload);
                if !errors.is_empty() {
                    form.fields.set_errors(errors);
                    return;
                }
                form.fields.errors.clear();
                match &form.mode {
                    FormMode::Create => self
                        .api
                        .create_supplier(&payload)
                        .await
                        .map(|_| "Fornecedor cadastrado!"),
                    FormMode::Edit(id) => self
                        .api
                        .update_supplier(id, &payload)
                        .await
                        .map(|_| "Fornecedor atualizado!"),
                }
            }
            FormState::Product(form) => {
                let payload = form.to_payload();
                let errors = validate_product(&payload);
                if !errors.is_empty() {
                    form.fields.set_errors(errors);
                    return;
                }
                form.fields.errors.clear();
                match &form.mode {
                    FormMode::Create => self
                        .api
                        .create_product(&payload)
                        .await
                        .map(|_| "Produto cadastrado!"),
                    FormMode::Edit(id) => self
                        .api
                        .update_product(id, &payload)
                        .await
                        .map(|_| "Produto atualizado!"),
                }
            }
        };

        match submitted {
            Ok(message) => {
                info!("{message}");
                self.state.clear_form();
                self.resolver.reset();
                self.go_back();
                self.reload_list().await;
                self.status_message = Some(message.to_string());
            }
            Err(e) => {
                error!("Failed to save form: {e}");
                let title = if self.state.form.mode().is_some_and(FormMode::is_edit) {
                    "Erro na atualização"
                } else {
                    "Erro no cadastro"
                };
                self.push_error(format!("{title}: {e}"));
            }
        }
    }

    /// Open the file prompt for the supplier logo or product image
    fn request_upload(&mut self) {
        let (id, create_message) = match &self.state.form {
            FormState::Supplier(form) => (
                form.mode.id().map(str::to_string),
                "Cadastre o fornecedor para poder adicionar uma logo",
            ),
            FormState::Product(form) => (
                form.mode.id().map(str::to_string),
                "Cadastre o produto para poder adicionar uma imagem",
            ),
            _ => return,
        };

        match id {
            Some(id) => {
                self.state.pending_upload = Some(PendingUpload::new(self.state.current_view, id))
            }
            None => self.push_error(create_message),
        }
    }

    /// Handle keys while the upload prompt is open
    async fn handle_upload_dialog_key(&mut self, key: KeyEvent) {
        let Some(pending) = &mut self.state.pending_upload else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.pending_upload = None,
            KeyCode::Enter => self.upload_pending().await,
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                pending.path.insert_char(c)
            }
            KeyCode::Backspace => pending.path.backspace(),
            KeyCode::Left => pending.path.cursor_left(),
            KeyCode::Right => pending.path.cursor_right(),
            KeyCode::Home => pending.path.cursor_home(),
            KeyCode::End => pending.path.cursor_end(),
            _ => {}
        }
    }

    async fn upload_pending(&mut self) {
        let Some(pending) = self.state.pending_upload.take() else {
            return;
        };
        let path = pending.path.as_text().trim().to_string();
        if path.is_empty() {
            self.state.pending_upload = Some(pending);
            return;
        }
        let file = Path::new(&path);

        let uploaded = match pending.view {
            View::SupplierForm => self
                .api
                .upload_supplier_logo(&pending.id, file)
                .await
                .map(|supplier| {
                    if let Some(row) = self.state.suppliers.iter_mut().find(|s| s.id == supplier.id)
                    {
                        *row = supplier;
                    }
                    "Logo atualizado!"
                }),
            View::ProductForm => self
                .api
                .upload_product_image(&pending.id, file)
                .await
                .map(|product| {
                    if let Some(row) = self.state.products.iter_mut().find(|p| p.id == product.id) {
                        *row = product;
                    }
                    "Imagem atualizada!"
                }),
            _ => return,
        };

        match uploaded {
            Ok(message) => {
                info!("Uploaded {path} for {}", pending.id);
                self.status_message = Some(message.to_string());
            }
            Err(e) => {
                error!("Failed to upload {path}: {e}");
                self.push_error(format!("Falha ao enviar arquivo: {e}"));
            }
        }
    }

    /// Ask for confirmation before deleting the selected row
    fn request_delete(&mut self, view: View) {
        let pending = match view {
            View::Clients => self
                .state
                .selected_client()
                .map(|c| PendingDelete::new(view, &c.id, &c.name)),
            View::Suppliers => self
                .state
                .selected_supplier()
                .map(|s| PendingDelete::new(view, &s.id, &s.name_social_reason)),
            View::Products => self
                .state
                .selected_product()
                .map(|p| PendingDelete::new(view, &p.id, &p.name)),
            _ => None,
        };
        self.state.pending_delete = pending;
    }

    /// Handle keys while the delete confirmation is open
    async fn handle_delete_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                if let Some(pending) = &mut self.state.pending_delete {
                    pending.toggle_option();
                }
            }
            KeyCode::Char('y') => self.delete_pending().await,
            KeyCode::Enter => {
                if self
                    .state
                    .pending_delete
                    .as_ref()
                    .is_some_and(PendingDelete::is_confirmed)
                {
                    self.delete_pending().await;
                } else {
                    self.state.pending_delete = None;
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => self.state.pending_delete = None,
            _ => {}
        }
    }

    async fn delete_pending(&mut self) {
        let Some(pending) = self.state.pending_delete.take() else {
            return;
        };

        let (result, done, failed) = match pending.view {
            View::Clients => (
                self.api.delete_client(&pending.id).await,
                "Cliente apagado!",
                "Falha ao apagar cliente",
            ),
            View::Suppliers => (
                self.api.delete_supplier(&pending.id).await,
                "Fornecedor apagado!",
                "Falha ao apagar fornecedor",
            ),
            View::Products => (
                self.api.delete_product(&pending.id).await,
                "Produto apagado!",
                "Falha ao apagar produto",
            ),
            _ => return,
        };

        match result {
            Ok(()) => {
                info!("Deleted {} ({})", pending.label, pending.id);
                self.reload_list().await;
                self.status_message = Some(done.to_string());
            }
            Err(e) => {
                error!("Failed to delete {}: {e}", pending.id);
                self.push_error(format!("{failed}: {e}"));
            }
        }
    }

    /// Flip the selected supplier between active and inactive
    async fn toggle_supplier(&mut self) {
        let Some(id) = self.state.selected_supplier().map(|s| s.id.clone()) else {
            return;
        };

        match self.api.toggle_supplier_status(&id).await {
            Ok(()) => {
                if let Some(supplier) = self.state.suppliers.iter_mut().find(|s| s.id == id) {
                    supplier.active = !supplier.active;
                    self.status_message = Some(
                        if supplier.active {
                            "Fornecedor ativado"
                        } else {
                            "Fornecedor desativado"
                        }
                        .to_string(),
                    );
                }
            }
            Err(e) => {
                error!("Failed to toggle supplier {id}: {e}");
                self.push_error(format!("Falha ao alterar status do fornecedor: {e}"));
            }
        }
    }

    /// Copy the selected row's document or code
    fn copy_selected(&mut self, view: View) {
        let text = match view {
            View::Clients => self.state.selected_client().map(|c| c.document.clone()),
            View::Suppliers => self.state.selected_supplier().map(|s| s.cnpj.clone()),
            View::Products => self.state.selected_product().map(|p| p.code.clone()),
            _ => None,
        };
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            self.status_message = Some("Nada para copiar".to_string());
            return;
        };

        match self.copy_to_clipboard(&text) {
            Ok(()) => self.status_message = Some(format!("Copiado: {text}")),
            Err(e) => {
                warn!("Clipboard unavailable: {e}");
                self.push_error(format!("Falha ao copiar: {e}"));
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
