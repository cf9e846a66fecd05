//! Form state management and form structs

use super::field::{FormField, SelectOption};
use crate::cep::AddressForm;
use crate::mask::MaskKind;
use crate::state::{
    City, Client, ClientPayload, LookupItem, LookupKind, LookupTables, Product, ProductPayload,
    Supplier, SupplierPayload, MEASURE_UNITS,
};
use crate::validation::FieldErrors;

/// Whether a form creates a new record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(String),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    /// Id of the record being edited
    pub fn id(&self) -> Option<&str> {
        match self {
            FormMode::Edit(id) => Some(id),
            FormMode::Create => None,
        }
    }
}

/// Ordered fields of a form plus focus and validation errors
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    pub fields: Vec<FormField>,
    pub active: usize,
    pub errors: FieldErrors,
}

impl FieldSet {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            active: 0,
            errors: FieldErrors::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Text of a field, empty when the field does not exist
    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FormField::as_text).unwrap_or("")
    }

    pub fn set_text(&mut self, name: &str, value: &str) {
        if let Some(field) = self.get_mut(name) {
            field.set_text(value);
        }
    }

    pub fn selected_value(&self, name: &str) -> Option<String> {
        self.get(name).and_then(FormField::selected_value)
    }

    pub fn typed_value(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(FormField::typed_value)
            .map(str::to_string)
    }

    pub fn select(&mut self, name: &str, value: Option<&str>) {
        if let Some(field) = self.get_mut(name) {
            field.select_value(value);
        }
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Replace the validation errors and focus the first failing field
    pub fn set_errors(&mut self, errors: FieldErrors) {
        if let Some(index) = self.fields.iter().position(|f| errors.contains_key(&f.name)) {
            self.active = index;
        }
        self.errors = errors;
    }
}

/// Trait for common form operations
pub trait Form {
    fn field_set(&self) -> &FieldSet;
    fn field_set_mut(&mut self) -> &mut FieldSet;

    fn field_count(&self) -> usize {
        self.field_set().fields.len()
    }
    fn active_field(&self) -> usize {
        self.field_set().active
    }
    fn set_active_field(&mut self, index: usize) {
        let last = self.field_count().saturating_sub(1);
        self.field_set_mut().active = index.min(last);
    }
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        let index = self.active_field();
        self.field_set_mut().fields.get_mut(index)
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.field_set().fields.get(index)
    }
}

fn city_options(cities: &[City]) -> Vec<SelectOption> {
    cities
        .iter()
        .map(|c| SelectOption::new(c.id.clone(), c.display_name()))
        .collect()
}

fn lookup_options(items: &[LookupItem]) -> Vec<SelectOption> {
    items
        .iter()
        .map(|i| SelectOption::new(i.id.clone(), i.name.clone()))
        .collect()
}

fn measure_options() -> Vec<SelectOption> {
    MEASURE_UNITS
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

/// Address block shared by the client and supplier forms
fn address_fields(cities: &[City]) -> Vec<FormField> {
    vec![
        FormField::masked("cep", "CEP", MaskKind::PostalCode),
        FormField::text("street", "Rua", false),
        FormField::text("number", "Número", false),
        FormField::text("complement", "Complemento", false),
        FormField::text("neighborhood", "Bairro", false),
        FormField::select("city_id", "Cidade", city_options(cities)),
    ]
}

fn set_address_text(fields: &mut FieldSet, street: &str, neighborhood: &str) {
    fields.set_text("street", street);
    fields.set_text("neighborhood", neighborhood);
}

fn clear_number_and_complement(fields: &mut FieldSet) {
    fields.set_text("number", "");
    fields.set_text("complement", "");
}

// Client Form
#[derive(Debug, Clone)]
pub struct ClientForm {
    pub mode: FormMode,
    pub fields: FieldSet,
}

impl ClientForm {
    pub fn new(cities: &[City]) -> Self {
        let mut fields = vec![
            FormField::text("name", "Nome", false),
            FormField::masked("document", "Documento (CPF/CNPJ)", MaskKind::TaxId),
            FormField::masked("tel", "Telefone Principal", MaskKind::Phone),
            FormField::masked("tel2", "Telefone Secundário", MaskKind::Phone),
            FormField::text("mail", "E-mail", false),
            FormField::text("note", "Anotação", true),
        ];
        fields.extend(address_fields(cities));
        Self {
            mode: FormMode::Create,
            fields: FieldSet::new(fields),
        }
    }

    pub fn from_client(client: &Client, cities: &[City]) -> Self {
        let mut form = Self::new(cities);
        form.mode = FormMode::Edit(client.id.clone());
        let f = &mut form.fields;
        f.set_text("name", &client.name);
        f.set_text("document", &client.document);
        f.set_text("tel", &client.tel);
        f.set_text("tel2", &client.tel2);
        f.set_text("mail", &client.mail);
        f.set_text("note", &client.note);
        f.set_text("cep", &client.cep);
        f.set_text("street", &client.street);
        f.set_text("number", &client.number);
        f.set_text("complement", &client.complement);
        f.set_text("neighborhood", &client.neighborhood);
        f.select("city_id", client.city_id.as_deref());
        form
    }

    pub fn to_payload(&self) -> ClientPayload {
        let f = &self.fields;
        ClientPayload {
            name: f.text("name").to_string(),
            document: f.text("document").to_string(),
            tel: f.text("tel").to_string(),
            tel2: f.text("tel2").to_string(),
            city_id: f.selected_value("city_id"),
            neighborhood: f.text("neighborhood").to_string(),
            street: f.text("street").to_string(),
            cep: f.text("cep").to_string(),
            number: f.text("number").to_string(),
            complement: f.text("complement").to_string(),
            mail: f.text("mail").to_string(),
            note: f.text("note").to_string(),
        }
    }
}

impl Form for ClientForm {
    fn field_set(&self) -> &FieldSet {
        &self.fields
    }
    fn field_set_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }
}

impl AddressForm for ClientForm {
    fn postal_code(&self) -> &str {
        self.fields.text("cep")
    }
    fn set_street(&mut self, street: &str) {
        self.fields.set_text("street", street);
    }
    fn set_neighborhood(&mut self, neighborhood: &str) {
        self.fields.set_text("neighborhood", neighborhood);
    }
    fn set_city(&mut self, city_id: Option<&str>) {
        self.fields.select("city_id", city_id);
    }
    fn clear_number_and_complement(&mut self) {
        clear_number_and_complement(&mut self.fields);
    }
}

// Supplier Form
#[derive(Debug, Clone)]
pub struct SupplierForm {
    pub mode: FormMode,
    pub fields: FieldSet,
}

impl SupplierForm {
    pub fn new(cities: &[City]) -> Self {
        let mut fields = vec![
            FormField::text("name_social_reason", "Razão Social", false),
            FormField::text("name_fantasy", "Nome Fantasia", false),
            FormField::text("domain", "Site", false),
            FormField::masked("cnpj", "CNPJ", MaskKind::TaxId),
        ];
        fields.extend(address_fields(cities));
        fields.extend([
            FormField::text("representative_name", "Nome do Representante", false),
            FormField::text("mail", "E-mail Representante", false),
            FormField::text("mail2", "E-mail Secundário", false),
            FormField::masked("tel", "Telefone Principal", MaskKind::Phone),
            FormField::masked("tel2", "Telefone Secundário", MaskKind::Phone),
            FormField::text("note", "Anotação", true),
        ]);
        Self {
            mode: FormMode::Create,
            fields: FieldSet::new(fields),
        }
    }

    pub fn from_supplier(supplier: &Supplier, cities: &[City]) -> Self {
        let mut form = Self::new(cities);
        form.mode = FormMode::Edit(supplier.id.clone());
        let f = &mut form.fields;
        f.set_text("name_social_reason", &supplier.name_social_reason);
        f.set_text("name_fantasy", &supplier.name_fantasy);
        f.set_text("domain", &supplier.domain);
        f.set_text("cnpj", &supplier.cnpj);
        f.set_text("cep", &supplier.cep);
        set_address_text(f, &supplier.street, &supplier.neighborhood);
        f.set_text("number", &supplier.number);
        f.set_text("complement", &supplier.complement);
        f.select("city_id", supplier.city_id.as_deref());
        f.set_text("representative_name", &supplier.representative_name);
        f.set_text("mail", &supplier.mail);
        f.set_text("mail2", &supplier.mail2);
        f.set_text("tel", &supplier.tel);
        f.set_text("tel2", &supplier.tel2);
        f.set_text("note", &supplier.note);
        form
    }

    pub fn to_payload(&self) -> SupplierPayload {
        let f = &self.fields;
        SupplierPayload {
            name_social_reason: f.text("name_social_reason").to_string(),
            name_fantasy: f.text("name_fantasy").to_string(),
            cnpj: f.text("cnpj").to_string(),
            tel: f.text("tel").to_string(),
            tel2: f.text("tel2").to_string(),
            domain: f.text("domain").to_string(),
            city_id: f.selected_value("city_id"),
            neighborhood: f.text("neighborhood").to_string(),
            street: f.text("street").to_string(),
            cep: f.text("cep").to_string(),
            number: f.text("number").to_string(),
            complement: f.text("complement").to_string(),
            representative_name: f.text("representative_name").to_string(),
            mail: f.text("mail").to_string(),
            mail2: f.text("mail2").to_string(),
            note: f.text("note").to_string(),
        }
    }
}

impl Form for SupplierForm {
    fn field_set(&self) -> &FieldSet {
        &self.fields
    }
    fn field_set_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }
}

impl AddressForm for SupplierForm {
    fn postal_code(&self) -> &str {
        self.fields.text("cep")
    }
    fn set_street(&mut self, street: &str) {
        self.fields.set_text("street", street);
    }
    fn set_neighborhood(&mut self, neighborhood: &str) {
        self.fields.set_text("neighborhood", neighborhood);
    }
    fn set_city(&mut self, city_id: Option<&str>) {
        self.fields.select("city_id", city_id);
    }
    fn clear_number_and_complement(&mut self) {
        clear_number_and_complement(&mut self.fields);
    }
}

/// Form field holding the id of a lookup kind
pub fn lookup_field_name(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Brand => "brand_id",
        LookupKind::Model => "model_id",
        LookupKind::Category => "category_id",
        LookupKind::Manufacturer => "manufacturer_id",
    }
}

// Product Form
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub mode: FormMode,
    pub fields: FieldSet,
}

impl ProductForm {
    pub fn new(lookups: &LookupTables) -> Self {
        let mut fields = vec![
            FormField::text("code", "Código", false),
            FormField::text("name", "Nome", false),
            FormField::text("description", "Descrição", false),
            FormField::select("measure_unit", "Unidade de Medida", measure_options()),
        ];
        fields.extend(LookupKind::ALL.iter().map(|&kind| {
            FormField::creatable_select(
                lookup_field_name(kind),
                kind.label(),
                lookup_options(lookups.get(kind)),
            )
        }));
        Self {
            mode: FormMode::Create,
            fields: FieldSet::new(fields),
        }
    }

    pub fn from_product(product: &Product, lookups: &LookupTables) -> Self {
        let mut form = Self::new(lookups);
        form.mode = FormMode::Edit(product.id.clone());
        let f = &mut form.fields;
        f.set_text("code", &product.code);
        f.set_text("name", &product.name);
        f.set_text("description", &product.description);
        f.select("measure_unit", Some(product.measure_unit.as_str()));
        f.select("brand_id", product.brand_id.as_deref());
        f.select("model_id", product.model_id.as_deref());
        f.select("category_id", product.category_id.as_deref());
        f.select("manufacturer_id", product.manufacturer_id.as_deref());
        form
    }

    /// Refresh the options of a lookup selector, keeping the selection
    pub fn set_lookup_options(&mut self, kind: LookupKind, items: &[LookupItem]) {
        if let Some(field) = self.fields.get_mut(lookup_field_name(kind)) {
            field.set_options(lookup_options(items));
        }
    }

    pub fn to_payload(&self) -> ProductPayload {
        let f = &self.fields;
        ProductPayload {
            code: f.text("code").to_string(),
            name: f.text("name").to_string(),
            description: f.text("description").to_string(),
            measure_unit: f.selected_value("measure_unit").unwrap_or_default(),
            brand_id: f.selected_value("brand_id"),
            new_brand: f.typed_value("brand_id"),
            model_id: f.selected_value("model_id"),
            new_model: f.typed_value("model_id"),
            category_id: f.selected_value("category_id"),
            new_category: f.typed_value("category_id"),
            manufacturer_id: f.selected_value("manufacturer_id"),
            new_manufacturer: f.typed_value("manufacturer_id"),
        }
    }
}

impl Form for ProductForm {
    fn field_set(&self) -> &FieldSet {
        &self.fields
    }
    fn field_set_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }
}

/// Enum representing all possible form states
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Client(ClientForm),
    Supplier(SupplierForm),
    Product(ProductForm),
}

impl FormState {
    pub fn as_form(&self) -> Option<&dyn Form> {
        match self {
            FormState::None => None,
            FormState::Client(f) => Some(f),
            FormState::Supplier(f) => Some(f),
            FormState::Product(f) => Some(f),
        }
    }

    pub fn as_form_mut(&mut self) -> Option<&mut dyn Form> {
        match self {
            FormState::None => None,
            FormState::Client(f) => Some(f),
            FormState::Supplier(f) => Some(f),
            FormState::Product(f) => Some(f),
        }
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match self {
            FormState::None => None,
            FormState::Client(f) => Some(&f.mode),
            FormState::Supplier(f) => Some(&f.mode),
            FormState::Product(f) => Some(&f.mode),
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.as_form_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.as_form_mut() {
            form.prev_field();
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.as_form_mut().and_then(|f| f.get_active_field_mut())
    }

    /// Name of the focused field
    pub fn active_field_name(&self) -> Option<&str> {
        let form = self.as_form()?;
        form.get_field(form.active_field()).map(|f| f.name.as_str())
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.as_form().is_some_and(|f| {
            f.get_field(f.active_field())
                .is_some_and(|field| field.is_multiline)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CityState;
    use pretty_assertions::assert_eq;

    fn cities() -> Vec<City> {
        vec![
            City {
                id: "1".to_string(),
                name: "Campinas".to_string(),
                state: None,
            },
            City {
                id: "2".to_string(),
                name: "São Paulo".to_string(),
                state: Some(CityState {
                    id: "35".to_string(),
                    name: "São Paulo".to_string(),
                    abbreviation: "SP".to_string(),
                }),
            },
        ]
    }

    fn lookups() -> LookupTables {
        let mut tables = LookupTables::default();
        tables.set(
            LookupKind::Brand,
            vec![LookupItem {
                id: "b1".to_string(),
                name: "Gerdau".to_string(),
            }],
        );
        tables
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_field_wraps() {
            let mut form = ProductForm::new(&lookups());
            let count = form.field_count();
            form.set_active_field(count - 1);
            form.next_field();
            assert_eq!(form.active_field(), 0);
            form.prev_field();
            assert_eq!(form.active_field(), count - 1);
        }

        #[test]
        fn test_mode_id() {
            assert_eq!(FormMode::Edit("p1".to_string()).id(), Some("p1"));
            assert_eq!(FormMode::Create.id(), None);
        }

        #[test]
        fn test_form_state_reports_active_field() {
            let mut state = FormState::Client(ClientForm::new(&cities()));
            assert_eq!(state.active_field_name(), Some("name"));
            state.prev_field();
            assert_eq!(state.active_field_name(), Some("city_id"));
            assert!(!state.is_active_field_multiline());
            assert!(FormState::None.active_field_name().is_none());
        }

        #[test]
        fn test_set_errors_focuses_first_failing_field() {
            let mut form = ClientForm::new(&cities());
            form.set_active_field(5);
            let mut errors = FieldErrors::new();
            errors.insert("cep".to_string(), "Tamanho inválido".to_string());
            errors.insert("document".to_string(), "Documento obrigatório".to_string());
            form.fields.set_errors(errors);
            assert_eq!(form.active_field(), 1);
            assert_eq!(form.fields.error("cep"), Some("Tamanho inválido"));
        }
    }

    mod client {
        use super::*;
        use pretty_assertions::assert_eq;

        fn client() -> Client {
            serde_json::from_value(serde_json::json!({
                "id": "c1",
                "name": "Maria",
                "document": "12345678901",
                "tel": "11987654321",
                "city_id": "2",
                "cep": "01310100",
                "street": "Avenida Paulista",
                "number": "1000"
            }))
            .unwrap()
        }

        #[test]
        fn test_edit_form_masks_stored_values() {
            let form = ClientForm::from_client(&client(), &cities());
            assert_eq!(form.mode, FormMode::Edit("c1".to_string()));
            assert_eq!(form.fields.text("document"), "123.456.789-01");
            assert_eq!(form.fields.text("tel"), "(11) 98765-4321");
            assert_eq!(form.fields.text("cep"), "01310-100");
            assert_eq!(
                form.fields.get("city_id").unwrap().display_value(),
                "São Paulo/SP"
            );
        }

        #[test]
        fn test_payload_carries_selected_city() {
            let payload = ClientForm::from_client(&client(), &cities()).to_payload();
            assert_eq!(payload.city_id.as_deref(), Some("2"));
            assert_eq!(payload.number, "1000");
            assert_eq!(payload.name, "Maria");
        }

        #[test]
        fn test_address_form_updates_fields() {
            let mut form = ClientForm::from_client(&client(), &cities());
            form.set_street("Rua Nova");
            form.set_neighborhood("Centro");
            form.set_city(Some("1"));
            form.clear_number_and_complement();

            let payload = form.to_payload();
            assert_eq!(payload.street, "Rua Nova");
            assert_eq!(payload.neighborhood, "Centro");
            assert_eq!(payload.city_id.as_deref(), Some("1"));
            assert_eq!(payload.number, "");
            assert_eq!(form.postal_code(), "01310-100");
        }
    }

    mod supplier {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_form_is_empty_create() {
            let form = SupplierForm::new(&cities());
            assert_eq!(form.mode, FormMode::Create);
            assert_eq!(form.to_payload(), SupplierPayload::default());
        }

        #[test]
        fn test_clearing_city() {
            let mut form = SupplierForm::new(&cities());
            form.set_city(Some("2"));
            assert_eq!(form.to_payload().city_id.as_deref(), Some("2"));
            form.set_city(None);
            assert!(form.to_payload().city_id.is_none());
        }
    }

    mod product {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_payload_splits_selected_and_typed_lookups() {
            let mut form = ProductForm::new(&lookups());
            form.fields.select("brand_id", Some("b1"));
            form.fields.select("measure_unit", Some("KG"));
            let model = form.fields.get_mut("model_id").unwrap();
            for c in "M8".chars() {
                model.insert_char(c);
            }

            let payload = form.to_payload();
            assert_eq!(payload.brand_id.as_deref(), Some("b1"));
            assert!(payload.new_brand.is_none());
            assert!(payload.model_id.is_none());
            assert_eq!(payload.new_model.as_deref(), Some("M8"));
            assert_eq!(payload.measure_unit, "KG");
        }

        #[test]
        fn test_refreshed_options_keep_selection() {
            let mut form = ProductForm::new(&lookups());
            form.fields.select("brand_id", Some("b1"));
            form.set_lookup_options(
                LookupKind::Brand,
                &[
                    LookupItem {
                        id: "b0".to_string(),
                        name: "Aço Forte".to_string(),
                    },
                    LookupItem {
                        id: "b1".to_string(),
                        name: "Gerdau".to_string(),
                    },
                ],
            );
            assert_eq!(form.fields.selected_value("brand_id").as_deref(), Some("b1"));
        }
    }
}
