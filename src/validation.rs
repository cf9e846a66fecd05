//! Submit-time validation of the entity forms
//!
//! Every rule runs; the first failure of each field is kept, keyed by the
//! form field name, so the form can show all of them at once.

use crate::state::{ClientPayload, ProductPayload, SupplierPayload};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Field name -> message
pub type FieldErrors = HashMap<String, String>;

static TAX_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^\d{3}\.\d{3}\.\d{3}-\d{2}$)|(^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$)")
        .expect("static tax id pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static e-mail pattern is valid")
});

const INVALID_LENGTH: &str = "Tamanho inválido";
const INVALID_EMAIL: &str = "Digite um e-mail válido";

#[derive(Default)]
struct Checker {
    errors: FieldErrors,
}

impl Checker {
    fn fail(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.is_empty() {
            self.fail(field, message);
        }
    }

    /// CPF or CNPJ, punctuation included
    fn tax_id(&mut self, field: &str, value: &str, required_message: &str) {
        let len = value.chars().count();
        if value.is_empty() {
            self.fail(field, required_message);
        } else if len < 14 {
            self.fail(field, "Mínimo 14 caracteres");
        } else if len > 18 {
            self.fail(field, "Máximo 18 caracteres");
        } else if len != 14 && len != 18 {
            self.fail(field, INVALID_LENGTH);
        } else if !TAX_ID.is_match(value) {
            self.fail(field, "Escreva o CNPJ/CPF com os pontos e virgulas");
        }
    }

    fn length_in(&mut self, field: &str, value: &str, allowed: &[usize]) {
        if !allowed.contains(&value.chars().count()) {
            self.fail(field, INVALID_LENGTH);
        }
    }

    fn phone(&mut self, field: &str, value: &str) {
        self.length_in(field, value, &[0, 14, 15]);
    }

    fn postal_code(&mut self, field: &str, value: &str) {
        self.length_in(field, value, &[0, 9]);
    }

    fn email(&mut self, field: &str, value: &str) {
        if !value.is_empty() && !EMAIL.is_match(value) {
            self.fail(field, INVALID_EMAIL);
        }
    }

    fn lookup(&mut self, field: &str, id: &Option<String>, new_name: &Option<String>) {
        if id.is_none() && new_name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            self.fail(field, "Campo obrigatório");
        }
    }
}

pub fn validate_client(payload: &ClientPayload) -> FieldErrors {
    let mut check = Checker::default();
    check.required("name", &payload.name, "Nome obrigatório");
    check.tax_id("document", &payload.document, "Documento obrigatório");
    check.phone("tel", &payload.tel);
    check.phone("tel2", &payload.tel2);
    check.postal_code("cep", &payload.cep);
    check.email("mail", &payload.mail);
    check.errors
}

pub fn validate_supplier(payload: &SupplierPayload) -> FieldErrors {
    let mut check = Checker::default();
    check.required(
        "name_social_reason",
        &payload.name_social_reason,
        "Razão Social obrigatório",
    );
    check.required(
        "name_fantasy",
        &payload.name_fantasy,
        "Nome Fantasia obrigatório",
    );
    check.tax_id("cnpj", &payload.cnpj, "CPF/CNPJ obrigatório");
    check.phone("tel", &payload.tel);
    check.phone("tel2", &payload.tel2);
    check.postal_code("cep", &payload.cep);
    check.email("mail", &payload.mail);
    check.email("mail2", &payload.mail2);
    check.errors
}

pub fn validate_product(payload: &ProductPayload) -> FieldErrors {
    let mut check = Checker::default();
    check.required("name", &payload.name, "Nome obrigatório");

    let code_len = payload.code.chars().count();
    if payload.code.is_empty() {
        check.fail("code", "Code obrigatório");
    } else if code_len < 5 {
        check.fail("code", "Mínimo 5 caracteres");
    } else if code_len > 5 {
        check.fail("code", "Maximo 5 caracteres");
    }

    check.required("description", &payload.description, "Descrição obrigatória");
    check.required("measure_unit", &payload.measure_unit, "Unidade obrigatória");
    check.lookup("brand_id", &payload.brand_id, &payload.new_brand);
    check.lookup("model_id", &payload.model_id, &payload.new_model);
    check.lookup("category_id", &payload.category_id, &payload.new_category);
    check.lookup(
        "manufacturer_id",
        &payload.manufacturer_id,
        &payload.new_manufacturer,
    );
    check.errors
}
