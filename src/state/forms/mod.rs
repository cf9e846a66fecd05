//! Form domain layer
//!
//! Type-safe form handling for the create/edit views.

mod field;
mod form_state;

pub use field::{FieldValue, FormField};
pub use form_state::{ClientForm, Form, FormMode, FormState, ProductForm, SupplierForm};

#[cfg(test)]
pub use field::SelectOption;
