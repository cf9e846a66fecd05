//! Application state module

mod app_state;
mod entities;
mod forms;

pub use app_state::*;
pub(crate) use entities::null_as_empty;
pub use entities::{
    City, Client, ClientPayload, LookupItem, LookupKind, Product, ProductPayload, Supplier,
    SupplierPayload, MEASURE_UNITS,
};
#[cfg(test)]
pub use entities::CityState;
pub use forms::*;
