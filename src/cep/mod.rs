//! Postal-code (CEP) lookup and address autofill
//!
//! `BrasilApiClient` talks to the lookup service and `AddressResolver` feeds
//! its answers back into whichever address form is open.

mod client;
mod resolver;
mod traits;

pub use client::{BrasilApiClient, DEFAULT_BASE_URL};
pub use resolver::{AddressForm, AddressResolver, LookupState};
pub use traits::CepLookup;

#[cfg(test)]
pub use client::{AddressLookupResult, CepError};
#[cfg(test)]
pub use traits::MockCepLookup;
