//! Address autofill driven by CEP lookups
//!
//! When the postal-code field loses focus the resolver spawns one lookup and
//! returns immediately. The outcome comes back through a channel that the
//! event loop drains; `apply` then writes street, neighborhood and city into
//! the open form. Lookups are never cancelled, so a late answer for an older
//! CEP of the same form still overwrites the fields. Every `reset` starts a
//! new form generation, and answers from older generations are discarded.

use super::client::{AddressLookupResult, CepError};
use super::traits::CepLookup;
use crate::mask;
use crate::state::City;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Form fields the resolver reads and writes
pub trait AddressForm {
    /// Current postal-code text, as displayed
    fn postal_code(&self) -> &str;
    fn set_street(&mut self, street: &str);
    fn set_neighborhood(&mut self, neighborhood: &str);
    /// Select a city by id, or clear the selector
    fn set_city(&mut self, city_id: Option<&str>);
    fn clear_number_and_complement(&mut self);
}

/// Find the city whose name is exactly `name`
pub fn find_city<'a>(cities: &'a [City], name: &str) -> Option<&'a City> {
    cities.iter().find(|c| c.name == name)
}

/// Lookup lifecycle for the open form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Pending { cep: String },
    Resolved { cep: String },
    Failed { cep: String },
}

/// Result of one lookup, tagged with the CEP that was requested
#[derive(Debug)]
pub struct LookupOutcome {
    pub cep: String,
    /// Form generation the lookup was started for
    pub generation: u64,
    pub result: Result<AddressLookupResult, CepError>,
}

/// Spawns CEP lookups and applies their outcome to address forms
pub struct AddressResolver {
    lookup: Arc<dyn CepLookup>,
    tx: UnboundedSender<LookupOutcome>,
    rx: UnboundedReceiver<LookupOutcome>,
    state: LookupState,
    generation: u64,
}

impl AddressResolver {
    pub fn new(lookup: Arc<dyn CepLookup>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            tx,
            rx,
            state: LookupState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LookupState::Pending { .. })
    }

    /// Forget the lookup state when a form is opened or closed.
    ///
    /// Lookups still in flight belong to the previous form and are ignored
    /// when they arrive.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = LookupState::Idle;
    }

    fn is_current(&self, outcome: &LookupOutcome) -> bool {
        outcome.generation == self.generation
    }

    /// Whether the state still waits on a lookup for a CEP other than `cep`
    fn awaits_other(&self, cep: &str) -> bool {
        matches!(&self.state, LookupState::Pending { cep: pending } if pending != cep)
    }

    /// Drop an outcome that has no form to go to
    pub fn discard(&mut self, outcome: LookupOutcome) {
        debug!("Dropping CEP {} outcome: no address form open", outcome.cep);
        if self.is_current(&outcome) && !self.awaits_other(&outcome.cep) {
            self.state = LookupState::Idle;
        }
    }

    /// Handle the postal-code field losing focus.
    ///
    /// Spawns a single lookup when the field is non-empty and returns whether
    /// one was started. Must be called from within a tokio runtime.
    pub fn on_postal_code_blur(&mut self, form: &impl AddressForm) -> bool {
        let cep = mask::digits_only(form.postal_code());
        if cep.is_empty() {
            return false;
        }

        debug!("Starting CEP lookup for {cep}");
        self.state = LookupState::Pending { cep: cep.clone() };

        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = lookup.lookup(&cep).await;
            // The receiver lives as long as the resolver; a send error only
            // means the app is shutting down.
            let _ = tx.send(LookupOutcome {
                cep,
                generation,
                result,
            });
        });
        true
    }

    /// Next finished lookup, if any, without waiting
    pub fn try_recv(&mut self) -> Option<LookupOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished lookup
    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<LookupOutcome> {
        self.rx.recv().await
    }

    /// Write a lookup outcome into `form`, unless it was started for an
    /// earlier form. Returns whether the form was touched.
    pub fn apply(
        &mut self,
        form: &mut impl AddressForm,
        cities: &[City],
        outcome: LookupOutcome,
    ) -> bool {
        if !self.is_current(&outcome) {
            debug!("Ignoring CEP {} outcome from a closed form", outcome.cep);
            return false;
        }

        // An older answer still fills the fields, but only the answer for the
        // CEP being looked up ends the pending state.
        let settles = !self.awaits_other(&outcome.cep);
        match outcome.result {
            Ok(address) => {
                let city = find_city(cities, &address.city);
                info!(
                    "CEP {} resolved to {} ({})",
                    outcome.cep,
                    address.city,
                    if city.is_some() { "city matched" } else { "no matching city" }
                );
                form.set_street(&address.street);
                form.set_neighborhood(&address.neighborhood);
                form.set_city(city.map(|c| c.id.as_str()));
                form.clear_number_and_complement();
                if settles {
                    self.state = LookupState::Resolved { cep: outcome.cep };
                }
            }
            Err(e) => {
                warn!("CEP lookup for {} failed: {e}", outcome.cep);
                form.set_city(None);
                if settles {
                    self.state = LookupState::Failed { cep: outcome.cep };
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::MockCepLookup;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct TestForm {
        cep: String,
        street: String,
        neighborhood: String,
        city_id: Option<String>,
        number: String,
        complement: String,
    }

    impl AddressForm for TestForm {
        fn postal_code(&self) -> &str {
            &self.cep
        }
        fn set_street(&mut self, street: &str) {
            self.street = street.to_string();
        }
        fn set_neighborhood(&mut self, neighborhood: &str) {
            self.neighborhood = neighborhood.to_string();
        }
        fn set_city(&mut self, city_id: Option<&str>) {
            self.city_id = city_id.map(str::to_string);
        }
        fn clear_number_and_complement(&mut self) {
            self.number.clear();
            self.complement.clear();
        }
    }

    fn city(id: &str, name: &str) -> City {
        City {
            id: id.to_string(),
            name: name.to_string(),
            state: None,
        }
    }

    fn cities() -> Vec<City> {
        vec![city("1", "Campinas"), city("2", "São Paulo")]
    }

    fn paulista() -> AddressLookupResult {
        AddressLookupResult {
            cep: "01310100".to_string(),
            state: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighborhood: "Bela Vista".to_string(),
            street: "Avenida Paulista".to_string(),
            service: "viacep".to_string(),
        }
    }

    fn filled_form() -> TestForm {
        TestForm {
            cep: "01310-100".to_string(),
            street: "Rua Antiga".to_string(),
            neighborhood: "Centro".to_string(),
            city_id: Some("1".to_string()),
            number: "42".to_string(),
            complement: "ap 3".to_string(),
        }
    }

    fn resolver_with(mock: MockCepLookup) -> AddressResolver {
        AddressResolver::new(Arc::new(mock))
    }

    #[test]
    fn test_find_city_exact_match() {
        let cities = cities();
        assert_eq!(find_city(&cities, "São Paulo").map(|c| c.id.as_str()), Some("2"));
        assert!(find_city(&cities, "Sao Paulo").is_none());
        assert!(find_city(&cities, "são paulo").is_none());
    }

    #[test]
    fn test_success_sets_street_neighborhood_and_city() {
        let mut resolver = resolver_with(MockCepLookup::new());
        let mut form = filled_form();

        resolver.apply(
            &mut form,
            &cities(),
            LookupOutcome {
                cep: "01310100".to_string(),
                generation: 0,
                result: Ok(paulista()),
            },
        );

        assert_eq!(form.street, "Avenida Paulista");
        assert_eq!(form.neighborhood, "Bela Vista");
        assert_eq!(form.city_id.as_deref(), Some("2"));
        assert_eq!(form.number, "");
        assert_eq!(form.complement, "");
        assert_eq!(
            resolver.state(),
            &LookupState::Resolved {
                cep: "01310100".to_string()
            }
        );
    }

    #[test]
    fn test_success_without_matching_city_clears_selector() {
        let mut resolver = resolver_with(MockCepLookup::new());
        let mut form = filled_form();

        resolver.apply(
            &mut form,
            &[city("1", "Campinas")],
            LookupOutcome {
                cep: "01310100".to_string(),
                generation: 0,
                result: Ok(paulista()),
            },
        );

        assert_eq!(form.street, "Avenida Paulista");
        assert!(form.city_id.is_none());
    }

    #[test]
    fn test_failure_keeps_street_and_clears_city() {
        let mut resolver = resolver_with(MockCepLookup::new());
        let mut form = filled_form();

        resolver.apply(
            &mut form,
            &cities(),
            LookupOutcome {
                cep: "99999999".to_string(),
                generation: 0,
                result: Err(CepError::NotFound("99999999".to_string())),
            },
        );

        assert_eq!(form.street, "Rua Antiga");
        assert_eq!(form.neighborhood, "Centro");
        assert_eq!(form.number, "42");
        assert!(form.city_id.is_none());
        assert!(matches!(resolver.state(), LookupState::Failed { .. }));
    }

    #[test]
    fn test_blur_on_empty_cep_does_nothing() {
        let mut mock = MockCepLookup::new();
        mock.expect_lookup().times(0);
        let mut resolver = resolver_with(mock);

        assert!(!resolver.on_postal_code_blur(&TestForm::default()));
        assert_eq!(resolver.state(), &LookupState::Idle);
        assert!(resolver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_blur_runs_one_lookup_with_clean_cep() {
        let mut mock = MockCepLookup::new();
        mock.expect_lookup()
            .withf(|cep| cep == "01310100")
            .times(1)
            .returning(|_| Ok(paulista()));
        let mut resolver = resolver_with(mock);
        let mut form = filled_form();

        assert!(resolver.on_postal_code_blur(&form));
        assert!(resolver.is_pending());

        let outcome = resolver.recv().await.unwrap();
        assert_eq!(outcome.cep, "01310100");
        resolver.apply(&mut form, &cities(), outcome);

        assert_eq!(form.city_id.as_deref(), Some("2"));
        assert!(!resolver.is_pending());
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_retried() {
        let mut mock = MockCepLookup::new();
        mock.expect_lookup()
            .times(1)
            .returning(|cep| Err(CepError::NotFound(cep.to_string())));
        let mut resolver = resolver_with(mock);
        let mut form = filled_form();

        resolver.on_postal_code_blur(&form);
        let outcome = resolver.recv().await.unwrap();
        resolver.apply(&mut form, &cities(), outcome);

        assert_eq!(form.street, "Rua Antiga");
        assert!(form.city_id.is_none());
        assert!(resolver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_stale_outcome_is_still_applied() {
        let mut mock = MockCepLookup::new();
        mock.expect_lookup().returning(|_| Ok(paulista()));
        let mut resolver = resolver_with(mock);
        let mut form = filled_form();

        resolver.on_postal_code_blur(&form);
        // User edits the CEP before the answer arrives
        form.cep = "13010-000".to_string();

        let outcome = resolver.recv().await.unwrap();
        resolver.apply(&mut form, &cities(), outcome);

        assert_eq!(form.street, "Avenida Paulista");
        assert_eq!(form.cep, "13010-000");
    }

    #[tokio::test]
    async fn test_outcome_from_closed_form_is_ignored() {
        let mut mock = MockCepLookup::new();
        mock.expect_lookup().returning(|_| Ok(paulista()));
        let mut resolver = resolver_with(mock);

        resolver.on_postal_code_blur(&filled_form());
        // Form closed and another one opened before the answer arrives
        resolver.reset();
        let mut next = TestForm {
            street: "Rua do Outro Cliente".to_string(),
            number: "77".to_string(),
            ..TestForm::default()
        };

        let outcome = resolver.recv().await.unwrap();
        assert!(!resolver.apply(&mut next, &cities(), outcome));

        assert_eq!(next.street, "Rua do Outro Cliente");
        assert_eq!(next.number, "77");
        assert!(next.city_id.is_none());
        assert_eq!(resolver.state(), &LookupState::Idle);
    }

    #[test]
    fn test_older_answer_keeps_newer_lookup_pending() {
        let mut resolver = resolver_with(MockCepLookup::new());
        resolver.state = LookupState::Pending {
            cep: "13010000".to_string(),
        };
        let mut form = filled_form();

        assert!(resolver.apply(
            &mut form,
            &cities(),
            LookupOutcome {
                cep: "01310100".to_string(),
                generation: 0,
                result: Ok(paulista()),
            },
        ));

        assert_eq!(form.street, "Avenida Paulista");
        assert_eq!(
            resolver.state(),
            &LookupState::Pending {
                cep: "13010000".to_string()
            }
        );
    }

    #[test]
    fn test_discard_settles_matching_lookup() {
        let mut resolver = resolver_with(MockCepLookup::new());
        resolver.state = LookupState::Pending {
            cep: "01310100".to_string(),
        };

        resolver.discard(LookupOutcome {
            cep: "01310100".to_string(),
            generation: 0,
            result: Ok(paulista()),
        });

        assert_eq!(resolver.state(), &LookupState::Idle);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut resolver = resolver_with(MockCepLookup::new());
        let mut form = filled_form();
        resolver.apply(
            &mut form,
            &cities(),
            LookupOutcome {
                cep: "1".to_string(),
                generation: 0,
                result: Err(CepError::InvalidCep("1".to_string())),
            },
        );
        resolver.reset();
        assert_eq!(resolver.state(), &LookupState::Idle);
    }
}
