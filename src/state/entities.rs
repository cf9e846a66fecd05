//! Entities exchanged with the REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat a JSON `null` string as empty
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Federative unit a city belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityState {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

/// City record from `/city`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<CityState>,
}

impl City {
    /// "São Paulo/SP", or just the name when the state is unknown
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}/{}", self.name, state.abbreviation),
            None => self.name.clone(),
        }
    }
}

/// Brand, model, category or manufacturer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupItem {
    pub id: String,
    pub name: String,
}

/// Lookup tables the product form selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Brand,
    Model,
    Category,
    Manufacturer,
}

impl LookupKind {
    pub const ALL: [LookupKind; 4] = [
        LookupKind::Brand,
        LookupKind::Model,
        LookupKind::Category,
        LookupKind::Manufacturer,
    ];

    /// REST collection path
    pub fn path(self) -> &'static str {
        match self {
            Self::Brand => "/brand",
            Self::Model => "/model",
            Self::Category => "/category",
            Self::Manufacturer => "/manufacturer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Brand => "Marca",
            Self::Model => "Modelo",
            Self::Category => "Categoria",
            Self::Manufacturer => "Fabricante",
        }
    }
}

/// Units a product can be measured in
pub const MEASURE_UNITS: &[(&str, &str)] = &[
    ("UN", "Unidade"),
    ("T", "Tonelada"),
    ("KG", "Quilograma"),
    ("G", "Grama"),
    ("MG", "Miligrama"),
    ("V", "Volume"),
    ("L", "Litro"),
    ("ML", "Mililitro"),
    ("KM", "Quilometro"),
    ("M", "Metro"),
    ("CM", "Centimetro"),
    ("DM", "Decimetro"),
    ("MM", "Milimetro"),
];

/// Client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub document: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tel: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tel2: String,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub complement: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Supplier record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name_social_reason: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name_fantasy: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cnpj: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tel: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tel2: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub domain: String,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub complement: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub representative_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mail2: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
    #[serde(default)]
    pub active: bool,
    /// Public address of the uploaded logo
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub manufacturer_id: Option<String>,
    #[serde(default)]
    pub brand: Option<LookupItem>,
    #[serde(default)]
    pub model: Option<LookupItem>,
    #[serde(default)]
    pub category: Option<LookupItem>,
    #[serde(default)]
    pub manufacturer: Option<LookupItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measure_unit: String,
    /// Public address of the uploaded image
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body sent when creating or updating a client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientPayload {
    pub name: String,
    pub document: String,
    pub tel: String,
    pub tel2: String,
    pub city_id: Option<String>,
    pub neighborhood: String,
    pub street: String,
    pub cep: String,
    pub number: String,
    pub complement: String,
    pub mail: String,
    pub note: String,
}

/// Body sent when creating or updating a supplier
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierPayload {
    pub name_social_reason: String,
    pub name_fantasy: String,
    pub cnpj: String,
    pub tel: String,
    pub tel2: String,
    pub domain: String,
    pub city_id: Option<String>,
    pub neighborhood: String,
    pub street: String,
    pub cep: String,
    pub number: String,
    pub complement: String,
    pub representative_name: String,
    pub mail: String,
    pub mail2: String,
    pub note: String,
}

/// Body sent when creating or updating a product.
///
/// A `new_*` name asks the server to create that lookup entry; the matching
/// `*_id` is then `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPayload {
    pub code: String,
    pub name: String,
    pub description: String,
    pub measure_unit: String,
    pub brand_id: Option<String>,
    pub new_brand: Option<String>,
    pub model_id: Option<String>,
    pub new_model: Option<String>,
    pub category_id: Option<String>,
    pub new_category: Option<String>,
    pub manufacturer_id: Option<String>,
    pub new_manufacturer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_deserializes_nulls_as_empty() {
        let json = r#"{
            "id": "c1",
            "name": "Maria",
            "document": "123.456.789-01",
            "tel": null,
            "city_id": "sp",
            "city": {"id": "sp", "name": "São Paulo", "state": {"id": "1", "name": "São Paulo", "abbreviation": "SP"}},
            "created_at": "2021-03-01T12:00:00.000Z"
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.tel, "");
        assert_eq!(client.street, "");
        assert_eq!(client.city_id.as_deref(), Some("sp"));
        assert_eq!(client.city.unwrap().display_name(), "São Paulo/SP");
        assert!(client.created_at.is_some());
    }

    #[test]
    fn test_supplier_active_defaults_to_false() {
        let json = r#"{"id": "s1", "name_social_reason": "ACME LTDA"}"#;
        let supplier: Supplier = serde_json::from_str(json).unwrap();
        assert!(!supplier.active);
        assert_eq!(supplier.cnpj, "");
    }

    #[test]
    fn test_product_payload_serializes_new_lookups() {
        let payload = ProductPayload {
            code: "AB123".to_string(),
            new_brand: Some("Nova".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["new_brand"], "Nova");
        assert!(value["brand_id"].is_null());
    }

    #[test]
    fn test_city_display_without_state() {
        let city = City {
            id: "1".to_string(),
            name: "Campinas".to_string(),
            state: None,
        };
        assert_eq!(city.display_name(), "Campinas");
    }

    #[test]
    fn test_lookup_paths() {
        let paths: Vec<_> = LookupKind::ALL.iter().map(|k| k.path()).collect();
        assert_eq!(paths, ["/brand", "/model", "/category", "/manufacturer"]);
    }
}
