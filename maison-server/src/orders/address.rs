//! Address Normalizer
//!
//! Clients submit addresses in several historical shapes (`address` vs
//! `street`, `zip`/`zipCode`/`postalCode`, split first/last names). This
//! maps any of them onto the canonical [`Address`] record and fills the
//! name/phone gaps from the customer snapshot.

use serde::Deserialize;

use crate::db::models::{Address, CustomerInfo};

/// Loosely-shaped client address. Every field optional; aliases cover the
/// shapes older clients still send.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub name: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(alias = "address")]
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zip", alias = "zipCode", alias = "postalCode")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl AddressInput {
    /// Normalize into the canonical record. Missing fields become empty
    /// strings; completeness is the caller's check via
    /// [`Address::is_complete`].
    pub fn normalize(&self, customer: &CustomerInfo) -> Address {
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.joined_name())
            .unwrap_or_else(|| customer.name.clone());

        Address {
            name,
            street: self.street.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            zip_code: self.zip_code.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            phone: self.phone.clone().or_else(|| customer.phone.clone()),
        }
    }

    fn joined_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        if first.is_empty() && last.is_empty() {
            return None;
        }
        Some(format!("{first} {last}").trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("555-0100".to_string()),
        }
    }

    #[test]
    fn canonical_shape_passes_through() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "name": "Ada Lovelace",
            "street": "1 Analytical Way",
            "city": "London",
            "state": "LDN",
            "zip_code": "E1 6AN",
            "country": "UK"
        }))
        .unwrap();

        let address = input.normalize(&customer());
        assert!(address.is_complete());
        assert_eq!(address.street, "1 Analytical Way");
        assert_eq!(address.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn alternate_field_names_are_accepted() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "1 Analytical Way",
            "city": "London",
            "state": "LDN",
            "postalCode": "E1 6AN",
            "country": "UK"
        }))
        .unwrap();

        let address = input.normalize(&customer());
        assert!(address.is_complete());
        assert_eq!(address.name, "Ada Lovelace");
        assert_eq!(address.zip_code, "E1 6AN");
    }

    #[test]
    fn name_falls_back_to_customer_info() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "street": "1 Analytical Way",
            "city": "London",
            "state": "LDN",
            "zip": "E1 6AN",
            "country": "UK"
        }))
        .unwrap();

        let address = input.normalize(&customer());
        assert_eq!(address.name, "Ada Lovelace");
        assert!(address.is_complete());
    }

    #[test]
    fn missing_street_is_incomplete() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "city": "London",
            "state": "LDN",
            "zip": "E1 6AN",
            "country": "UK"
        }))
        .unwrap();

        let address = input.normalize(&customer());
        assert!(!address.is_complete());
    }

    #[test]
    fn whitespace_only_fields_are_incomplete() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "street": "   ",
            "city": "London",
            "state": "LDN",
            "zip": "E1 6AN",
            "country": "UK"
        }))
        .unwrap();

        assert!(!input.normalize(&customer()).is_complete());
    }
}
