use crate::model::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Raised when a customer record would be persisted without its required fields.
///
/// This is the only error the UI is expected to show verbatim: it is produced
/// synchronously while building or editing a record, before the ledger file is
/// touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Customer name is required")]
    MissingName,

    #[error("Address is required")]
    MissingAddress,
}

/// Trims a cell value and flattens embedded line breaks.
///
/// Each `\n` and `\r` becomes a single space, so a wrapped spreadsheet cell reads
/// as one line. A `\r\n` pair therefore turns into two spaces.
pub fn normalize(value: &str) -> String {
    value.trim().replace(['\n', '\r'], " ")
}

/// A customer and their delivery address.
///
/// Every field is stored normalized. `name` and `address` are never blank;
/// deserialization goes through [`CustomerForm`] so the invariant also holds
/// for records received over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CustomerForm")]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub scheduled_delivery_time: String,
    pub apartment_no: String,
    pub address: String,
    pub suburb: String,
    pub postal_code: String,
}

impl Customer {
    pub fn new(
        phone: &str,
        name: &str,
        scheduled_delivery_time: &str,
        apartment_no: &str,
        address: &str,
        suburb: &str,
        postal_code: &str,
    ) -> Result<Self, ValidationError> {
        let customer = Customer {
            phone: normalize(phone),
            name: normalize(name),
            scheduled_delivery_time: normalize(scheduled_delivery_time),
            apartment_no: normalize(apartment_no),
            address: normalize(address),
            suburb: normalize(suburb),
            postal_code: normalize(postal_code),
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::MissingAddress);
        }
        Ok(())
    }

    /// Applies the fields set in `changes` and re-validates.
    ///
    /// The record is left untouched when the edited version would be invalid.
    pub fn update(&mut self, changes: CustomerForm) -> Result<(), ValidationError> {
        let mut edited = self.clone();
        for field in Field::ALL {
            if let Some(value) = changes.get(field) {
                edited.set(field, &normalize(value));
            }
        }
        edited.validate()?;
        *self = edited;
        Ok(())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Phone => &self.phone,
            Field::Name => &self.name,
            Field::ScheduledDelivery => &self.scheduled_delivery_time,
            Field::Apartment => &self.apartment_no,
            Field::Address => &self.address,
            Field::Suburb => &self.suburb,
            Field::PostalCode => &self.postal_code,
        }
    }

    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Phone => &mut self.phone,
            Field::Name => &mut self.name,
            Field::ScheduledDelivery => &mut self.scheduled_delivery_time,
            Field::Apartment => &mut self.apartment_no,
            Field::Address => &mut self.address,
            Field::Suburb => &mut self.suburb,
            Field::PostalCode => &mut self.postal_code,
        };
        *slot = value.to_string();
    }

    /// Projects the record onto the given logical columns.
    pub fn to_row(&self, headers: &[Field]) -> BTreeMap<Field, String> {
        headers
            .iter()
            .map(|&field| (field, self.get(field).to_string()))
            .collect()
    }

    /// Rebuilds a record from a row's values; absent fields read as empty.
    pub fn from_row(values: &HashMap<Field, String>) -> Result<Self, ValidationError> {
        let value = |field: Field| values.get(&field).map(String::as_str).unwrap_or("");
        Customer::new(
            value(Field::Phone),
            value(Field::Name),
            value(Field::ScheduledDelivery),
            value(Field::Apartment),
            value(Field::Address),
            value(Field::Suburb),
            value(Field::PostalCode),
        )
    }

    pub fn key(&self) -> NaturalKey {
        NaturalKey::new(&self.phone, &self.name, &self.address)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.name, self.phone, self.address)
    }
}

/// The normalized `(phone, name, address)` triple that identifies a ledger row.
///
/// The ledger has no id column, so update and delete locate rows by this key.
/// Two rows with the same key cannot be told apart; the store always acts on
/// the first one from the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaturalKey {
    pub phone: String,
    pub name: String,
    pub address: String,
}

impl NaturalKey {
    pub fn new(phone: &str, name: &str, address: &str) -> Self {
        NaturalKey {
            phone: normalize(phone),
            name: normalize(name),
            address: normalize(address),
        }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.name, self.phone, self.address)
    }
}

/// Customer fields as submitted by a form; anything may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scheduled_delivery_time: Option<String>,
    #[serde(default)]
    pub apartment_no: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl CustomerForm {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Phone => &self.phone,
            Field::Name => &self.name,
            Field::ScheduledDelivery => &self.scheduled_delivery_time,
            Field::Apartment => &self.apartment_no,
            Field::Address => &self.address,
            Field::Suburb => &self.suburb,
            Field::PostalCode => &self.postal_code,
        };
        value.as_deref()
    }
}

impl TryFrom<CustomerForm> for Customer {
    type Error = ValidationError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        let value = |field: Field| form.get(field).unwrap_or("");
        Customer::new(
            value(Field::Phone),
            value(Field::Name),
            value(Field::ScheduledDelivery),
            value(Field::Apartment),
            value(Field::Address),
            value(Field::Suburb),
            value(Field::PostalCode),
        )
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        CustomerForm {
            phone: Some(customer.phone.clone()),
            name: Some(customer.name.clone()),
            scheduled_delivery_time: Some(customer.scheduled_delivery_time.clone()),
            apartment_no: Some(customer.apartment_no.clone()),
            address: Some(customer.address.clone()),
            suburb: Some(customer.suburb.clone()),
            postal_code: Some(customer.postal_code.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer::new(
            "0400 111 222",
            "Ann Smith",
            "",
            "4",
            "12 High St",
            "Fitzroy",
            "3065",
        )
        .unwrap()
    }

    #[test]
    fn blank_name_fails_validation() {
        let err = Customer::new("1", "   ", "", "", "12 High St", "", "").unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
    }

    #[test]
    fn blank_address_fails_validation() {
        let err = Customer::new("1", "Ann", "", "", "\n", "", "").unwrap_err();
        assert_eq!(err, ValidationError::MissingAddress);
    }

    #[test]
    fn blank_phone_is_allowed() {
        let customer = Customer::new("", "Ann", "", "", "12 High St", "", "").unwrap();
        assert_eq!(customer.phone, "");
    }

    #[test]
    fn fields_are_normalized_on_construction() {
        let customer =
            Customer::new(" 0400\n111 ", "Ann\r\nSmith", "", "", " 12 High St ", "", "").unwrap();
        assert_eq!(customer.phone, "0400 111");
        assert_eq!(customer.name, "Ann  Smith");
        assert_eq!(customer.address, "12 High St");
    }

    #[test]
    fn form_without_phone_becomes_empty_phone() {
        let form = CustomerForm {
            name: Some("Ann".into()),
            address: Some("12 High St".into()),
            ..Default::default()
        };
        let customer = Customer::try_from(form).unwrap();
        assert_eq!(customer.phone, "");
        assert_eq!(customer.suburb, "");
    }

    #[test]
    fn deserializing_runs_validation() {
        let err = serde_json::from_str::<Customer>(r#"{"name": "Ann", "address": " "}"#);
        assert!(err.is_err());

        let ok: Customer =
            serde_json::from_str(r#"{"phone": "1", "name": "Ann", "address": "12 High St"}"#)
                .unwrap();
        assert_eq!(ok.name, "Ann");
    }

    #[test]
    fn update_keeps_record_when_invalid() {
        let mut customer = sample();
        let err = customer
            .update(CustomerForm {
                name: Some(" ".into()),
                suburb: Some("Carlton".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
        assert_eq!(customer, sample());

        customer
            .update(CustomerForm {
                suburb: Some("Carlton".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(customer.suburb, "Carlton");
        assert_eq!(customer.name, "Ann Smith");
    }

    #[test]
    fn to_row_only_projects_requested_headers() {
        let row = sample().to_row(&[Field::Name, Field::PostalCode]);
        assert_eq!(row.len(), 2);
        assert_eq!(row[&Field::Name], "Ann Smith");
        assert_eq!(row[&Field::PostalCode], "3065");
    }

    #[test]
    fn from_row_defaults_missing_fields() {
        let mut values = HashMap::new();
        values.insert(Field::Phone, "1".to_string());
        values.insert(Field::Name, "Ann".to_string());
        values.insert(Field::Address, "12 High St".to_string());
        let customer = Customer::from_row(&values).unwrap();
        assert_eq!(customer.apartment_no, "");
        assert_eq!(customer.scheduled_delivery_time, "");

        values.remove(&Field::Address);
        assert_eq!(
            Customer::from_row(&values).unwrap_err(),
            ValidationError::MissingAddress
        );
    }

    #[test]
    fn natural_key_ignores_non_key_fields() {
        let a = sample();
        let mut b = sample();
        b.update(CustomerForm {
            suburb: Some("Carlton".into()),
            apartment_no: Some("9".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(
            NaturalKey::new(" 0400\n111 222", "Ann Smith ", "12 High St"),
            a.key()
        );
    }

    #[test]
    fn display_shows_name_phone_address() {
        assert_eq!(sample().to_string(), "Ann Smith - 0400 111 222 - 12 High St");
    }
}
