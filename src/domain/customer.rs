use super::money::Dollars;
use super::purchase::PurchasedMovie;
use crate::error::TheaterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 150;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum CustomerStatus {
    #[default]
    Regular,
    Advanced,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStatus::Regular => f.write_str("Regular"),
            CustomerStatus::Advanced => f.write_str("Advanced"),
        }
    }
}

/// A customer's display name, trimmed and at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    pub fn new(value: &str) -> Result<Self, TheaterError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TheaterError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }
        if value.chars().count() > MAX_NAME_LEN {
            return Err(TheaterError::ValidationError(
                "Name is too long".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerName {
    type Error = TheaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CustomerName> for String {
    fn from(name: CustomerName) -> Self {
        name.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An email address, kept as entered apart from surrounding whitespace.
/// Only the shape `local@domain` is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, TheaterError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TheaterError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }
        if value.chars().count() > MAX_EMAIL_LEN {
            return Err(TheaterError::ValidationError(
                "Email is too long".to_string(),
            ));
        }
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => {
                return Err(TheaterError::ValidationError(format!(
                    "Email is invalid: {value}"
                )));
            }
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for uniqueness checks.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn same_address(&self, other: &Email) -> bool {
        self.key() == other.key()
    }
}

impl TryFrom<String> for Email {
    type Error = TheaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer snapshot as loaded from storage.
///
/// `status` is the stored loyalty status. It is never reset when
/// `status_expiration` passes; read [`Customer::effective_status`] wherever
/// the loyalty level matters.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Customer {
    pub id: u64,
    pub name: CustomerName,
    pub email: Email,
    pub status: CustomerStatus,
    pub status_expiration: Option<DateTime<Utc>>,
    pub money_spent: Dollars,
    pub purchases: Vec<PurchasedMovie>,
}

impl Customer {
    pub fn new(id: u64, name: CustomerName, email: Email) -> Self {
        Self {
            id,
            name,
            email,
            status: CustomerStatus::Regular,
            status_expiration: None,
            money_spent: Dollars::ZERO,
            purchases: Vec::new(),
        }
    }

    /// The loyalty status in force at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> CustomerStatus {
        effective_status(self.status, self.status_expiration, now)
    }

    /// Whether the customer holds a license for `movie_id` that is still
    /// valid at `now`.
    pub fn has_active_purchase(&self, movie_id: u64, now: DateTime<Utc>) -> bool {
        self.purchases
            .iter()
            .any(|p| p.movie_id == movie_id && p.is_active_at(now))
    }
}

/// Derives the status in force at `now` from the stored fields.
///
/// `Advanced` only holds while the expiration is absent or not yet past.
pub fn effective_status(
    status: CustomerStatus,
    status_expiration: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> CustomerStatus {
    match status {
        CustomerStatus::Advanced if status_expiration.is_none_or(|exp| exp >= now) => {
            CustomerStatus::Advanced
        }
        _ => CustomerStatus::Regular,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn customer() -> Customer {
        Customer::new(
            1,
            CustomerName::new("John Doe").unwrap(),
            Email::new("john.doe@example.com").unwrap(),
        )
    }

    #[test]
    fn test_new_customer_is_regular() {
        let c = customer();
        assert_eq!(c.status, CustomerStatus::Regular);
        assert_eq!(c.status_expiration, None);
        assert_eq!(c.money_spent, Dollars::ZERO);
        assert!(c.purchases.is_empty());
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(CustomerName::new("  Jane ").unwrap().as_str(), "Jane");
        assert!(matches!(
            CustomerName::new("   "),
            Err(TheaterError::ValidationError(_))
        ));
        assert!(CustomerName::new(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(matches!(
            CustomerName::new(&"x".repeat(MAX_NAME_LEN + 1)),
            Err(TheaterError::ValidationError(msg)) if msg == "Name is too long"
        ));
    }

    #[test]
    fn test_email_validation() {
        let email = Email::new(" John@Example.com ").unwrap();
        assert_eq!(email.as_str(), "John@Example.com");
        assert_eq!(email.key(), "john@example.com");
        assert!(email.same_address(&Email::new("john@example.COM").unwrap()));
        assert_ne!(email, Email::new("john@example.com").unwrap());
        for bad in ["", "no-at-sign", "@example.com", "john@", "a@b@c"] {
            assert!(Email::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_effective_status() {
        let now = now();
        assert_eq!(
            effective_status(CustomerStatus::Regular, None, now),
            CustomerStatus::Regular
        );
        assert_eq!(
            effective_status(CustomerStatus::Advanced, None, now),
            CustomerStatus::Advanced
        );
        assert_eq!(
            effective_status(CustomerStatus::Advanced, Some(now), now),
            CustomerStatus::Advanced
        );
        assert_eq!(
            effective_status(CustomerStatus::Advanced, Some(now - Duration::days(1)), now),
            CustomerStatus::Regular
        );
        // An expiration on a regular customer does not matter.
        assert_eq!(
            effective_status(CustomerStatus::Regular, Some(now + Duration::days(1)), now),
            CustomerStatus::Regular
        );
    }

    #[test]
    fn test_has_active_purchase() {
        let now = now();
        let mut c = customer();
        c.purchases.push(PurchasedMovie {
            movie_id: 1,
            price: Dollars::new(dec!(4.00)),
            purchase_date: now - Duration::days(3),
            expiration_date: Some(now - Duration::days(1)),
        });
        c.purchases.push(PurchasedMovie {
            movie_id: 2,
            price: Dollars::new(dec!(8.00)),
            purchase_date: now - Duration::days(3),
            expiration_date: None,
        });

        assert!(!c.has_active_purchase(1, now));
        assert!(c.has_active_purchase(2, now));
        assert!(!c.has_active_purchase(3, now));
    }

    #[test]
    fn test_customer_json_round_trip_keeps_validation() {
        let json = serde_json::to_string(&customer()).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer());

        let tampered = json.replace("john.doe@example.com", "not-an-email");
        assert!(serde_json::from_str::<Customer>(&tampered).is_err());
    }
}
