use super::money::Dollars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A license bought by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedMovie {
    pub movie_id: u64,
    pub price: Dollars,
    pub purchase_date: DateTime<Utc>,
    /// `None` for licenses that never expire.
    pub expiration_date: Option<DateTime<Utc>>,
}

impl PurchasedMovie {
    /// Whether the license is still valid at `at`. The expiration instant
    /// itself still counts as valid.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.expiration_date.is_none_or(|expiration| expiration >= at)
    }
}
