//! Pricing and loyalty rules.
//!
//! Everything here is a pure function of the snapshots it is handed and the
//! instant `now`. Customers are never mutated in place: purchases and
//! promotions return a new `Customer` together with the change that produced
//! it, and the caller decides whether to persist it.

use super::customer::{Customer, CustomerStatus, effective_status};
use super::money::Dollars;
use super::movie::{LicensingModel, Movie};
use super::purchase::PurchasedMovie;
use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const TWO_DAYS_PRICE: Decimal = dec!(4.00);
pub const LIFE_LONG_PRICE: Decimal = dec!(8.00);
pub const ADVANCED_DISCOUNT_FACTOR: Decimal = dec!(0.75);

pub const TWO_DAYS_LICENSE_DAYS: i64 = 2;
/// Purchases that expired within this many days still count towards promotion.
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;
pub const MIN_ACTIVE_PURCHASES: usize = 2;
pub const MIN_YEARLY_SPENDING: Decimal = dec!(100.00);
pub const ADVANCED_STATUS_MONTHS: u32 = 12;

/// Price of a license for a customer with the given stored status.
pub fn calculate_price(
    licensing_model: LicensingModel,
    status: CustomerStatus,
    status_expiration: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Dollars {
    let price = Dollars::new(match licensing_model {
        LicensingModel::TwoDays => TWO_DAYS_PRICE,
        LicensingModel::LifeLong => LIFE_LONG_PRICE,
    });

    match effective_status(status, status_expiration, now) {
        CustomerStatus::Advanced => price * ADVANCED_DISCOUNT_FACTOR,
        CustomerStatus::Regular => price,
    }
}

/// When a license bought at `now` stops being valid. `None` means never.
pub fn expiration_date(licensing_model: LicensingModel, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match licensing_model {
        LicensingModel::TwoDays => Some(
            now.checked_add_signed(Duration::days(TWO_DAYS_LICENSE_DAYS))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
        LicensingModel::LifeLong => None,
    }
}

/// Result of [`purchase`]: the new license and the customer that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub record: PurchasedMovie,
    pub customer: Customer,
}

/// Sells `movie` to `customer`.
///
/// The caller must already have checked that the customer holds no active
/// license for the same movie.
pub fn purchase(customer: &Customer, movie: &Movie, now: DateTime<Utc>) -> Purchase {
    let price = calculate_price(
        movie.licensing_model,
        customer.status,
        customer.status_expiration,
        now,
    );
    let record = PurchasedMovie {
        movie_id: movie.id,
        price,
        purchase_date: now,
        expiration_date: expiration_date(movie.licensing_model, now),
    };

    let mut updated = customer.clone();
    updated.purchases.push(record.clone());
    updated.money_spent += price;

    Purchase {
        record,
        customer: updated,
    }
}

/// Why a customer could not be promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// Fewer than two licenses active now or within the last 30 days.
    TooFewActivePurchases { active: usize },
    /// Less than 100.00 spent on purchases made during the last year.
    InsufficientSpending { spent: Dollars },
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ineligibility::TooFewActivePurchases { active } => write!(
                f,
                "{active} active movie(s) in the last 30 days, {MIN_ACTIVE_PURCHASES} required"
            ),
            Ineligibility::InsufficientSpending { spent } => write!(
                f,
                "{spent} spent in the last year, {} required",
                Dollars::new(MIN_YEARLY_SPENDING)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutcome {
    Promoted {
        status_expiration: DateTime<Utc>,
        customer: Customer,
    },
    Ineligible(Ineligibility),
}

impl PromotionOutcome {
    pub fn is_promoted(&self) -> bool {
        matches!(self, PromotionOutcome::Promoted { .. })
    }
}

/// Evaluates promotion eligibility and, when met, grants `Advanced` status
/// for one year.
///
/// The current status is not consulted; refusing to re-promote an already
/// advanced customer is up to the caller.
pub fn promote(customer: &Customer, now: DateTime<Utc>) -> PromotionOutcome {
    let activity_cutoff = now
        .checked_sub_signed(Duration::days(ACTIVITY_WINDOW_DAYS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let active = customer
        .purchases
        .iter()
        .filter(|p| p.is_active_at(activity_cutoff))
        .count();
    if active < MIN_ACTIVE_PURCHASES {
        return PromotionOutcome::Ineligible(Ineligibility::TooFewActivePurchases { active });
    }

    let year_ago = now
        .checked_sub_months(Months::new(ADVANCED_STATUS_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let spent: Dollars = customer
        .purchases
        .iter()
        .filter(|p| p.purchase_date > year_ago)
        .map(|p| p.price)
        .sum();
    if spent < Dollars::new(MIN_YEARLY_SPENDING) {
        return PromotionOutcome::Ineligible(Ineligibility::InsufficientSpending { spent });
    }

    let status_expiration = now
        .checked_add_months(Months::new(ADVANCED_STATUS_MONTHS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let mut updated = customer.clone();
    updated.status = CustomerStatus::Advanced;
    updated.status_expiration = Some(status_expiration);

    PromotionOutcome::Promoted {
        status_expiration,
        customer: updated,
    }
}
