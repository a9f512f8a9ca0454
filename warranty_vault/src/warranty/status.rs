//! Warranty status computation.
//!
//! Coverage windows use a fixed 30-day month: a warranty purchased on
//! 2024-01-01 with a 12 month duration expires 360 days later, on
//! 2024-12-27. This matches the product's published behavior and must not
//! be changed to calendar-month arithmetic.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed number of days per coverage month.
pub const DAYS_PER_MONTH: i64 = 30;

/// Warranties within this many days of expiry are flagged as expiring soon.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Coverage status of a warranty at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    /// Coverage window open, more than 30 days remaining.
    Active,
    /// Coverage window open, 30 days or fewer remaining.
    ExpiringSoon,
    /// Coverage window closed.
    Expired,
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarrantyStatus::Active => write!(f, "active"),
            WarrantyStatus::ExpiringSoon => write!(f, "expiring soon"),
            WarrantyStatus::Expired => write!(f, "expired"),
        }
    }
}

impl WarrantyStatus {
    /// Classify coverage at `now`.
    ///
    /// Rules are evaluated top to bottom and the first match wins:
    /// expired, then expiring soon, then active.
    pub fn classify(purchase_date: NaiveDate, duration: u32, now: DateTime<Utc>) -> Self {
        if is_expired(purchase_date, duration, now) {
            WarrantyStatus::Expired
        } else if days_until_expiry(purchase_date, duration, now) <= EXPIRING_SOON_WINDOW_DAYS {
            WarrantyStatus::ExpiringSoon
        } else {
            WarrantyStatus::Active
        }
    }
}

/// Date the coverage window closes: purchase date plus `duration` fixed
/// 30-day months.
pub fn expiry_date(purchase_date: NaiveDate, duration: u32) -> NaiveDate {
    purchase_date + Duration::days(DAYS_PER_MONTH * i64::from(duration))
}

/// Instant the coverage window closes: midnight UTC of the expiry date.
fn expiry_instant(purchase_date: NaiveDate, duration: u32) -> DateTime<Utc> {
    expiry_date(purchase_date, duration)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Whether the coverage window has closed as of `now`.
pub fn is_expired(purchase_date: NaiveDate, duration: u32, now: DateTime<Utc>) -> bool {
    expiry_instant(purchase_date, duration) < now
}

/// Whole days until the coverage window closes, any partial day rounded
/// up. Zero or negative once the window has closed.
pub fn days_until_expiry(purchase_date: NaiveDate, duration: u32, now: DateTime<Utc>) -> i64 {
    let remaining = expiry_instant(purchase_date, duration) - now;
    div_ceil(remaining.num_milliseconds(), MILLIS_PER_DAY)
}

/// Ceiling division for possibly negative numerators.
fn div_ceil(n: i64, d: i64) -> i64 {
    let quotient = n.div_euclid(d);
    if n.rem_euclid(d) > 0 {
        quotient + 1
    } else {
        quotient
    }
}
