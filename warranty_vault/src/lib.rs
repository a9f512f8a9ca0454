//! # Warranty Vault
//!
//! Domain logic for tracking product warranties.
//!
//! A warranty record pairs a purchase date with a coverage duration in
//! months, where a month is a fixed 30-day unit. Everything the product
//! derives from a record - its expiry date, the days remaining, and the
//! active / expiring soon / expired classification shown on the dashboard -
//! lives in [`warranty`]. The premium upgrade flow's contact form and its
//! validation rules live in [`upgrade`].
//!
//! All computations are pure: the current time is always an injected
//! parameter, never an ambient clock read, so status classification is
//! deterministic under test. Network access, session storage, and
//! presentation belong to client crates built on top of this one.
//!
//! ## Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use warranty_vault::WarrantyStatus;
//!
//! let purchased = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//!
//! // Twelve 30-day months of coverage, checked mid-2024: still active.
//! assert_eq!(WarrantyStatus::classify(purchased, 12, now), WarrantyStatus::Active);
//! ```

/// Warranty records and coverage status computation.
pub mod warranty;
pub use warranty::{
    models::{Warranty, WarrantyOwner},
    status::{self, WarrantyStatus},
};

/// Premium upgrade form and its validation rules.
pub mod upgrade;
pub use upgrade::{Field, FieldError, UpgradeForm, ValidationErrors};
