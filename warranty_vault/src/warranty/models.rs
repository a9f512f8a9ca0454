//! Warranty data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::status::{self, WarrantyStatus};

/// Warranty ID type
pub type WarrantyId = i64;

/// Owning account reference embedded in warranty records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyOwner {
    pub email: String,
}

/// A tracked purchase with a coverage window derived from its purchase
/// date and duration.
///
/// Records are owned by the backend; this type mirrors its JSON shape.
/// The expiry date and status are derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warranty {
    pub id: WarrantyId,
    pub item_name: String,
    /// Calendar date of purchase (ISO 8601 on the wire).
    pub purchase_date: NaiveDate,
    /// Coverage duration in months. Always >= 1.
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    /// URI of an externally stored item image, if any.
    pub item_image: Option<String>,
    /// URI of an externally stored receipt, if any.
    pub receipt: Option<String>,
    pub user: WarrantyOwner,
}

impl Warranty {
    /// Date the coverage window closes.
    pub fn expiry_date(&self) -> NaiveDate {
        status::expiry_date(self.purchase_date, self.duration)
    }

    /// Whole days until the coverage window closes at `now`.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        status::days_until_expiry(self.purchase_date, self.duration, now)
    }

    /// Coverage status at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> WarrantyStatus {
        WarrantyStatus::classify(self.purchase_date, self.duration, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_record() {
        let json = r#"{
            "id": 7,
            "item_name": "Espresso machine",
            "purchase_date": "2024-01-01",
            "duration": 12,
            "notes": "Extended coverage",
            "item_image": "https://cdn.example.com/items/7.jpg",
            "receipt": null,
            "user": {"email": "sam@example.com"}
        }"#;

        let warranty: Warranty = serde_json::from_str(json).expect("valid record");
        assert_eq!(warranty.id, 7);
        assert_eq!(warranty.item_name, "Espresso machine");
        assert_eq!(
            warranty.purchase_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(warranty.duration, 12);
        assert_eq!(warranty.notes, "Extended coverage");
        assert_eq!(
            warranty.item_image.as_deref(),
            Some("https://cdn.example.com/items/7.jpg")
        );
        assert_eq!(warranty.receipt, None);
        assert_eq!(warranty.user.email, "sam@example.com");
    }

    #[test]
    fn missing_notes_defaults_to_empty() {
        let json = r#"{
            "id": 1,
            "item_name": "Blender",
            "purchase_date": "2023-06-15",
            "duration": 6,
            "item_image": null,
            "receipt": null,
            "user": {"email": "sam@example.com"}
        }"#;

        let warranty: Warranty = serde_json::from_str(json).expect("valid record");
        assert!(warranty.notes.is_empty());
    }

    #[test]
    fn derived_fields_follow_thirty_day_months() {
        let warranty = Warranty {
            id: 1,
            item_name: "Laptop".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration: 12,
            notes: String::new(),
            item_image: None,
            receipt: None,
            user: WarrantyOwner {
                email: "sam@example.com".to_string(),
            },
        };

        // 360 days after 2024-01-01, not 2025-01-01.
        assert_eq!(
            warranty.expiry_date(),
            NaiveDate::from_ymd_opt(2024, 12, 27).unwrap()
        );
    }
}
