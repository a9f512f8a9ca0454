/// Property-based tests for warranty status computation using proptest
///
/// These tests verify the 30-day-month expiry arithmetic and the status
/// tie-break rules across a wide range of purchase dates, durations, and
/// observation times.
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use proptest::prelude::*;
use warranty_vault::status::{
    self, DAYS_PER_MONTH, EXPIRING_SOON_WINDOW_DAYS,
};
use warranty_vault::WarrantyStatus;

// Strategy to generate a purchase date within a couple of decades of epoch day 0
fn purchase_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..=20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(offset)
    })
}

// Strategy to generate a valid duration (invariant: >= 1 month)
fn duration_strategy() -> impl Strategy<Value = u32> {
    1u32..=240
}

// Strategy to generate an observation instant near the generated dates
fn now_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..=30_000, 0u32..86_400).prop_map(|(days, seconds)| {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(days);
        date.and_time(NaiveTime::MIN).and_utc() + Duration::seconds(i64::from(seconds))
    })
}

proptest! {
    #[test]
    fn expiry_is_exactly_thirty_days_per_month(
        purchase_date in purchase_date_strategy(),
        duration in duration_strategy(),
    ) {
        let expiry = status::expiry_date(purchase_date, duration);
        let elapsed = expiry - purchase_date;
        prop_assert_eq!(elapsed.num_days(), DAYS_PER_MONTH * i64::from(duration));
    }

    #[test]
    fn classification_matches_tie_break_rules(
        purchase_date in purchase_date_strategy(),
        duration in duration_strategy(),
        now in now_strategy(),
    ) {
        let expired = status::is_expired(purchase_date, duration, now);
        let days = status::days_until_expiry(purchase_date, duration, now);
        let expected = if expired {
            WarrantyStatus::Expired
        } else if days <= EXPIRING_SOON_WINDOW_DAYS {
            WarrantyStatus::ExpiringSoon
        } else {
            WarrantyStatus::Active
        };
        prop_assert_eq!(WarrantyStatus::classify(purchase_date, duration, now), expected);
    }

    #[test]
    fn expired_iff_no_full_or_partial_day_remains(
        purchase_date in purchase_date_strategy(),
        duration in duration_strategy(),
        now in now_strategy(),
    ) {
        // expiry < now is equivalent to a non-positive day count.
        let expired = status::is_expired(purchase_date, duration, now);
        let days = status::days_until_expiry(purchase_date, duration, now);
        if expired {
            prop_assert!(days <= 0);
        } else {
            prop_assert!(days >= 0);
        }
    }

    #[test]
    fn active_warranties_have_more_than_window_days_left(
        purchase_date in purchase_date_strategy(),
        duration in duration_strategy(),
        now in now_strategy(),
    ) {
        if WarrantyStatus::classify(purchase_date, duration, now) == WarrantyStatus::Active {
            prop_assert!(
                status::days_until_expiry(purchase_date, duration, now)
                    > EXPIRING_SOON_WINDOW_DAYS
            );
            prop_assert!(!status::is_expired(purchase_date, duration, now));
        }
    }

    #[test]
    fn longer_duration_never_expires_earlier(
        purchase_date in purchase_date_strategy(),
        duration in 1u32..=239,
        now in now_strategy(),
    ) {
        let shorter = status::days_until_expiry(purchase_date, duration, now);
        let longer = status::days_until_expiry(purchase_date, duration + 1, now);
        prop_assert_eq!(longer - shorter, DAYS_PER_MONTH);
    }
}
