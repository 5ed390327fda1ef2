//! Pricing calculator
//!
//! Pure functions deriving a monetary total from a location's pricing rule
//! and stay length. Same inputs always yield the same total; nothing here
//! touches storage.

use chrono::NaiveDate;
use posada_core::models::{LocationInfo, PricingRule};
use rust_decimal::Decimal;

use crate::constants::MIN_NIGHTS;

/// Number of billable nights for a date range
///
/// A missing departure counts as a single day; zero-or-negative ranges are
/// clamped to one night (documented source behavior, kept as a policy
/// choice).
pub fn nights(arrival: NaiveDate, departure: Option<NaiveDate>) -> i64 {
    match departure {
        Some(departure) => (departure - arrival).num_days().max(MIN_NIGHTS),
        None => MIN_NIGHTS,
    }
}

/// Compute the total for a prospective or existing booking
///
/// Returns `None` when the location declares no price; callers must treat
/// that as "price not specified", never as zero.
pub fn price(
    location: &LocationInfo,
    arrival: NaiveDate,
    departure: Option<NaiveDate>,
    party_size: i32,
) -> Option<Decimal> {
    match location.pricing? {
        PricingRule::PerNight { rate, per_person } => {
            let nightly = rate * Decimal::from(nights(arrival, departure));
            Some(if per_person {
                nightly * Decimal::from(party_size)
            } else {
                nightly
            })
        }
        PricingRule::FixedFee { fee } => Some(fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_core::models::LocationKind;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room(rate: Decimal, per_person: bool) -> LocationInfo {
        LocationInfo {
            kind: LocationKind::Room,
            pricing: Some(PricingRule::PerNight { rate, per_person }),
            ..Default::default()
        }
    }

    #[test]
    fn test_per_night_per_room() {
        // $150/night, two nights
        let location = room(dec!(150.00), false);
        let total = price(
            &location,
            date(2024, 7, 20),
            Some(date(2024, 7, 22)),
            2,
        );
        assert_eq!(total, Some(dec!(300.00)));
    }

    #[test]
    fn test_per_night_per_person() {
        // $50/person/night, two nights, three guests
        let location = room(dec!(50.00), true);
        let total = price(
            &location,
            date(2024, 7, 20),
            Some(date(2024, 7, 22)),
            3,
        );
        assert_eq!(total, Some(dec!(300.00)));
    }

    #[test]
    fn test_fixed_fee_ignores_duration_and_party() {
        let location = LocationInfo {
            kind: LocationKind::Table,
            pricing: Some(PricingRule::FixedFee { fee: dec!(10.00) }),
            ..Default::default()
        };
        assert_eq!(
            price(&location, date(2024, 7, 20), None, 1),
            Some(dec!(10.00))
        );
        assert_eq!(
            price(&location, date(2024, 7, 20), Some(date(2024, 7, 25)), 8),
            Some(dec!(10.00))
        );
    }

    #[test]
    fn test_unpriced_location_is_none() {
        let location = LocationInfo::default();
        assert_eq!(price(&location, date(2024, 7, 20), None, 2), None);
    }

    #[test]
    fn test_night_clamping() {
        assert_eq!(nights(date(2024, 7, 20), Some(date(2024, 7, 20))), 1);
        assert_eq!(nights(date(2024, 7, 20), Some(date(2024, 7, 18))), 1);
        assert_eq!(nights(date(2024, 7, 20), None), 1);
        assert_eq!(nights(date(2024, 7, 20), Some(date(2024, 7, 27))), 7);

        // Clamped range still prices at one night
        let location = room(dec!(80.00), false);
        assert_eq!(
            price(&location, date(2024, 7, 20), Some(date(2024, 7, 20)), 1),
            Some(dec!(80.00))
        );
    }

    #[test]
    fn test_price_is_deterministic() {
        let location = room(dec!(99.90), true);
        let a = price(&location, date(2025, 1, 1), Some(date(2025, 1, 4)), 2);
        let b = price(&location, date(2025, 1, 1), Some(date(2025, 1, 4)), 2);
        assert_eq!(a, b);
        assert_eq!(a, Some(dec!(599.40)));
    }
}
