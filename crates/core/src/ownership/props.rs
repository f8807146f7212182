//! Property-based tests for ownership validation rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{OwnershipValidationError, OwnershipWindow, validate_percentage};

/// Strategy for a percentage inside the allowed [0, 100] range.
fn valid_percentage() -> impl Strategy<Value = Decimal> {
    // 0.00 to 100.00 in cents
    (0i64..=10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a percentage outside the allowed range.
fn invalid_percentage() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..1_000_000i64).prop_map(|cents| Decimal::new(-cents, 2)),
        (10_001i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

/// Strategy for an arbitrary date within a sane range.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    // Days since CE for 1950-01-01 .. 2050-01-01
    (712_000i32..748_000i32).prop_map(|days| NaiveDate::from_num_days_from_ce_opt(days).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For all* percentage values p, validation succeeds iff 0 <= p <= 100.
    #[test]
    fn prop_valid_percentage_accepted(p in valid_percentage()) {
        prop_assert!(validate_percentage(p).is_ok());
    }

    /// Out-of-range percentages are always rejected.
    #[test]
    fn prop_invalid_percentage_rejected(p in invalid_percentage()) {
        prop_assert_eq!(
            validate_percentage(p),
            Err(OwnershipValidationError::PercentageOutOfRange(p))
        );
    }

    /// A current ownership never constructs with an end date, and always
    /// constructs without one.
    #[test]
    fn prop_current_owner_end_date_rules(from in any_date(), to in any_date()) {
        prop_assert!(OwnershipWindow::from_parts(true, from, None).is_ok());
        prop_assert_eq!(
            OwnershipWindow::from_parts(true, from, Some(to)),
            Err(OwnershipValidationError::EndDateForbidden)
        );
    }

    /// A historical ownership constructs iff its end date is strictly after
    /// its start date.
    #[test]
    fn prop_historical_requires_ordered_interval(from in any_date(), to in any_date()) {
        let result = OwnershipWindow::from_parts(false, from, Some(to));
        if to > from {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result,
                Err(OwnershipValidationError::EndNotAfterStart { date_from: from, date_to: to })
            );
        }
    }

    /// Overlap agrees with plain interval arithmetic for historical windows.
    #[test]
    fn prop_historical_overlap_matches_interval_math(
        from in any_date(),
        len in 1i64..3_650i64,
        start in any_date(),
        span in 0i64..3_650i64,
    ) {
        let to = from + chrono::Days::new(u64::try_from(len).unwrap());
        let end = start + chrono::Days::new(u64::try_from(span).unwrap());
        let window = OwnershipWindow::from_parts(false, from, Some(to)).unwrap();

        let expected = from <= end && to >= start;
        prop_assert_eq!(window.overlaps(start, end), expected);
    }

    /// A window always overlaps a range that contains its start date.
    #[test]
    fn prop_window_overlaps_range_containing_start(
        from in any_date(),
        len in 1i64..3_650i64,
        pad in 0i64..30i64,
    ) {
        let to = from + chrono::Days::new(u64::try_from(len).unwrap());
        let start = from - chrono::Days::new(u64::try_from(pad).unwrap());
        let end = from + chrono::Days::new(u64::try_from(pad).unwrap());

        let current = OwnershipWindow::from_parts(true, from, None).unwrap();
        let historical = OwnershipWindow::from_parts(false, from, Some(to)).unwrap();

        prop_assert!(current.overlaps(start, end));
        prop_assert!(historical.overlaps(start, end));
    }
}
