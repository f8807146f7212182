//! Ownership domain logic.
//!
//! A company holds an interest in a property either as the current owner
//! (open-ended, no end date) or over a closed historical interval. The
//! temporal state is modeled as a sum type so that an ownership record with
//! an inconsistent `is_current_owner`/`date_to` combination cannot exist past
//! the validation boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(test)]
mod props;

/// Validation errors for ownership records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipValidationError {
    /// Percentage is outside the allowed [0, 100] range.
    #[error("Ownership percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// A current ownership carries an end date.
    #[error("A current ownership cannot have an end date")]
    EndDateForbidden,

    /// A historical ownership is missing its end date.
    #[error("A historical ownership requires an end date")]
    EndDateRequired,

    /// The end date does not come after the start date.
    #[error("Ownership end date ({date_to}) must be after start date ({date_from})")]
    EndNotAfterStart {
        /// Start of the ownership interval.
        date_from: NaiveDate,
        /// End of the ownership interval.
        date_to: NaiveDate,
    },
}

/// Temporal state of an ownership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipWindow {
    /// Present-day holding, open-ended.
    Current {
        /// Date the ownership began.
        date_from: NaiveDate,
    },
    /// Closed historical interval.
    Historical {
        /// Date the ownership began.
        date_from: NaiveDate,
        /// Date the ownership ended (strictly after `date_from`).
        date_to: NaiveDate,
    },
}

impl OwnershipWindow {
    /// Builds a window from the flat wire representation.
    ///
    /// # Errors
    ///
    /// - `EndDateForbidden` if `is_current_owner` is true and `date_to` is set
    /// - `EndDateRequired` if `is_current_owner` is false and `date_to` is missing
    /// - `EndNotAfterStart` if `date_to` ≤ `date_from`
    pub fn from_parts(
        is_current_owner: bool,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> Result<Self, OwnershipValidationError> {
        match (is_current_owner, date_to) {
            (true, Some(_)) => Err(OwnershipValidationError::EndDateForbidden),
            (true, None) => Ok(Self::Current { date_from }),
            (false, None) => Err(OwnershipValidationError::EndDateRequired),
            (false, Some(date_to)) => {
                if date_to <= date_from {
                    return Err(OwnershipValidationError::EndNotAfterStart { date_from, date_to });
                }
                Ok(Self::Historical { date_from, date_to })
            }
        }
    }

    /// Returns true for a present-day holding.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current { .. })
    }

    /// Start of the ownership interval.
    #[must_use]
    pub const fn date_from(&self) -> NaiveDate {
        match self {
            Self::Current { date_from } | Self::Historical { date_from, .. } => *date_from,
        }
    }

    /// End of the ownership interval, if closed.
    #[must_use]
    pub const fn date_to(&self) -> Option<NaiveDate> {
        match self {
            Self::Current { .. } => None,
            Self::Historical { date_to, .. } => Some(*date_to),
        }
    }

    /// Whether the window overlaps the inclusive range `[start, end]`.
    ///
    /// A current ownership overlaps iff it began on or before `end`. A
    /// historical ownership overlaps iff it began on or before `end` and
    /// ended on or after `start`.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        match self {
            Self::Current { date_from } => *date_from <= end,
            Self::Historical { date_from, date_to } => *date_from <= end && *date_to >= start,
        }
    }
}

/// Lower bound for an ownership percentage.
pub const MIN_PERCENTAGE: Decimal = Decimal::ZERO;

/// Upper bound for an ownership percentage.
pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Validates that a percentage lies in the inclusive [0, 100] range.
///
/// # Errors
///
/// Returns `PercentageOutOfRange` when out of bounds.
pub fn validate_percentage(percentage: Decimal) -> Result<(), OwnershipValidationError> {
    if percentage < MIN_PERCENTAGE || percentage > MAX_PERCENTAGE {
        return Err(OwnershipValidationError::PercentageOutOfRange(percentage));
    }
    Ok(())
}

/// Sums ownership percentages for a property.
///
/// Purely informational: the result is expected to equal 100 when every
/// interest in the property is accounted for, but nothing enforces that.
#[must_use]
pub fn total_percentage(percentages: impl IntoIterator<Item = Decimal>) -> Decimal {
    percentages.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_window_without_end_date() {
        let window = OwnershipWindow::from_parts(true, date(2020, 1, 1), None).unwrap();
        assert!(window.is_current());
        assert_eq!(window.date_from(), date(2020, 1, 1));
        assert_eq!(window.date_to(), None);
    }

    #[test]
    fn test_current_window_rejects_end_date() {
        let result = OwnershipWindow::from_parts(true, date(2020, 1, 1), Some(date(2021, 1, 1)));
        assert_eq!(result, Err(OwnershipValidationError::EndDateForbidden));
    }

    #[test]
    fn test_historical_window_requires_end_date() {
        let result = OwnershipWindow::from_parts(false, date(2020, 1, 1), None);
        assert_eq!(result, Err(OwnershipValidationError::EndDateRequired));
    }

    #[test]
    fn test_historical_window_with_valid_interval() {
        let window =
            OwnershipWindow::from_parts(false, date(2018, 6, 1), Some(date(2020, 6, 1))).unwrap();
        assert!(!window.is_current());
        assert_eq!(window.date_to(), Some(date(2020, 6, 1)));
    }

    #[test]
    fn test_end_date_equal_to_start_rejected() {
        let result = OwnershipWindow::from_parts(false, date(2020, 1, 1), Some(date(2020, 1, 1)));
        assert_eq!(
            result,
            Err(OwnershipValidationError::EndNotAfterStart {
                date_from: date(2020, 1, 1),
                date_to: date(2020, 1, 1),
            })
        );
    }

    #[test]
    fn test_end_date_before_start_rejected() {
        let result = OwnershipWindow::from_parts(false, date(2020, 1, 1), Some(date(2019, 1, 1)));
        assert!(matches!(
            result,
            Err(OwnershipValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn test_percentage_bounds_inclusive() {
        assert!(validate_percentage(dec!(0)).is_ok());
        assert!(validate_percentage(dec!(100)).is_ok());
        assert!(validate_percentage(dec!(60.5)).is_ok());
        assert!(validate_percentage(dec!(-0.01)).is_err());
        assert!(validate_percentage(dec!(100.01)).is_err());
    }

    #[test]
    fn test_current_overlap_only_depends_on_start() {
        let window = OwnershipWindow::from_parts(true, date(2020, 1, 1), None).unwrap();
        assert!(window.overlaps(date(2021, 1, 1), date(2022, 1, 1)));
        assert!(window.overlaps(date(2019, 1, 1), date(2020, 1, 1)));
        assert!(!window.overlaps(date(2018, 1, 1), date(2019, 12, 31)));
    }

    #[test]
    fn test_historical_overlap_inclusive_bounds() {
        let window =
            OwnershipWindow::from_parts(false, date(2019, 1, 1), Some(date(2020, 1, 1))).unwrap();
        // Touching either endpoint counts as overlap
        assert!(window.overlaps(date(2020, 1, 1), date(2021, 1, 1)));
        assert!(window.overlaps(date(2018, 1, 1), date(2019, 1, 1)));
        assert!(!window.overlaps(date(2020, 1, 2), date(2021, 1, 1)));
        assert!(!window.overlaps(date(2018, 1, 1), date(2018, 12, 31)));
    }

    #[test]
    fn test_total_percentage_sums_to_hundred() {
        let total = total_percentage([dec!(60), dec!(40)]);
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn test_total_percentage_empty_is_zero() {
        let total = total_percentage(std::iter::empty());
        assert_eq!(total, Decimal::ZERO);
    }
}
