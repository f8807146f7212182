//! Transaction amount field selection and totals.

use rust_decimal::Decimal;

/// Amount fields a transaction aggregate can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountField {
    /// Gross amount before deductions.
    #[default]
    Gross,
    /// Net amount after deductions.
    Net,
    /// Amount paid in taxes.
    TaxesPaid,
}

impl AmountField {
    /// Wire names of every selectable amount field.
    pub const VALID_NAMES: [&'static str; 3] = ["gross_amount", "net_amount", "taxes_paid_amount"];

    /// Wire name of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gross => "gross_amount",
            Self::Net => "net_amount",
            Self::TaxesPaid => "taxes_paid_amount",
        }
    }

    /// Parses a wire name into an amount field.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gross_amount" => Some(Self::Gross),
            "net_amount" => Some(Self::Net),
            "taxes_paid_amount" => Some(Self::TaxesPaid),
            _ => None,
        }
    }
}

/// Sums a selected amount field across transactions.
///
/// Optional amounts that were never recorded contribute zero, matching the
/// aggregate's "sum what is there" semantics.
#[must_use]
pub fn total_amount(amounts: impl IntoIterator<Item = Option<Decimal>>) -> Decimal {
    amounts.into_iter().flatten().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_round_trips_valid_names() {
        for name in AmountField::VALID_NAMES {
            let field = AmountField::parse(name).unwrap();
            assert_eq!(field.as_str(), name);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        assert_eq!(AmountField::parse("amount"), None);
        assert_eq!(AmountField::parse(""), None);
    }

    #[test]
    fn test_default_is_gross() {
        assert_eq!(AmountField::default(), AmountField::Gross);
    }

    #[test]
    fn test_total_skips_missing_amounts() {
        let total = total_amount([Some(dec!(100.50)), None, Some(dec!(49.50))]);
        assert_eq!(total, dec!(150.00));
    }

    #[test]
    fn test_total_of_nothing_is_zero() {
        assert_eq!(
            total_amount(std::iter::empty::<Option<Decimal>>()),
            Decimal::ZERO
        );
    }
}
