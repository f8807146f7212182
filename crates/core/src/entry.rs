//! Ledger entry transaction-set semantics.
//!
//! An entry groups transactions for a reporting period. The grouping is a
//! set: the same transaction appears at most once, regardless of how many
//! times it is supplied or added.

use uuid::Uuid;

/// Collapses duplicate transaction ids, preserving first-seen order.
#[must_use]
pub fn normalize_transaction_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapsed_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = normalize_transaction_ids(vec![a, b, a, a, b]);
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let once = normalize_transaction_ids(ids);
        let twice = normalize_transaction_ids(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(normalize_transaction_ids(Vec::new()).is_empty());
    }
}
