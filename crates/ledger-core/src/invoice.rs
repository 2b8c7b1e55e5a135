//! # Invoice Numbers
//!
//! Derivation of sequential, human-readable sale identifiers.
//!
//! ## Format
//! ```text
//! INV-202404-003
//! │   │      │
//! │   │      └── sequence within the calendar month, zero-padded to 3
//! │   └── year + month of creation (YYYYMM)
//! └── fixed prefix
//! ```
//!
//! ## Sequencing Rules
//! - The sequence is derived by *counting* existing sales whose `created_at`
//!   falls in the current calendar month (month/year match, not a rolling
//!   30-day window) and adding one.
//! - All shops share one monthly counter; the sequence is NOT partitioned
//!   per shop.
//! - The counter resets implicitly at each month boundary because the count
//!   of same-month sales drops back to zero.
//!
//! Counting is a read-then-write sequence: callers must hold the ledger's
//! single-writer lock while deriving a number and appending the sale, or the
//! same number can be issued twice.

use chrono::{DateTime, Datelike, Utc};

use crate::types::Sale;
use crate::INVOICE_PREFIX;

/// Derives the next invoice number from the existing sale collection.
///
/// Pure function: the clock is injected so month boundaries are testable.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use ledger_core::invoice::next_invoice_number;
///
/// let april = Utc.with_ymd_and_hms(2024, 4, 12, 10, 0, 0).unwrap();
/// assert_eq!(next_invoice_number(&[], april), "INV-202404-001");
/// ```
pub fn next_invoice_number(sales: &[Sale], now: DateTime<Utc>) -> String {
    let in_month = sales
        .iter()
        .filter(|s| s.created_at.year() == now.year() && s.created_at.month() == now.month())
        .count();

    format!(
        "{}-{}{:02}-{:03}",
        INVOICE_PREFIX,
        now.year(),
        now.month(),
        in_month + 1
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SaleStatus, SaleType};
    use chrono::TimeZone;

    fn sale_at(id: &str, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id: id.to_string(),
            shop_id: "shop1".to_string(),
            sale_type: SaleType::Cash,
            items: vec![],
            total: 0.0,
            paid: 0.0,
            balance: 0.0,
            created_by: "2".to_string(),
            created_at,
            status: SaleStatus::Completed,
        }
    }

    #[test]
    fn test_first_sale_of_month() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        assert_eq!(next_invoice_number(&[], now), "INV-202404-001");
    }

    #[test]
    fn test_sequence_increments_within_month() {
        let now = Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap();
        let sales = vec![
            sale_at(
                "INV-202404-001",
                Utc.with_ymd_and_hms(2024, 4, 3, 10, 0, 0).unwrap(),
            ),
            sale_at(
                "INV-202404-002",
                Utc.with_ymd_and_hms(2024, 4, 15, 16, 30, 0).unwrap(),
            ),
        ];
        assert_eq!(next_invoice_number(&sales, now), "INV-202404-003");
    }

    #[test]
    fn test_counter_resets_at_month_boundary() {
        let sales = vec![
            sale_at(
                "INV-202404-001",
                Utc.with_ymd_and_hms(2024, 4, 3, 10, 0, 0).unwrap(),
            ),
            sale_at(
                "INV-202404-002",
                Utc.with_ymd_and_hms(2024, 4, 15, 16, 30, 0).unwrap(),
            ),
            sale_at(
                "INV-202404-003",
                Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 0).unwrap(),
            ),
        ];
        let may = Utc.with_ymd_and_hms(2024, 5, 1, 0, 5, 0).unwrap();
        assert_eq!(next_invoice_number(&sales, may), "INV-202405-001");
    }

    #[test]
    fn test_same_month_previous_year_not_counted() {
        let sales = vec![sale_at(
            "INV-202304-001",
            Utc.with_ymd_and_hms(2023, 4, 10, 12, 0, 0).unwrap(),
        )];
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        assert_eq!(next_invoice_number(&sales, now), "INV-202404-001");
    }

    #[test]
    fn test_counter_is_not_partitioned_per_shop() {
        let now = Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap();
        let mut other_shop = sale_at(
            "INV-202404-001",
            Utc.with_ymd_and_hms(2024, 4, 3, 10, 0, 0).unwrap(),
        );
        other_shop.shop_id = "shop2".to_string();
        assert_eq!(next_invoice_number(&[other_shop], now), "INV-202404-002");
    }

    #[test]
    fn test_single_digit_month_is_zero_padded() {
        let jan = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
        assert_eq!(next_invoice_number(&[], jan), "INV-202501-001");
    }
}
