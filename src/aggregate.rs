// ⚖️ Aggregator
// Derived totals over the currently filtered view

use serde::{Deserialize, Serialize};

use crate::record::{is_online_channel, BookingRecord};

// ============================================================================
// TOTALS
// ============================================================================

/// Sum of amounts over the given records. Permutation invariant.
pub fn total(records: &[BookingRecord]) -> f64 {
    records.iter().map(|rec| rec.amount).sum()
}

/// Sum restricted to records matching a predicate.
///
/// The online-only collection metric is `total_where(view, online_only)`;
/// the predicate lives in `record::is_online_channel` so the business rule
/// stays in one auditable place.
pub fn total_where<F>(records: &[BookingRecord], pred: F) -> f64
where
    F: Fn(&BookingRecord) -> bool,
{
    records.iter().filter(|rec| pred(rec)).map(|rec| rec.amount).sum()
}

/// Named predicate for the online-only metric
pub fn online_only(rec: &BookingRecord) -> bool {
    is_online_channel(&rec.payment_channel)
}

// ============================================================================
// SUMMARY
// ============================================================================

/// BookingTotals - Derived figures for the dashboard boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingTotals {
    pub count: usize,
    pub grand_total: f64,
    /// Online/pre-paid bookings only; always <= grand_total
    pub online_total: f64,
}

impl BookingTotals {
    pub fn compute(records: &[BookingRecord]) -> Self {
        BookingTotals {
            count: records.len(),
            grand_total: total(records),
            online_total: total_where(records, online_only),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
