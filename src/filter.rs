// 🔍 Filter Engine
// Pure, order-preserving predicate composition over booking records

use serde::{Deserialize, Serialize};

use crate::record::{BookingRecord, BookingStatus};

// ============================================================================
// FILTER STATE
// ============================================================================

/// FilterState - Current values of every filter dimension.
///
/// An unset dimension (empty string, "All", or None) is a no-op: it never
/// excludes records. `Default` therefore matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive substring match on the seva/pooja name
    pub seva_name: String,
    /// Case-insensitive substring match on the mobile number
    pub mobile: String,
    /// Inclusive lower bound, ISO `YYYY-MM-DD`; empty = unbounded
    pub from_date: String,
    /// Inclusive upper bound, ISO `YYYY-MM-DD`; empty = unbounded
    pub to_date: String,
    /// Exact status match; None = all statuses
    pub status: Option<BookingStatus>,
    /// Case-insensitive exact channel match; empty or "All" = any
    pub payment: String,
}

impl FilterState {
    /// A state that matches every record
    pub fn match_all() -> Self {
        FilterState::default()
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_date_range(mut self, from: &str, to: &str) -> Self {
        self.from_date = from.to_string();
        self.to_date = to.to_string();
        self
    }

    /// True when no dimension is active
    pub fn is_match_all(&self) -> bool {
        self.seva_name.is_empty()
            && self.mobile.is_empty()
            && self.from_date.is_empty()
            && self.to_date.is_empty()
            && self.status.is_none()
            && !payment_active(&self.payment)
    }

    /// Data-entry validation. An inverted date range is reported here; the
    /// engine itself never raises and simply yields an empty result set.
    pub fn validate(&self) -> Result<(), FilterStateError> {
        if !self.from_date.is_empty()
            && !self.to_date.is_empty()
            && self.from_date > self.to_date
        {
            return Err(FilterStateError::InvertedDateRange {
                from: self.from_date.clone(),
                to: self.to_date.clone(),
            });
        }
        Ok(())
    }

    /// Does one record pass every active dimension?
    pub fn matches(&self, rec: &BookingRecord) -> bool {
        if !self.seva_name.is_empty()
            && !contains_ignore_case(&rec.seva_name, &self.seva_name)
        {
            return false;
        }
        if !self.mobile.is_empty() && !contains_ignore_case(&rec.mobile, &self.mobile) {
            return false;
        }
        // Lexicographic comparison is valid because both sides are
        // zero-padded ISO dates. Records without a service date only pass
        // when the range is unbounded on that side.
        if !self.from_date.is_empty() && rec.service_date.as_str() < self.from_date.as_str() {
            return false;
        }
        if !self.to_date.is_empty()
            && (rec.service_date.is_empty() || rec.service_date.as_str() > self.to_date.as_str())
        {
            return false;
        }
        if let Some(status) = self.status {
            if rec.status != status {
                return false;
            }
        }
        if payment_active(&self.payment)
            && !rec.payment_channel.eq_ignore_ascii_case(self.payment.trim())
        {
            return false;
        }
        true
    }
}

fn payment_active(payment: &str) -> bool {
    let trimmed = payment.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("all")
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStateError {
    InvertedDateRange { from: String, to: String },
}

impl std::fmt::Display for FilterStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterStateError::InvertedDateRange { from, to } => {
                write!(f, "from date {} is after to date {}", from, to)
            }
        }
    }
}

impl std::error::Error for FilterStateError {}

// ============================================================================
// FILTER FUNCTIONS
// ============================================================================

/// Apply a filter state over a record collection.
///
/// Pure and deterministic: logical AND across active dimensions, input
/// order preserved, never sorts, never mutates, never fabricates records.
pub fn apply(records: &[BookingRecord], state: &FilterState) -> Vec<BookingRecord> {
    records
        .iter()
        .filter(|rec| state.matches(rec))
        .cloned()
        .collect()
}

/// Borrowing variant for consumers that only need to walk the view
pub fn apply_refs<'a>(
    records: &'a [BookingRecord],
    state: &FilterState,
) -> Vec<&'a BookingRecord> {
    records.iter().filter(|rec| state.matches(rec)).collect()
}

// ============================================================================
// TESTS
// ============================================================================
