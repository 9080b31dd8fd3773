// 🛕 Canonical Booking Record
// One in-memory shape for the three remote booking collections

use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE TYPES
// ============================================================================

/// SourceType - Which remote collection owns a booking record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// Seva bookings (general or event-specific sevas)
    Seva,
    /// Event / pooja bookings
    Event,
    /// Temple walk-in bookings
    Temple,
}

impl SourceType {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            SourceType::Seva => "Seva Bookings",
            SourceType::Event => "Event Bookings",
            SourceType::Temple => "Temple Bookings",
        }
    }

    /// Short code for filenames and internal use
    pub fn code(&self) -> &str {
        match self {
            SourceType::Seva => "seva",
            SourceType::Event => "event",
            SourceType::Temple => "temple",
        }
    }

    pub fn all() -> [SourceType; 3] {
        [SourceType::Seva, SourceType::Event, SourceType::Temple]
    }
}

// ============================================================================
// BOOKING STATUS
// ============================================================================

/// BookingStatus - The only mutable field after creation.
///
/// Approved and Rejected are treated as terminal by the controller; the
/// remote store itself does not enforce terminality, so re-opening goes
/// through an explicit action rather than a plain status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    /// Lowercase form used by the remote update endpoints
    pub fn as_wire(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Display form used in tables and notifications
    pub fn name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
        }
    }

    /// Parse a status in any casing. Unknown or empty input maps to
    /// Pending - a record whose status we cannot read still needs review.
    pub fn parse(s: &str) -> BookingStatus {
        match s.trim().to_lowercase().as_str() {
            "approved" => BookingStatus::Approved,
            "rejected" => BookingStatus::Rejected,
            _ => BookingStatus::Pending,
        }
    }

    /// Terminal statuses cannot be left via a normal transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Approved | BookingStatus::Rejected)
    }
}

// ============================================================================
// SEVA CATEGORY
// ============================================================================

/// SevaCategory - Discriminator on seva bookings; selects which date
/// fields the source record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SevaCategory {
    /// Runs over a from/to date range
    General,
    /// Tied to a single event date
    EventSpecific,
}

impl SevaCategory {
    pub fn name(&self) -> &str {
        match self {
            SevaCategory::General => "General",
            SevaCategory::EventSpecific => "Event Specific",
        }
    }

    /// Parse the discriminator; absent or unknown values fall back to
    /// General (range dates), matching the source system's default.
    pub fn parse(s: &str) -> SevaCategory {
        let lowered = s.trim().to_lowercase();
        if lowered.starts_with("event") {
            SevaCategory::EventSpecific
        } else {
            SevaCategory::General
        }
    }
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// BookingRecord - Canonical post-normalization shape shared by all three
/// sources. All descriptive fields are free-form strings and may be empty;
/// dates are zero-padded ISO (`YYYY-MM-DD`) so lexicographic comparison is
/// a valid date comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Opaque identifier, unique within its source collection
    pub id: String,
    pub source_type: SourceType,

    // Devotee details
    pub karta_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub gotra: String,
    pub nakshatra: String,
    pub raashi: String,

    // Booked item
    pub seva_name: String,
    /// Populated for Seva records only
    pub seva_category: Option<SevaCategory>,
    /// ISO start date of the service
    pub service_date: String,
    /// ISO end date when a General seva spans multiple days
    pub service_date_to: Option<String>,
    /// ISO date the booking was captured; set by the remote system
    pub booked_date: String,

    // Payment
    pub amount: f64,
    /// Per-source vocabulary ("QR Code Payment", "Cash", "Online", ...)
    pub payment_channel: String,
    /// URI of an uploaded proof-of-payment image; online channels only
    pub payment_evidence_ref: Option<String>,
    pub ticket_id: String,

    pub status: BookingStatus,
}

impl BookingRecord {
    /// Empty record for a source; the normalizer fills in whatever the
    /// raw payload actually carries.
    pub fn empty(source_type: SourceType) -> Self {
        BookingRecord {
            id: String::new(),
            source_type,
            karta_name: String::new(),
            email: String::new(),
            mobile: String::new(),
            address: String::new(),
            district: String::new(),
            state: String::new(),
            pincode: String::new(),
            gotra: String::new(),
            nakshatra: String::new(),
            raashi: String::new(),
            seva_name: String::new(),
            seva_category: None,
            service_date: String::new(),
            service_date_to: None,
            booked_date: String::new(),
            amount: 0.0,
            payment_channel: String::new(),
            payment_evidence_ref: None,
            ticket_id: String::new(),
            status: BookingStatus::Pending,
        }
    }

    /// Service date rendered for tables and CSV: single date, or
    /// "from - to" for multi-day General sevas.
    pub fn service_date_display(&self) -> String {
        match &self.service_date_to {
            Some(to) if !to.is_empty() && to != &self.service_date => {
                format!("{} - {}", self.service_date, to)
            }
            _ => self.service_date.clone(),
        }
    }
}

// ============================================================================
// PAYMENT CHANNEL RULE
// ============================================================================

/// Online-channel predicate.
///
/// Only online/pre-paid bookings count toward the online collection total;
/// cash and other offline channels stay visible in the table but are
/// excluded from that metric. This is the single place that rule lives -
/// call sites must use this predicate, not their own string comparisons.
pub fn is_online_channel(channel: &str) -> bool {
    let lowered = channel.to_lowercase();
    lowered.contains("online") || lowered.contains("upi") || lowered.contains("qr")
}

// ============================================================================
// TESTS
// ============================================================================
