// 🏗️ Source Adapter Framework
// Per-source strategy for the three remote booking collections

use chrono::{DateTime, NaiveDate};
use serde_json::{json, Value};

use crate::record::{BookingRecord, BookingStatus, SevaCategory, SourceType};

// ============================================================================
// STATUS UPDATE REQUEST
// ============================================================================

/// HTTP method of a status-update endpoint. The three backends do not share
/// a route shape, so the adapter owns the whole request description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    Patch,
    Post,
}

/// A fully-described status-update request: method, path relative to the
/// service base URL, and the JSON envelope the owning backend expects.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRequest {
    pub method: UpdateMethod,
    pub path: String,
    pub body: Value,
}

// ============================================================================
// SOURCE ADAPTER TRAIT
// ============================================================================

/// SourceAdapter - One implementation per remote booking collection.
///
/// The normalizer and the status controller depend only on this interface;
/// nothing outside this module knows the per-source routes, payload
/// envelopes, or raw field vocabulary.
pub trait SourceAdapter: Send + Sync {
    /// Which collection this adapter handles
    fn source_type(&self) -> SourceType;

    /// Fetch route for the full collection, relative to the base URL
    fn list_path(&self) -> &'static str;

    /// Build the status-update request for one record
    fn status_request(&self, id: &str, status: BookingStatus) -> StatusRequest;

    /// Map one raw record into the canonical shape.
    ///
    /// Total by contract: missing or malformed fields become empty strings,
    /// zero, or None. A raw record never causes a failure.
    fn normalize(&self, raw: &Value) -> BookingRecord;
}

/// Look up the adapter for a source type
pub fn adapter_for(source_type: SourceType) -> &'static dyn SourceAdapter {
    match source_type {
        SourceType::Seva => &SevaAdapter,
        SourceType::Event => &EventAdapter,
        SourceType::Temple => &TempleAdapter,
    }
}

// ============================================================================
// RAW FIELD HELPERS
// ============================================================================

/// First non-empty string among the given keys
fn str_field(raw: &Value, keys: &[&str]) -> String {
    for key in keys {
        if let Some(s) = raw.get(*key).and_then(Value::as_str) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    String::new()
}

/// Record identifier: `_id` (document stores) or `id`, accepting numeric ids
fn id_field(raw: &Value) -> String {
    for key in ["_id", "id"] {
        match raw.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// Amount: accepts a JSON number or a currency-decorated string such as
/// "₹100.00" or "1,500". Malformed input becomes 0.0; negative amounts are
/// clamped to zero (amounts are non-negative by contract).
fn amount_field(raw: &Value, keys: &[&str]) -> f64 {
    for key in keys {
        match raw.get(*key) {
            Some(Value::Number(n)) => {
                return n.as_f64().unwrap_or(0.0).max(0.0);
            }
            Some(Value::String(s)) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                if let Ok(v) = cleaned.parse::<f64>() {
                    return v.max(0.0);
                }
            }
            _ => {}
        }
    }
    0.0
}

/// Truncate a date or timestamp to its ISO date-only form.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and bare `YYYY-MM-DDTHH:MM:SS`
/// strings. Anything else passes through trimmed, so an unexpected remote
/// format stays visible rather than silently vanishing.
fn date_only(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().to_string();
    }
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return d.to_string();
        }
    }
    s.to_string()
}

fn date_field(raw: &Value, keys: &[&str]) -> String {
    date_only(&str_field(raw, keys))
}

/// Screenshot/evidence URI; placeholder "-" from legacy payloads means none
fn evidence_field(raw: &Value, keys: &[&str]) -> Option<String> {
    let uri = str_field(raw, keys);
    if uri.is_empty() || uri == "-" {
        None
    } else {
        Some(uri)
    }
}

/// Shared devotee details carried by all three raw shapes
fn fill_devotee_fields(rec: &mut BookingRecord, raw: &Value) {
    rec.karta_name = str_field(raw, &["kartaName", "name"]);
    rec.email = str_field(raw, &["email"]);
    rec.mobile = str_field(raw, &["mobileNumber", "mobile"]);
    rec.address = str_field(raw, &["address"]);
    rec.district = str_field(raw, &["district"]);
    rec.state = str_field(raw, &["state"]);
    rec.pincode = str_field(raw, &["pincode"]);
    rec.gotra = str_field(raw, &["gotra"]);
    rec.nakshatra = str_field(raw, &["nakshatra"]);
    rec.raashi = str_field(raw, &["raashi"]);
}

// ============================================================================
// SEVA ADAPTER
// ============================================================================

/// Seva bookings. The `sevaCategory` discriminator selects the date fields:
/// General sevas run over a fromDate/toDate range, event-specific sevas
/// carry a single eventDate.
pub struct SevaAdapter;

impl SourceAdapter for SevaAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Seva
    }

    fn list_path(&self) -> &'static str {
        "/api/sevabookings"
    }

    fn status_request(&self, id: &str, status: BookingStatus) -> StatusRequest {
        StatusRequest {
            method: UpdateMethod::Put,
            path: format!("/api/sevabookings/{}", id),
            body: json!({ "status": status.as_wire() }),
        }
    }

    fn normalize(&self, raw: &Value) -> BookingRecord {
        let mut rec = BookingRecord::empty(SourceType::Seva);
        rec.id = id_field(raw);
        fill_devotee_fields(&mut rec, raw);

        rec.seva_name = str_field(raw, &["sevaName", "seva"]);
        let category = SevaCategory::parse(&str_field(raw, &["sevaCategory", "category"]));
        rec.seva_category = Some(category);
        match category {
            SevaCategory::General => {
                rec.service_date = date_field(raw, &["fromDate", "date"]);
                let to = date_field(raw, &["toDate"]);
                if !to.is_empty() {
                    rec.service_date_to = Some(to);
                }
            }
            SevaCategory::EventSpecific => {
                rec.service_date = date_field(raw, &["eventDate", "date", "fromDate"]);
            }
        }

        rec.booked_date = date_field(raw, &["createdAt", "bookedAt", "bookedDate"]);
        rec.amount = amount_field(raw, &["amount"]);
        rec.payment_channel = str_field(raw, &["paymentMethod", "payment"]);
        rec.payment_evidence_ref = evidence_field(raw, &["paymentScreenshot", "screenshot"]);
        rec.ticket_id = str_field(raw, &["ticketId"]);
        rec.status = BookingStatus::parse(&str_field(raw, &["status"]));
        rec
    }
}

// ============================================================================
// EVENT ADAPTER
// ============================================================================

/// Event / pooja bookings. Single-date records with a flatter payload.
pub struct EventAdapter;

impl SourceAdapter for EventAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Event
    }

    fn list_path(&self) -> &'static str {
        "/api/eventbookings"
    }

    fn status_request(&self, id: &str, status: BookingStatus) -> StatusRequest {
        StatusRequest {
            method: UpdateMethod::Patch,
            path: format!("/api/eventbookings/{}/status", id),
            body: json!({ "bookingStatus": status.as_wire() }),
        }
    }

    fn normalize(&self, raw: &Value) -> BookingRecord {
        let mut rec = BookingRecord::empty(SourceType::Event);
        rec.id = id_field(raw);
        fill_devotee_fields(&mut rec, raw);

        rec.seva_name = str_field(raw, &["poojaName", "sevaName", "seva", "eventName"]);
        rec.service_date = date_field(raw, &["date", "poojaDate", "eventDate"]);
        rec.booked_date = date_field(raw, &["createdAt", "bookedAt"]);
        rec.amount = amount_field(raw, &["amount"]);
        rec.payment_channel = str_field(raw, &["payment", "paymentType", "paymentMethod"]);
        rec.payment_evidence_ref = evidence_field(raw, &["paymentScreenshot", "screenshot"]);
        rec.ticket_id = str_field(raw, &["ticketId"]);
        rec.status = BookingStatus::parse(&str_field(raw, &["status"]));
        rec
    }
}

// ============================================================================
// TEMPLE ADAPTER
// ============================================================================

/// Temple walk-in bookings. The service date lives on an optional `service`
/// sub-object; when that is absent the booking's own fromDate applies.
pub struct TempleAdapter;

impl SourceAdapter for TempleAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Temple
    }

    fn list_path(&self) -> &'static str {
        "/api/templebookings"
    }

    fn status_request(&self, id: &str, status: BookingStatus) -> StatusRequest {
        StatusRequest {
            method: UpdateMethod::Post,
            path: "/api/templebookings/update-status".to_string(),
            body: json!({ "bookingId": id, "status": status.as_wire() }),
        }
    }

    fn normalize(&self, raw: &Value) -> BookingRecord {
        let mut rec = BookingRecord::empty(SourceType::Temple);
        rec.id = id_field(raw);
        fill_devotee_fields(&mut rec, raw);

        let service = raw.get("service");
        rec.seva_name = service
            .map(|s| str_field(s, &["name", "serviceName"]))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| str_field(raw, &["seva", "serviceName"]));

        // Prefer the service sub-object's date, else the booking's fromDate
        rec.service_date = service
            .map(|s| date_field(s, &["date", "serviceDate"]))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| date_field(raw, &["fromDate", "date"]));

        rec.booked_date = date_field(raw, &["createdAt", "bookedAt"]);
        rec.amount = amount_field(raw, &["amount"]);
        rec.payment_channel = str_field(raw, &["payment", "paymentMethod"]);
        rec.payment_evidence_ref = evidence_field(raw, &["paymentScreenshot", "screenshot"]);
        rec.ticket_id = str_field(raw, &["ticketId"]);
        rec.status = BookingStatus::parse(&str_field(raw, &["status"]));
        rec
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_only_truncates_timestamps() {
        assert_eq!(date_only("2025-08-10"), "2025-08-10");
        assert_eq!(date_only("2025-08-10T12:30:00Z"), "2025-08-10");
        assert_eq!(date_only("2025-08-10T12:30:00+05:30"), "2025-08-10");
        assert_eq!(date_only("2025-08-10T12:30:00"), "2025-08-10");
        assert_eq!(date_only(""), "");
        // Unexpected formats pass through rather than vanishing
        assert_eq!(date_only("10/08/2025"), "10/08/2025");
    }

    #[test]
    fn test_amount_accepts_numbers_and_currency_strings() {
        assert_eq!(amount_field(&json!({ "amount": 500 }), &["amount"]), 500.0);
        assert_eq!(
            amount_field(&json!({ "amount": "₹100.00" }), &["amount"]),
            100.0
        );
        assert_eq!(
            amount_field(&json!({ "amount": "1,500" }), &["amount"]),
            1500.0
        );
        assert_eq!(amount_field(&json!({ "amount": "-" }), &["amount"]), 0.0);
        assert_eq!(amount_field(&json!({}), &["amount"]), 0.0);
        // Negative amounts clamp to zero
        assert_eq!(amount_field(&json!({ "amount": -50 }), &["amount"]), 0.0);
    }

    #[test]
    fn test_normalize_never_fails_on_empty_payload() {
        for source_type in SourceType::all() {
            let rec = adapter_for(source_type).normalize(&json!({}));
            assert_eq!(rec.source_type, source_type);
            assert_eq!(rec.id, "");
            assert_eq!(rec.amount, 0.0);
            assert_eq!(rec.status, BookingStatus::Pending);
        }
    }

    #[test]
    fn test_seva_normalize_general_range() {
        let raw = json!({
            "_id": "s1",
            "kartaName": "Teja",
            "mobileNumber": "9876543210",
            "sevaName": "Lakshmi Pooja",
            "sevaCategory": "General",
            "fromDate": "2025-08-10T00:00:00Z",
            "toDate": "2025-08-12T00:00:00Z",
            "amount": "₹100.00",
            "paymentMethod": "QR Code - Online",
            "paymentScreenshot": "https://cdn.example.com/proof.jpg",
            "ticketId": "ZJH0DAH",
            "status": "Pending",
            "createdAt": "2025-08-01T09:15:00Z"
        });
        let rec = SevaAdapter.normalize(&raw);
        assert_eq!(rec.id, "s1");
        assert_eq!(rec.karta_name, "Teja");
        assert_eq!(rec.seva_category, Some(SevaCategory::General));
        assert_eq!(rec.service_date, "2025-08-10");
        assert_eq!(rec.service_date_to.as_deref(), Some("2025-08-12"));
        assert_eq!(rec.booked_date, "2025-08-01");
        assert_eq!(rec.amount, 100.0);
        assert_eq!(
            rec.payment_evidence_ref.as_deref(),
            Some("https://cdn.example.com/proof.jpg")
        );
        assert_eq!(rec.status, BookingStatus::Pending);
    }

    #[test]
    fn test_seva_normalize_event_specific_single_date() {
        let raw = json!({
            "_id": "s2",
            "sevaCategory": "Event Specific",
            "eventDate": "2025-09-01",
            "fromDate": "2025-08-01",
            "status": "approved"
        });
        let rec = SevaAdapter.normalize(&raw);
        assert_eq!(rec.seva_category, Some(SevaCategory::EventSpecific));
        assert_eq!(rec.service_date, "2025-09-01");
        assert_eq!(rec.service_date_to, None);
        assert_eq!(rec.status, BookingStatus::Approved);
    }

    #[test]
    fn test_seva_normalize_missing_discriminator_defaults_to_general() {
        let raw = json!({ "_id": "s3", "fromDate": "2025-08-05" });
        let rec = SevaAdapter.normalize(&raw);
        assert_eq!(rec.seva_category, Some(SevaCategory::General));
        assert_eq!(rec.service_date, "2025-08-05");
    }

    #[test]
    fn test_temple_normalize_prefers_service_sub_object_date() {
        let raw = json!({
            "_id": "t1",
            "name": "Rajesh Kumar",
            "service": { "name": "Archana", "date": "2025-08-10T06:00:00Z" },
            "fromDate": "2025-08-01",
            "amount": 500,
            "payment": "QR Code Payment",
            "status": "Approved"
        });
        let rec = TempleAdapter.normalize(&raw);
        assert_eq!(rec.seva_name, "Archana");
        assert_eq!(rec.service_date, "2025-08-10");
        assert_eq!(rec.amount, 500.0);
    }

    #[test]
    fn test_temple_normalize_falls_back_to_from_date() {
        let raw = json!({ "_id": "t2", "seva": "Abhishekam", "fromDate": "2025-08-08" });
        let rec = TempleAdapter.normalize(&raw);
        assert_eq!(rec.seva_name, "Abhishekam");
        assert_eq!(rec.service_date, "2025-08-08");
    }

    #[test]
    fn test_event_normalize() {
        let raw = json!({
            "id": 4,
            "name": "Maruthi",
            "mobile": "9618591044",
            "poojaName": "Ganapati Pooja",
            "date": "2025-07-01",
            "amount": 100.0,
            "payment": "QR Code Payment",
            "status": "Approved"
        });
        let rec = EventAdapter.normalize(&raw);
        assert_eq!(rec.id, "4");
        assert_eq!(rec.seva_name, "Ganapati Pooja");
        assert_eq!(rec.payment_channel, "QR Code Payment");
        assert_eq!(rec.status, BookingStatus::Approved);
    }

    #[test]
    fn test_evidence_placeholder_dash_is_none() {
        let raw = json!({ "_id": "s4", "paymentScreenshot": "-" });
        let rec = SevaAdapter.normalize(&raw);
        assert_eq!(rec.payment_evidence_ref, None);
    }

    #[test]
    fn test_status_routes_diverge_per_source() {
        let seva = SevaAdapter.status_request("abc", BookingStatus::Approved);
        assert_eq!(seva.method, UpdateMethod::Put);
        assert_eq!(seva.path, "/api/sevabookings/abc");
        assert_eq!(seva.body, json!({ "status": "approved" }));

        let event = EventAdapter.status_request("7", BookingStatus::Rejected);
        assert_eq!(event.method, UpdateMethod::Patch);
        assert_eq!(event.path, "/api/eventbookings/7/status");
        assert_eq!(event.body, json!({ "bookingStatus": "rejected" }));

        let temple = TempleAdapter.status_request("t9", BookingStatus::Pending);
        assert_eq!(temple.method, UpdateMethod::Post);
        assert_eq!(temple.path, "/api/templebookings/update-status");
        assert_eq!(temple.body, json!({ "bookingId": "t9", "status": "pending" }));
    }
}
