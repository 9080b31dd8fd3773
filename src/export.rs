// 📄 CSV Exporter
// Serializes a filtered view into a downloadable CSV artifact

use anyhow::{Context, Result};

use crate::record::{BookingRecord, SourceType};

// ============================================================================
// COLUMN SPECS
// ============================================================================

/// One CSV column: header text plus the record field it renders
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub field: Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    KartaName,
    Email,
    Mobile,
    Address,
    District,
    State,
    Pincode,
    Gotra,
    Nakshatra,
    Raashi,
    SevaName,
    SevaCategory,
    ServiceDate,
    BookedDate,
    Amount,
    PaymentChannel,
    PaymentEvidence,
    TicketId,
    Status,
}

const fn col(header: &'static str, field: Field) -> ColumnSpec {
    ColumnSpec { header, field }
}

/// Seva bookings expose the full devotee profile
pub const SEVA_COLUMNS: &[ColumnSpec] = &[
    col("ID", Field::Id),
    col("Karta Name", Field::KartaName),
    col("Email", Field::Email),
    col("Mobile", Field::Mobile),
    col("Address", Field::Address),
    col("District", Field::District),
    col("State", Field::State),
    col("Pincode", Field::Pincode),
    col("Gotra", Field::Gotra),
    col("Nakshatra", Field::Nakshatra),
    col("Raashi", Field::Raashi),
    col("Seva Name", Field::SevaName),
    col("Category", Field::SevaCategory),
    col("Service Date", Field::ServiceDate),
    col("Amount", Field::Amount),
    col("Payment Method", Field::PaymentChannel),
    col("Payment Screenshot", Field::PaymentEvidence),
    col("Ticket ID", Field::TicketId),
    col("Status", Field::Status),
    col("Booked Date", Field::BookedDate),
];

pub const EVENT_COLUMNS: &[ColumnSpec] = &[
    col("ID", Field::Id),
    col("Name", Field::KartaName),
    col("Email", Field::Email),
    col("Mobile", Field::Mobile),
    col("Pooja", Field::SevaName),
    col("Date", Field::ServiceDate),
    col("Amount", Field::Amount),
    col("Payment", Field::PaymentChannel),
    col("Status", Field::Status),
    col("Booked Date", Field::BookedDate),
];

pub const TEMPLE_COLUMNS: &[ColumnSpec] = &[
    col("ID", Field::Id),
    col("Name", Field::KartaName),
    col("Email", Field::Email),
    col("Mobile", Field::Mobile),
    col("Seva", Field::SevaName),
    col("Date", Field::ServiceDate),
    col("Amount", Field::Amount),
    col("Payment", Field::PaymentChannel),
    col("Status", Field::Status),
];

/// Fixed column order per booking type
pub fn columns_for(source_type: SourceType) -> &'static [ColumnSpec] {
    match source_type {
        SourceType::Seva => SEVA_COLUMNS,
        SourceType::Event => EVENT_COLUMNS,
        SourceType::Temple => TEMPLE_COLUMNS,
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Render one field as CSV cell text. Amounts are plain decimals (no
/// currency symbol) so the column stays spreadsheet-arithmetic-safe; dates
/// are ISO date-only strings.
fn render_field(rec: &BookingRecord, field: Field) -> String {
    match field {
        Field::Id => rec.id.clone(),
        Field::KartaName => rec.karta_name.clone(),
        Field::Email => rec.email.clone(),
        Field::Mobile => rec.mobile.clone(),
        Field::Address => rec.address.clone(),
        Field::District => rec.district.clone(),
        Field::State => rec.state.clone(),
        Field::Pincode => rec.pincode.clone(),
        Field::Gotra => rec.gotra.clone(),
        Field::Nakshatra => rec.nakshatra.clone(),
        Field::Raashi => rec.raashi.clone(),
        Field::SevaName => rec.seva_name.clone(),
        Field::SevaCategory => rec
            .seva_category
            .map(|c| c.name().to_string())
            .unwrap_or_default(),
        Field::ServiceDate => rec.service_date_display(),
        Field::BookedDate => rec.booked_date.clone(),
        Field::Amount => format!("{:.2}", rec.amount),
        Field::PaymentChannel => rec.payment_channel.clone(),
        Field::PaymentEvidence => rec.payment_evidence_ref.clone().unwrap_or_default(),
        Field::TicketId => rec.ticket_id.clone(),
        Field::Status => rec.status.name().to_string(),
    }
}

/// Serialize records under a fixed column spec. Quoting of cells that
/// contain the delimiter (addresses, free text) is handled by the csv
/// writer. The input is never mutated.
pub fn to_csv(records: &[BookingRecord], columns: &[ColumnSpec]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| c.header))
        .context("Failed to write CSV header")?;

    for rec in records {
        writer
            .write_record(columns.iter().map(|c| render_field(rec, c.field)))
            .context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("Failed to flush CSV writer: {}", err))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

// ============================================================================
// DOWNLOAD ARTIFACT
// ============================================================================

/// The downloadable artifact handed to the presentation boundary
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    /// `{seva|event|temple}_bookings.csv`
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

/// Export a filtered view of one booking type
pub fn export_bookings(records: &[BookingRecord], source_type: SourceType) -> Result<CsvExport> {
    let content = to_csv(records, columns_for(source_type))?;
    Ok(CsvExport {
        filename: format!("{}_bookings.csv", source_type.code()),
        mime: "text/csv",
        content,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BookingStatus, SevaCategory};

    fn temple_record(id: &str, amount: f64) -> BookingRecord {
        let mut rec = BookingRecord::empty(SourceType::Temple);
        rec.id = id.to_string();
        rec.karta_name = "Rajesh Kumar".to_string();
        rec.mobile = "9876543210".to_string();
        rec.seva_name = "Archana".to_string();
        rec.service_date = "2025-08-10".to_string();
        rec.amount = amount;
        rec.payment_channel = "QR Code Payment".to_string();
        rec.status = BookingStatus::Pending;
        rec
    }

    #[test]
    fn test_round_trip_row_count_and_amounts() {
        let records = vec![temple_record("t1", 500.0), temple_record("t2", 1234.5)];
        let csv_text = to_csv(&records, TEMPLE_COLUMNS).unwrap();

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), TEMPLE_COLUMNS.len());

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());

        let amount_idx = headers.iter().position(|h| h == "Amount").unwrap();
        assert_eq!(rows[0][amount_idx].parse::<f64>().unwrap(), 500.0);
        assert_eq!(rows[1][amount_idx].parse::<f64>().unwrap(), 1234.5);
    }

    #[test]
    fn test_amount_has_no_currency_symbol() {
        let records = vec![temple_record("t1", 500.0)];
        let csv_text = to_csv(&records, TEMPLE_COLUMNS).unwrap();
        assert!(csv_text.contains("500.00"));
        assert!(!csv_text.contains('₹'));
    }

    #[test]
    fn test_delimiter_in_free_text_is_quoted() {
        let mut rec = temple_record("t1", 100.0);
        rec.karta_name = "Kumar, Rajesh".to_string();
        let csv_text = to_csv(&[rec], TEMPLE_COLUMNS).unwrap();
        assert!(csv_text.contains("\"Kumar, Rajesh\""));

        // Still parses back as a single cell
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Kumar, Rajesh");
    }

    #[test]
    fn test_export_does_not_mutate_input() {
        let records = vec![temple_record("t1", 500.0)];
        let before = records.clone();
        to_csv(&records, TEMPLE_COLUMNS).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn test_export_filenames_per_booking_type() {
        let export = export_bookings(&[], SourceType::Seva).unwrap();
        assert_eq!(export.filename, "seva_bookings.csv");
        assert_eq!(export.mime, "text/csv");

        assert_eq!(
            export_bookings(&[], SourceType::Event).unwrap().filename,
            "event_bookings.csv"
        );
        assert_eq!(
            export_bookings(&[], SourceType::Temple).unwrap().filename,
            "temple_bookings.csv"
        );
    }

    #[test]
    fn test_seva_columns_render_category_and_date_range() {
        let mut rec = BookingRecord::empty(SourceType::Seva);
        rec.id = "s1".to_string();
        rec.seva_name = "Lakshmi Pooja".to_string();
        rec.seva_category = Some(SevaCategory::General);
        rec.service_date = "2025-08-10".to_string();
        rec.service_date_to = Some("2025-08-12".to_string());
        rec.amount = 100.0;

        let csv_text = to_csv(&[rec], SEVA_COLUMNS).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();

        let category_idx = headers.iter().position(|h| h == "Category").unwrap();
        let date_idx = headers.iter().position(|h| h == "Service Date").unwrap();
        assert_eq!(&row[category_idx], "General");
        assert_eq!(&row[date_idx], "2025-08-10 - 2025-08-12");
    }

    #[test]
    fn test_header_only_for_empty_view() {
        let csv_text = to_csv(&[], EVENT_COLUMNS).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), EVENT_COLUMNS.len());
        assert_eq!(reader.records().count(), 0);
    }
}
