// Booking Console - Core Library
// Review & approval workflow over the remote temple booking service

pub mod aggregate;
pub mod client;
pub mod controller;
pub mod export;
pub mod filter;
pub mod notify;
pub mod record;
pub mod sources;

// Re-export commonly used types
pub use aggregate::{online_only, total, total_where, BookingTotals};
pub use client::{BookingServiceClient, ClientError};
pub use controller::{BatchSummary, BookingController, TransitionOutcome};
pub use export::{columns_for, export_bookings, to_csv, ColumnSpec, CsvExport, Field};
pub use filter::{apply, apply_refs, FilterState, FilterStateError};
pub use notify::{Notification, Notifier, Severity};
pub use record::{
    is_online_channel, BookingRecord, BookingStatus, SevaCategory, SourceType,
};
pub use sources::{adapter_for, SourceAdapter, StatusRequest, UpdateMethod};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
