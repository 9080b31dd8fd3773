// 🎛️ Status Transition Controller
// Owns the in-memory record set and drives Pending → Approved/Rejected

use std::collections::HashSet;

use crate::aggregate::BookingTotals;
use crate::client::BookingServiceClient;
use crate::filter::{self, FilterState};
use crate::notify::Notifier;
use crate::record::{BookingRecord, BookingStatus, SourceType};
use crate::sources::adapter_for;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Result of one requested status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Remote accepted; local record updated
    Applied,
    /// Remote rejected or unreachable; local record untouched
    Failed,
    /// A request for this record is still outstanding; nothing sent
    Duplicate,
    /// Record already in a terminal status; nothing sent (re-open is the
    /// explicit path out)
    Terminal,
    /// No record with this id in memory; nothing sent
    NotFound,
}

/// Aggregate result of an approve-all batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Pending records selected from the filtered view
    pub selected: usize,
    pub approved: usize,
    pub failed: usize,
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// BookingController - The only writer of the in-memory record set.
///
/// Filter Engine, Aggregator and CSV Exporter are read-only consumers of
/// `records()`; every mutation flows through `refresh` or a status
/// transition here. All remote traffic is strictly sequential: a request is
/// issued only after the previous one's outcome has been applied locally
/// and notified.
pub struct BookingController {
    client: BookingServiceClient,
    records: Vec<BookingRecord>,
    notifier: Notifier,
    in_flight: HashSet<String>,
}

impl BookingController {
    pub fn new(client: BookingServiceClient) -> Self {
        BookingController::with_notifier(client, Notifier::new())
    }

    pub fn with_notifier(client: BookingServiceClient, notifier: Notifier) -> Self {
        BookingController {
            client,
            records: Vec::new(),
            notifier,
            in_flight: HashSet::new(),
        }
    }

    /// The canonical in-memory record set (read-only outside this type)
    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The filtered view the table, totals and exporter all consume
    pub fn filtered(&self, state: &FilterState) -> Vec<BookingRecord> {
        filter::apply(&self.records, state)
    }

    /// Derived totals over the filtered view
    pub fn totals(&self, state: &FilterState) -> BookingTotals {
        BookingTotals::compute(&self.filtered(state))
    }

    // ------------------------------------------------------------------------
    // FETCH
    // ------------------------------------------------------------------------

    /// Unconditionally re-fetch every source collection.
    ///
    /// Best-effort per source: a collection that loads replaces its records,
    /// a collection that fails keeps whatever was already in memory (stale
    /// or empty) and the failure is surfaced as an error notification.
    /// Retry is only ever user-triggered, by calling this again.
    pub async fn refresh(&mut self) -> usize {
        let mut loaded = 0;
        let mut failed_sources = Vec::new();

        for source_type in SourceType::all() {
            match self.client.fetch(adapter_for(source_type)).await {
                Ok(batch) => {
                    loaded += batch.len();
                    self.records.retain(|rec| rec.source_type != source_type);
                    self.records.extend(batch);
                }
                Err(err) => {
                    failed_sources.push(format!("{} ({})", source_type.name(), err));
                }
            }
        }

        if failed_sources.is_empty() {
            self.notifier
                .info(format!("Loaded {} bookings", self.records.len()));
        } else {
            self.notifier
                .error(format!("Failed to load: {}", failed_sources.join("; ")));
        }
        loaded
    }

    // ------------------------------------------------------------------------
    // SINGLE TRANSITIONS
    // ------------------------------------------------------------------------

    /// Request one status change against the owning remote endpoint.
    ///
    /// Guards, in order: unknown id; outstanding request for the same
    /// record; terminal current status (Approved/Rejected leave only via
    /// `reopen`). On remote success the local record is updated and a
    /// success notification emitted; on failure local state is untouched
    /// and the record remains actionable.
    pub async fn set_status(&mut self, id: &str, target: BookingStatus) -> TransitionOutcome {
        let Some(idx) = self.records.iter().position(|rec| rec.id == id) else {
            self.notifier.error(format!("Booking {} not found", id));
            return TransitionOutcome::NotFound;
        };

        if self.in_flight.contains(id) {
            self.notifier
                .warning(format!("Booking {} already has a request in progress", id));
            return TransitionOutcome::Duplicate;
        }

        let current = self.records[idx].status;
        if current.is_terminal() {
            self.notifier.warning(format!(
                "Booking {} is already {}; re-open it first",
                id,
                current.name()
            ));
            return TransitionOutcome::Terminal;
        }

        self.transition(idx, target).await
    }

    /// Explicit path out of a terminal status: back to Pending
    pub async fn reopen(&mut self, id: &str) -> TransitionOutcome {
        let Some(idx) = self.records.iter().position(|rec| rec.id == id) else {
            self.notifier.error(format!("Booking {} not found", id));
            return TransitionOutcome::NotFound;
        };

        if self.in_flight.contains(id) {
            self.notifier
                .warning(format!("Booking {} already has a request in progress", id));
            return TransitionOutcome::Duplicate;
        }

        if !self.records[idx].status.is_terminal() {
            self.notifier
                .info(format!("Booking {} is already pending", id));
            return TransitionOutcome::Terminal;
        }

        self.transition(idx, BookingStatus::Pending).await
    }

    async fn transition(&mut self, idx: usize, target: BookingStatus) -> TransitionOutcome {
        let id = self.records[idx].id.clone();
        let source_type = self.records[idx].source_type;
        self.in_flight.insert(id.clone());

        let result = self
            .client
            .update_status(adapter_for(source_type), &id, target)
            .await;

        self.in_flight.remove(&id);

        match result {
            Ok(()) => {
                self.records[idx].status = target;
                self.notifier
                    .success(format!("Booking {} marked {}", id, target.as_wire()));
                TransitionOutcome::Applied
            }
            Err(err) => {
                self.notifier.error(format!(
                    "Failed to mark booking {} {}: {}",
                    id,
                    target.as_wire(),
                    err
                ));
                TransitionOutcome::Failed
            }
        }
    }

    // ------------------------------------------------------------------------
    // BULK APPROVAL
    // ------------------------------------------------------------------------

    /// Approve every Pending record in the current filtered view.
    ///
    /// Strictly sequential and best-effort: request n+1 is issued only
    /// after request n's outcome has been applied and notified, and one
    /// failure never stops the rest of the batch. There is no rollback of
    /// partially-applied transitions. Finishes with a single aggregate
    /// summary notification; with nothing to approve it short-circuits
    /// with one informational notification and zero requests.
    pub async fn approve_all(&mut self, state: &FilterState) -> BatchSummary {
        let pending_ids: Vec<String> = self
            .records
            .iter()
            .filter(|rec| state.matches(rec) && rec.status == BookingStatus::Pending)
            .map(|rec| rec.id.clone())
            .collect();

        if pending_ids.is_empty() {
            self.notifier
                .info("No pending bookings in the current view");
            return BatchSummary {
                selected: 0,
                approved: 0,
                failed: 0,
            };
        }

        let selected = pending_ids.len();
        let mut approved = 0;
        let mut failed = 0;

        for id in pending_ids {
            match self.set_status(&id, BookingStatus::Approved).await {
                TransitionOutcome::Applied => approved += 1,
                _ => failed += 1,
            }
        }

        if failed == 0 {
            self.notifier.success(format!(
                "Approved {} of {} pending bookings",
                approved, selected
            ));
        } else {
            self.notifier.warning(format!(
                "Approved {} of {} pending bookings ({} failed)",
                approved, selected, failed
            ));
        }

        BatchSummary {
            selected,
            approved,
            failed,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
