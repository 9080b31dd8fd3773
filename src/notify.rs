// 🔔 Notification Channel
// Transient, timed feedback messages for fetch/mutate outcomes

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn name(&self) -> &str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

// ============================================================================
// NOTIFICATION
// ============================================================================

/// One transient message. Visible immediately, gone once the deadline
/// passes. A new notification replaces a still-visible one; there is no
/// queue and no history.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    deadline: Instant,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.deadline
    }
}

// ============================================================================
// NOTIFIER
// ============================================================================

/// Single-slot notifier with a fixed auto-dismiss duration.
///
/// Every message is also mirrored to the tracing log, so outcomes stay
/// observable after the toast itself has expired.
#[derive(Debug)]
pub struct Notifier {
    current: Option<Notification>,
    ttl: Duration,
    emitted: u64,
}

pub const DEFAULT_TTL: Duration = Duration::from_secs(4);

impl Notifier {
    pub fn new() -> Self {
        Notifier::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Notifier {
            current: None,
            ttl,
            emitted: 0,
        }
    }

    /// Emit a notification, replacing any still-visible one
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Error => error!(target: "booking_console", "{}", message),
            Severity::Warning => warn!(target: "booking_console", "{}", message),
            _ => info!(target: "booking_console", "{}", message),
        }
        self.current = Some(Notification {
            message,
            severity,
            deadline: Instant::now() + self.ttl,
        });
        self.emitted += 1;
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Info);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Warning);
    }

    /// The currently visible notification, if it has not yet auto-dismissed
    pub fn current(&self) -> Option<&Notification> {
        match &self.current {
            Some(n) if !n.is_expired() => Some(n),
            _ => None,
        }
    }

    /// Total messages emitted since construction (instrumentation only;
    /// message bodies are not retained)
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_visible_immediately() {
        let mut notifier = Notifier::new();
        notifier.success("booking approved");
        let current = notifier.current().expect("notification should be visible");
        assert_eq!(current.message, "booking approved");
        assert_eq!(current.severity, Severity::Success);
    }

    #[test]
    fn test_new_notification_replaces_visible_one() {
        let mut notifier = Notifier::new();
        notifier.info("loading bookings");
        notifier.error("fetch failed");
        let current = notifier.current().expect("replacement should be visible");
        assert_eq!(current.message, "fetch failed");
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(notifier.emitted_count(), 2);
    }

    #[test]
    fn test_auto_dismiss_after_ttl() {
        let mut notifier = Notifier::with_ttl(Duration::from_millis(1));
        notifier.warning("range is inverted");
        std::thread::sleep(Duration::from_millis(5));
        assert!(notifier.current().is_none());
        // Dismissal does not rewind the emission counter
        assert_eq!(notifier.emitted_count(), 1);
    }

    #[test]
    fn test_starts_empty() {
        let notifier = Notifier::new();
        assert!(notifier.current().is_none());
        assert_eq!(notifier.emitted_count(), 0);
    }
}
