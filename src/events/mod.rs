//! Events published by the poll loop.
//!
//! The loop never reaches into its consumers: everything it has to say goes
//! through one unbounded channel of [`PollEvent`]s, so sending never blocks
//! a tick.

use crate::signal::Signal;
use crate::state::ActiveRun;
use tokio::sync::mpsc;

/// Receiving half handed to the status sink.
pub type EventReceiver = mpsc::UnboundedReceiver<PollEvent>;

/// Sending half owned by the poll loop.
pub type EventSender = mpsc::UnboundedSender<PollEvent>;

/// Create the event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Everything the poll loop reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A run began with this configuration.
    Started(ActiveRun),
    /// Outcome of one tick. Sent exactly once per tick.
    Status(StatusEvent),
    /// The user should be alerted.
    Alert(Alert),
    /// The run ended.
    Stopped,
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Trimmed response body; empty when the fetch failed.
    pub raw_body: String,
    /// Extracted signal; `None` when the fetch failed.
    pub signal: Signal,
    /// Actionable and different from the previously recorded signal.
    pub changed: bool,
    /// Transport error of a failed fetch.
    pub error: Option<String>,
    /// When the tick completed (epoch millis).
    pub at_ms: i64,
}

impl StatusEvent {
    pub fn success(raw_body: String, signal: Signal, changed: bool, at_ms: i64) -> Self {
        Self {
            raw_body,
            signal,
            changed,
            error: None,
            at_ms,
        }
    }

    pub fn failure(error: impl ToString, at_ms: i64) -> Self {
        Self {
            raw_body: String::new(),
            signal: Signal::None,
            changed: false,
            error: Some(error.to_string()),
            at_ms,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// One-line summary: the body, or the error text.
    pub fn summary(&self) -> String {
        match &self.error {
            Some(e) => format!("error: {}", e),
            None => self.raw_body.clone(),
        }
    }
}

/// A user-facing alert. Delivery is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub signal: Signal,
    pub at_ms: i64,
}

impl Alert {
    /// Build the alert for an actionable signal.
    pub fn for_signal(signal: Signal, at_ms: i64) -> Option<Self> {
        let title = signal.alert_title()?;
        let wire = signal.as_wire()?;
        Some(Self {
            title: title.to_string(),
            message: format!("new signal: {}", wire),
            signal,
            at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alert_titles() {
        let buy = Alert::for_signal(Signal::Buy, 1).unwrap();
        assert_eq!(buy.title, "buy signal");
        assert_eq!(buy.message, "new signal: 1");

        let sell = Alert::for_signal(Signal::Sell, 1).unwrap();
        assert_eq!(sell.title, "sell signal");
        assert_eq!(sell.message, "new signal: -1");

        assert!(Alert::for_signal(Signal::None, 1).is_none());
    }

    #[test]
    fn test_failure_event_shape() {
        let event = StatusEvent::failure("request timed out", 7);
        assert!(event.is_error());
        assert_eq!(event.signal, Signal::None);
        assert!(!event.changed);
        assert_eq!(event.summary(), "error: request timed out");
    }
}
