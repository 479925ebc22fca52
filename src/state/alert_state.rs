//! Alert bookkeeping that outlives the process.

use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Persisted alert state.
///
/// `last_signal` only ever holds `Buy` or `Sell`; once set it is overwritten
/// by a newer actionable signal and never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertState {
    /// Last actionable signal observed.
    pub last_signal: Option<Signal>,
    /// When the last alert was emitted (epoch millis).
    pub last_notified_at_ms: i64,
    /// Alerts are suppressed until this instant (epoch millis, 0 = never).
    pub snoozed_until_ms: i64,
}

impl AlertState {
    /// Whether alerts are suppressed at `now_ms`.
    pub fn is_snoozed(&self, now_ms: i64) -> bool {
        now_ms < self.snoozed_until_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_default() {
        let state: AlertState = serde_json::from_str(r#"{"last_signal":"sell"}"#).unwrap();
        assert_eq!(
            state,
            AlertState {
                last_signal: Some(Signal::Sell),
                last_notified_at_ms: 0,
                snoozed_until_ms: 0,
            }
        );
    }

    #[test]
    fn test_snooze_window() {
        let state = AlertState {
            snoozed_until_ms: 1_000,
            ..Default::default()
        };
        assert!(state.is_snoozed(999));
        assert!(!state.is_snoozed(1_000));
    }
}
