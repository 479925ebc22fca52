use super::{AlertStore, COOLDOWN};
use crate::signal::Signal;
use crate::state::AlertState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of evaluating one observed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Emit a user alert.
    pub notify: bool,
    /// The signal is actionable and differs from the previous `last_signal`.
    pub changed: bool,
    /// State to persist.
    pub state: AlertState,
}

/// Evaluate `signal` observed at `now_ms` with the default [`COOLDOWN`].
pub fn evaluate(signal: Signal, now_ms: i64, state: &AlertState) -> Decision {
    evaluate_with_cooldown(signal, now_ms, state, COOLDOWN)
}

fn evaluate_with_cooldown(
    signal: Signal,
    now_ms: i64,
    state: &AlertState,
    cooldown: Duration,
) -> Decision {
    if !signal.is_actionable() {
        return Decision {
            notify: false,
            changed: false,
            state: *state,
        };
    }

    let mut updated = *state;
    let changed = state.last_signal != Some(signal);
    if changed {
        updated.last_signal = Some(signal);
    }

    let cooldown_ms = i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX);
    let cooled_down = now_ms.saturating_sub(state.last_notified_at_ms) >= cooldown_ms;
    let notify = !state.is_snoozed(now_ms) && (changed || cooled_down);

    if notify {
        // Never move backwards if the wall clock does.
        updated.last_notified_at_ms = state.last_notified_at_ms.max(now_ms);
    }

    Decision {
        notify,
        changed,
        state: updated,
    }
}

/// Alert policy bound to its persistence store.
///
/// The store is the only owner of [`AlertState`]; the policy reads it, decides
/// and writes back. Store failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct AlertPolicy {
    store: Arc<dyn AlertStore>,
    cooldown: Duration,
}

impl AlertPolicy {
    /// Policy using the default [`COOLDOWN`].
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self {
            store,
            cooldown: COOLDOWN,
        }
    }

    /// Override the re-alert cooldown.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Effective re-alert cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Pure evaluation against an explicit state.
    pub fn evaluate(&self, signal: Signal, now_ms: i64, state: &AlertState) -> Decision {
        evaluate_with_cooldown(signal, now_ms, state, self.cooldown)
    }

    /// Current persisted state, or the default if it cannot be read.
    pub fn state(&self) -> AlertState {
        self.store.get().unwrap_or_else(|e| {
            warn!("Failed to read alert state, using defaults: {}", e);
            AlertState::default()
        })
    }

    /// Evaluate against the persisted state and write back any change.
    pub fn observe(&self, signal: Signal, now_ms: i64) -> Decision {
        let current = self.state();
        let decision = self.evaluate(signal, now_ms, &current);

        if decision.state != current {
            debug!(state = ?decision.state, "Persisting alert state");
            if let Err(e) = self.store.set(&decision.state) {
                warn!("Failed to persist alert state: {}", e);
            }
        }

        decision
    }
}

impl std::fmt::Debug for AlertPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertPolicy")
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{MemoryAlertStore, MockAlertStore};
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_700_000_000_000;

    fn state(last: Option<Signal>, notified: i64, snoozed: i64) -> AlertState {
        AlertState {
            last_signal: last,
            last_notified_at_ms: notified,
            snoozed_until_ms: snoozed,
        }
    }

    #[test]
    fn test_none_never_mutates() {
        let before = state(Some(Signal::Buy), NOW - 500_000, 0);
        let decision = evaluate(Signal::None, NOW, &before);
        assert!(!decision.notify);
        assert!(!decision.changed);
        assert_eq!(decision.state, before);

        let fresh = AlertState::default();
        assert_eq!(evaluate(Signal::None, NOW, &fresh).state, fresh);
    }

    #[test]
    fn test_change_notifies_immediately() {
        let decision = evaluate(Signal::Sell, NOW, &state(Some(Signal::Buy), NOW - 1, 0));
        assert!(decision.notify);
        assert!(decision.changed);
        assert_eq!(decision.state, state(Some(Signal::Sell), NOW, 0));
    }

    #[test]
    fn test_first_signal_counts_as_change() {
        let decision = evaluate(Signal::Buy, NOW, &AlertState::default());
        assert!(decision.notify);
        assert!(decision.changed);
        assert_eq!(decision.state.last_signal, Some(Signal::Buy));
    }

    #[test]
    fn test_unchanged_within_cooldown_is_idempotent() {
        let before = state(Some(Signal::Buy), NOW - 119_000, 0);
        let decision = evaluate(Signal::Buy, NOW, &before);
        assert!(!decision.notify);
        assert!(!decision.changed);
        assert_eq!(decision.state, before);
    }

    #[test]
    fn test_unchanged_after_cooldown_reminds() {
        let decision = evaluate(Signal::Buy, NOW, &state(Some(Signal::Buy), NOW - 121_000, 0));
        assert!(decision.notify);
        assert!(!decision.changed);
        assert_eq!(decision.state.last_notified_at_ms, NOW);

        // exactly at the boundary
        let decision = evaluate(Signal::Buy, NOW, &state(Some(Signal::Buy), NOW - 120_000, 0));
        assert!(decision.notify);
    }

    #[test]
    fn test_snooze_overrides_change() {
        let decision = evaluate(
            Signal::Sell,
            NOW,
            &state(Some(Signal::Buy), NOW - 1_000_000, NOW + 1),
        );
        assert!(!decision.notify);
        assert!(decision.changed);
        // the flip is still recorded
        assert_eq!(
            decision.state,
            state(Some(Signal::Sell), NOW - 1_000_000, NOW + 1)
        );
    }

    #[test]
    fn test_snooze_expired() {
        let decision = evaluate(Signal::Sell, NOW, &state(Some(Signal::Buy), 0, NOW));
        assert!(decision.notify);
    }

    #[test]
    fn test_notified_at_is_monotonic() {
        let before = state(Some(Signal::Buy), NOW + 60_000, 0);
        let decision = evaluate(Signal::Sell, NOW, &before);
        assert!(decision.notify);
        assert_eq!(decision.state.last_notified_at_ms, NOW + 60_000);
    }

    #[test]
    fn test_custom_cooldown() {
        let policy = AlertPolicy::new(Arc::new(MemoryAlertStore::default()))
            .with_cooldown(Duration::from_secs(10));
        assert_eq!(policy.cooldown(), Duration::from_secs(10));
        let before = state(Some(Signal::Buy), NOW - 10_000, 0);
        assert!(policy.evaluate(Signal::Buy, NOW, &before).notify);
    }

    #[test]
    fn test_observe_persists_changes() {
        let store = Arc::new(MemoryAlertStore::default());
        let policy = AlertPolicy::new(store.clone());

        assert!(policy.observe(Signal::Buy, NOW).notify);
        assert!(!policy.observe(Signal::Buy, NOW + 1_000).notify);
        assert!(!policy.observe(Signal::None, NOW + 2_000).notify);

        assert_eq!(store.get().unwrap(), state(Some(Signal::Buy), NOW, 0));
    }

    #[test]
    fn test_observe_skips_write_when_unchanged() {
        let mut store = MockAlertStore::new();
        store
            .expect_get()
            .returning(|| Ok(state(Some(Signal::Buy), NOW - 1_000, 0)));
        store.expect_set().never();

        let policy = AlertPolicy::new(Arc::new(store));
        let decision = policy.observe(Signal::Buy, NOW);
        assert!(!decision.notify);
    }

    #[test]
    fn test_observe_tolerates_store_failures() {
        let mut store = MockAlertStore::new();
        store
            .expect_get()
            .returning(|| Err(Error::persistence("disk gone")));
        store
            .expect_set()
            .times(1)
            .returning(|_| Err(Error::persistence("disk gone")));

        let policy = AlertPolicy::new(Arc::new(store));
        let decision = policy.observe(Signal::Sell, NOW);
        assert!(decision.notify);
        assert!(decision.changed);
    }
}
