//! Persistence interface for [`AlertState`].

use crate::error::{Error, Result};
use crate::state::{AlertState, JsonFile};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Read/write access to the persisted alert state.
///
/// Both operations are expected to be fast relative to the poll cadence.
/// Callers treat failures as best effort.
#[cfg_attr(test, mockall::automock)]
pub trait AlertStore: Send + Sync {
    fn get(&self) -> Result<AlertState>;

    fn set(&self, state: &AlertState) -> Result<()>;
}

/// Snooze controls layered on any [`AlertStore`].
pub trait AlertStoreExt: AlertStore {
    /// Suppress alerts until `until_ms` (epoch millis).
    fn snooze_until(&self, until_ms: i64) -> Result<AlertState> {
        let mut state = self.get()?;
        state.snoozed_until_ms = until_ms;
        self.set(&state)?;
        Ok(state)
    }

    /// Suppress alerts for `duration` starting at `now_ms`.
    fn snooze_for(&self, duration: Duration, now_ms: i64) -> Result<AlertState> {
        let millis = i64::try_from(duration.as_millis())
            .map_err(|_| Error::invalid_input("snooze duration too large"))?;
        self.snooze_until(now_ms.saturating_add(millis))
    }

    /// Lift any active snooze.
    fn clear_snooze(&self) -> Result<AlertState> {
        self.snooze_until(0)
    }
}

impl<S: AlertStore + ?Sized> AlertStoreExt for S {}

/// Alert state kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileAlertStore {
    file: JsonFile<AlertState>,
}

impl FileAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl AlertStore for FileAlertStore {
    fn get(&self) -> Result<AlertState> {
        self.file.load()
    }

    fn set(&self, state: &AlertState) -> Result<()> {
        self.file.save(state)
    }
}

/// Process-local alert state, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryAlertStore {
    inner: Mutex<AlertState>,
}

impl MemoryAlertStore {
    pub fn new(state: AlertState) -> Self {
        Self {
            inner: Mutex::new(state),
        }
    }
}

impl AlertStore for MemoryAlertStore {
    fn get(&self) -> Result<AlertState> {
        self.inner
            .lock()
            .map(|state| *state)
            .map_err(|e| Error::persistence(e.to_string()))
    }

    fn set(&self, state: &AlertState) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| Error::persistence(e.to_string()))?;
        *guard = *state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alert_state.json");

        let state = AlertState {
            last_signal: Some(Signal::Buy),
            last_notified_at_ms: 1_700_000_000_000,
            snoozed_until_ms: 0,
        };
        FileAlertStore::new(&path).set(&state).unwrap();

        let reopened = FileAlertStore::new(&path);
        assert_eq!(reopened.get().unwrap(), state);
    }

    #[test]
    fn test_snooze_preserves_other_fields() {
        let store = MemoryAlertStore::new(AlertState {
            last_signal: Some(Signal::Sell),
            last_notified_at_ms: 500,
            snoozed_until_ms: 0,
        });

        let state = store.snooze_for(Duration::from_secs(60), 1_000).unwrap();
        assert_eq!(state.snoozed_until_ms, 61_000);
        assert_eq!(state.last_signal, Some(Signal::Sell));
        assert_eq!(state.last_notified_at_ms, 500);
        assert_eq!(store.get().unwrap(), state);

        let cleared = store.clear_snooze().unwrap();
        assert_eq!(cleared.snoozed_until_ms, 0);
    }

    #[test]
    fn test_snooze_on_trait_object() {
        let store: Box<dyn AlertStore> = Box::new(MemoryAlertStore::default());
        store.snooze_until(42).unwrap();
        assert_eq!(store.get().unwrap().snoozed_until_ms, 42);
    }
}
