//! "Last known" status kept for cold-start display.

use serde::{Deserialize, Serialize};

/// The run that is (or was last seen) active. The password is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRun {
    pub endpoint: String,
    pub username: String,
    pub interval_secs: u64,
}

/// Snapshot written by the status sink after every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastKnown {
    /// Present while a poll loop is running.
    pub active: Option<ActiveRun>,
    /// Last response body, or the error text of a failed tick.
    pub last_response: Option<String>,
    /// When the snapshot was last written (epoch millis).
    pub updated_at_ms: i64,
}
