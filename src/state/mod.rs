//! Persisted state.
//!
//! Two small JSON documents survive restarts: the [`AlertState`] owned by the
//! alert policy, and the [`LastKnown`] snapshot the status sink keeps for
//! cold-start display.

mod alert_state;
mod json_file;
mod snapshot;

pub use alert_state::AlertState;
pub use json_file::JsonFile;
pub use snapshot::{ActiveRun, LastKnown};
