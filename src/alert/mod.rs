//! Alert policy and its persisted state.
//!
//! The policy decides, for every observed signal, whether the user should be
//! alerted: immediately when the signal flips, again after [`COOLDOWN`] while
//! it stays the same, and never while snoozed.

mod policy;
mod store;

pub use policy::{AlertPolicy, Decision, evaluate};
pub use store::{AlertStore, AlertStoreExt, FileAlertStore, MemoryAlertStore};

#[cfg(test)]
pub use store::MockAlertStore;

use std::time::Duration;

/// Minimum time between two alerts for an unchanged signal.
pub const COOLDOWN: Duration = Duration::from_secs(120);
