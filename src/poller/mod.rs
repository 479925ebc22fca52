//! The poll loop.
//!
//! A [`Poller`] owns at most one background worker. Each tick the worker
//! fetches the endpoint, extracts the signal, lets the alert policy decide and
//! publishes the outcome; then it sleeps for the configured interval while
//! listening for a stop request.

mod config;
mod engine;
mod worker;

pub use config::{MIN_INTERVAL_SECS, Password, PollConfig};
pub use engine::{PollPhase, PollStatus, Poller};
