//! # sigwatch - signal endpoint watcher
//!
//! Polls an HTTP endpoint on a fixed interval, reads a buy/sell signal out of
//! the response and decides when the user should be alerted.
//!
//! ## Architecture
//!
//! - **API**: authenticated fetch of the raw response body
//! - **Signal**: body → `Buy` / `Sell` / `None`
//! - **Alert**: change/cooldown/snooze policy over persisted state
//! - **Poller**: the cancellable tick loop, publishing events
//! - **Sink**: default consumer of those events for the CLI
//! - **Config**: configuration management

pub mod alert;
pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod poller;
pub mod signal;
pub mod sink;
pub mod state;
pub mod time;

pub use alert::{AlertPolicy, AlertStore, AlertStoreExt, COOLDOWN};
pub use api::{Fetcher, HttpFetcher, TransportError};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{Alert, PollEvent, StatusEvent};
pub use poller::{PollConfig, PollPhase, PollStatus, Poller};
pub use signal::Signal;
pub use state::AlertState;
