//! HTTP access to the signal endpoint.

mod client;
mod error;

pub use client::{FETCH_TIMEOUT, Fetcher, HttpFetcher};
pub use error::TransportError;
