//! Trading signal type and body extraction.

mod extractor;

pub use extractor::extract;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ternary classification of the endpoint's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    /// Parse the wire value (`"1"` / `"-1"`); anything else is `None`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "1" => Self::Buy,
            "-1" => Self::Sell,
            _ => Self::None,
        }
    }

    /// Wire value of the signal, if it is actionable.
    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            Self::Buy => Some("1"),
            Self::Sell => Some("-1"),
            Self::None => None,
        }
    }

    /// Whether this is a `Buy` or `Sell`.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Alert title for an actionable signal.
    pub fn alert_title(&self) -> Option<&'static str> {
        match self {
            Self::Buy => Some("buy signal"),
            Self::Sell => Some("sell signal"),
            Self::None => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::None => write!(f, "NONE"),
        }
    }
}
