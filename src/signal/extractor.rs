//! Response body → [`Signal`].
//!
//! The endpoint answers either with a JSON object carrying a `data` field or
//! with a bare `1` / `-1`. The structured form is tried first; if it does not
//! resolve to a signal the trimmed raw body is matched instead.

use super::Signal;
use serde_json::Value;

/// Extract the signal from a response body. Never fails.
pub fn extract(body: &str) -> Signal {
    match data_field(body).map(|data| Signal::from_wire(&data)) {
        Some(signal) if signal.is_actionable() => signal,
        _ => Signal::from_wire(body.trim()),
    }
}

/// The `data` field of a JSON object body, normalised to a string.
///
/// Numbers are truncated to an integer first so `1.0` reads as `"1"`.
fn data_field(body: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return None;
    };

    match map.get("data")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(|i| i.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}
