use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Shortest allowed pause between two ticks.
pub const MIN_INTERVAL_SECS: u64 = 5;

/// Opaque credential. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a plain-text password.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Plain text, for the auth header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Immutable configuration for one run of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    endpoint: String,
    username: String,
    password: Password,
    interval_secs: u64,
}

impl PollConfig {
    /// Interval values below [`MIN_INTERVAL_SECS`] are kept as given and clamped when sleeping.
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: Password,
        interval_secs: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password,
            interval_secs,
        }
    }

    /// Endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Basic auth user.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Basic auth password.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Interval as configured.
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Pause between ticks, clamped to [`MIN_INTERVAL_SECS`].
    pub fn effective_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(MIN_INTERVAL_SECS))
    }
}
