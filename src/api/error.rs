use thiserror::Error;

/// A fetch that produced no usable body.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The call exceeded the per-request timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other failure while sending or reading the response.
    #[error("request failed: {0}")]
    Request(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}
