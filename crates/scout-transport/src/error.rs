//! Error taxonomy for remote API calls.
//!
//! The retry policy only ever retries [`ApiError::Transient`]. Bad credentials
//! or bad parameters come back as 4xx and are fatal immediately; a response
//! body that does not decode is reported as such and not retried either.

use std::fmt;

/// A failed remote API call.
#[derive(Debug)]
pub enum ApiError {
    /// Timeouts, connection resets, 408/429/5xx. Worth retrying.
    Transient(String),
    /// 4xx responses other than 408/429: bad auth or bad parameters.
    Fatal { status: u16, message: String },
    /// The response arrived but its body was not the expected JSON shape.
    Decode(String),
}

impl ApiError {
    /// Whether the retry loop should try this call again.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient(_))
    }

    /// Classify a `ureq` error into the taxonomy.
    pub fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, resp) if code == 408 || code == 429 || code >= 500 => {
                ApiError::Transient(format!("http {} {}", code, resp.status_text()))
            }
            ureq::Error::Status(code, resp) => ApiError::Fatal {
                status: code,
                message: resp.status_text().to_string(),
            },
            ureq::Error::Transport(t) => ApiError::Transient(t.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transient(msg) => write!(f, "transient network error: {}", msg),
            ApiError::Fatal { status, message } => {
                write!(f, "request rejected ({}): {}", status, message)
            }
            ApiError::Decode(msg) => write!(f, "unexpected response body: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
