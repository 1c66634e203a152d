//! Error taxonomy at the HTTP boundary.
//!
//! Policy: 401 is handled globally by the client (session teardown plus the
//! forced-logout hook) before the error reaches the caller; every other
//! status is handled page-locally. Nothing retries automatically.

use secureshare_core::CoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was obtained (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success response. `message` is the response body when readable.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response arrived but its body did not parse as expected.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Session persistence failed while establishing or tearing down.
    #[error("session error: {0}")]
    Session(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(400)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_gone(&self) -> bool {
        self.status() == Some(410)
    }
}
