use thiserror::Error;
use voidview_core::AppError;

/// Longest upstream body echoed into an error message.
const MAX_BODY_IN_ERROR: usize = 500;

#[derive(Debug, Error)]
pub enum NasaError {
    #[error("HTTP {status} :: {body}")]
    Http { status: u16, body: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid JSON response: {0}")]
    Decode(String),

    #[error("source image exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("{0}")]
    Empty(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl NasaError {
    pub fn http(status: u16, body: &str) -> Self {
        let body = if body.len() > MAX_BODY_IN_ERROR {
            let mut end = MAX_BODY_IN_ERROR;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body.to_string()
        };
        NasaError::Http { status, body }
    }

    /// 408, 429 and any 5xx are worth another attempt, as are timeouts,
    /// dropped connections and truncated bodies. A complete 200 body that is
    /// not the expected JSON will not change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            NasaError::Http { status, .. } => is_retryable_status(*status),
            NasaError::Timeout(_) | NasaError::Transport(_) => true,
            NasaError::Decode(_)
            | NasaError::TooLarge { .. }
            | NasaError::Empty(_)
            | NasaError::Config(_) => false,
        }
    }

    /// Upstream HTTP status, when the failure was an HTTP error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            NasaError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert into the API-level error carrying a route-specific message.
    pub fn into_upstream(self, message: &str) -> AppError {
        AppError::upstream(message, self.status())
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

impl From<reqwest::Error> for NasaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NasaError::Timeout(err.to_string())
        } else if err.is_builder() {
            NasaError::Config(err.to_string())
        } else {
            NasaError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NasaError {
    fn from(err: serde_json::Error) -> Self {
        NasaError::Decode(err.to_string())
    }
}
