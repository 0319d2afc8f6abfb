//! Error types module
//!
//! This module provides the core error types used throughout VoidView.
//! All request-level failures are unified under the `AppError` enum, which
//! knows how it should be presented to clients through `ErrorMetadata`.

use serde_json::Value;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream hiccups and unusable sources
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A NASA API call failed after retries. `status` is the last upstream
    /// HTTP status when one was received.
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        details: Option<Value>,
    },

    /// Decoding, resizing or encoding a source image failed.
    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        details: Option<String>,
        source_url: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn upstream(message: impl Into<String>, status: Option<u16>) -> Self {
        AppError::Upstream {
            message: message.into(),
            status,
            details: None,
        }
    }

    pub fn upstream_with_details(message: impl Into<String>, details: Value) -> Self {
        AppError::Upstream {
            message: message.into(),
            status: None,
            details: Some(details),
        }
    }

    pub fn image_processing(
        message: impl Into<String>,
        details: impl Into<String>,
        source_url: Option<String>,
    ) -> Self {
        AppError::ImageProcessing {
            message: message.into(),
            details: Some(details.into()),
            source_url,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Upstream { .. } => (
            502,
            "UPSTREAM_ERROR",
            true,
            Some("NASA APIs may be slow or rate limited; retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::ImageProcessing { .. } => (
            500,
            "IMAGE_PROCESSING_ERROR",
            true,
            Some("Try a different size or fit mode"),
            false,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the NASA id exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Upstream { .. } => "Upstream",
            AppError::ImageProcessing { .. } => "ImageProcessing",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Upstream HTTP status carried by the error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Structured details that belong to the response contract of the route
    /// that raised the error. These are returned in every environment.
    pub fn public_details(&self) -> Option<Value> {
        match self {
            AppError::Upstream { details, .. } => details.clone(),
            AppError::ImageProcessing { details, .. } => {
                details.as_ref().map(|d| Value::String(d.clone()))
            }
            _ => None,
        }
    }

    pub fn source_url(&self) -> Option<&str> {
        match self {
            AppError::ImageProcessing { source_url, .. } => source_url.as_deref(),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Upstream { message, .. } => message.clone(),
            AppError::ImageProcessing { message, .. } => message.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
