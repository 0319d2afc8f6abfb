//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and raise
//! `AppError` (or anything that converts into it) with `?`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use voidview_core::{AppError, ErrorMetadata, LogLevel};
pub use voidview_infra::ErrorResponse;

static IS_PRODUCTION: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.eq_ignore_ascii_case("production") || env.eq_ignore_ascii_case("prod"))
        .unwrap_or(false)
});

/// Wrapper so `AppError` (from voidview-core) can implement `IntoResponse`.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Rejected JSON body");
        HttpAppError(AppError::InvalidInput("Invalid request body".to_string()))
    }
}

impl From<QueryRejection> for HttpAppError {
    fn from(rejection: QueryRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid query string: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that answers malformed bodies with our error shape.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

/// Query string extractor with the same error shape as [`ValidatedJson`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedQuery(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let upstream_status = error.upstream_status();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, upstream_status, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, upstream_status, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, upstream_status, "Error occurred");
        }
    }
}

/// Build the response body. Route details are part of each route's contract
/// and always sent; the debug error chain is only sent outside production and
/// never for sensitive errors.
pub fn error_body(app_error: &AppError, is_production: bool) -> ErrorResponse {
    let show_debug = !is_production && !app_error.is_sensitive();
    let details = app_error.public_details().or_else(|| {
        show_debug.then(|| serde_json::Value::String(app_error.detailed_message()))
    });

    ErrorResponse {
        error: app_error.client_message(),
        details,
        error_type: show_debug.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
        status: app_error.upstream_status(),
        source_url: app_error.source_url().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, *IS_PRODUCTION))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_body_carries_status() {
        let body = error_body(
            &AppError::upstream("Failed to fetch NASA feed", Some(503)),
            true,
        );
        assert_eq!(body.error, "Failed to fetch NASA feed");
        assert_eq!(body.status, Some(503));
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }

    #[test]
    fn test_route_details_survive_production() {
        let err = AppError::upstream_with_details(
            "Failed to fetch APOD (and fallback failed)",
            json!({"hd": "a", "nonHd": "b", "fallback": "c"}),
        );
        let body = error_body(&err, true);
        assert_eq!(body.details.unwrap()["nonHd"], "b");
    }

    #[test]
    fn test_processing_error_keeps_source_url() {
        let err = AppError::image_processing(
            "Wallpaper generation failed",
            "decode failed",
            Some("https://images-assets.nasa.gov/a~large.jpg".to_string()),
        );
        let body = error_body(&err, true);
        assert_eq!(body.details, Some(json!("decode failed")));
        assert_eq!(
            body.source_url.as_deref(),
            Some("https://images-assets.nasa.gov/a~large.jpg")
        );
    }

    #[test]
    fn test_internal_errors_stay_opaque() {
        let body = error_body(&AppError::Internal("NASA_API_KEY=abc123 rejected".to_string()), false);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }

    #[test]
    fn test_debug_chain_outside_production() {
        let body = error_body(&AppError::NotFound("Image not found".to_string()), false);
        assert_eq!(body.error_type.as_deref(), Some("NotFound"));
        assert!(body.details.is_some());
    }
}
