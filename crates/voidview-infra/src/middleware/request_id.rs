use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Longest inbound request id that is propagated as-is.
const MAX_INBOUND_LEN: usize = 128;

fn inbound_request_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    if value.is_empty() || value.len() > MAX_INBOUND_LEN {
        return None;
    }
    Some(value.to_string())
}

/// Tags each request with an id, reusing a caller-supplied `X-Request-ID`
/// when it is sane, and echoes it on the response.
///
/// The id lives on an info-level span, so handler error logs carry it under
/// the default filter.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = inbound_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span.clone()).await;

    if response.status().is_server_error() {
        span.in_scope(|| {
            tracing::warn!(status = response.status().as_u16(), "request failed");
        });
    }

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}
