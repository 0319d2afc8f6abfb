use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// JSON and JPEG only; nothing here should load subresources.
const API_CSP: &str = "default-src 'none'; img-src 'self' data: https:; frame-ancestors 'none'";

/// The API docs page pulls RapiDoc from unpkg and styles itself inline.
const DOCS_CSP: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' https://unpkg.com; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    font-src 'self' data: https://fonts.gstatic.com; \
    img-src 'self' data: https:; \
    connect-src 'self'; \
    frame-ancestors 'none'";

/// Settings for [`security_headers_middleware`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders {
    /// Send `Strict-Transport-Security`; only meaningful behind HTTPS.
    pub hsts: bool,
    /// HTML docs route that gets the docs policy instead of the API one.
    pub docs_path: Option<&'static str>,
}

impl SecurityHeaders {
    pub fn for_environment(is_production: bool) -> Self {
        Self {
            hsts: is_production,
            docs_path: None,
        }
    }

    pub fn with_docs_path(mut self, path: &'static str) -> Self {
        self.docs_path = Some(path);
        self
    }

    fn csp_for(&self, path: &str) -> &'static str {
        match self.docs_path {
            Some(docs) if path == docs || path.starts_with(&format!("{}/", docs)) => DOCS_CSP,
            _ => API_CSP,
        }
    }
}

/// Adds security headers to every response. Headers a handler already set
/// are left alone.
pub async fn security_headers_middleware(
    State(config): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let csp = config.csp_for(request.uri().path());
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let defaults = [
        ("X-Content-Type-Options", "nosniff"),
        ("X-Frame-Options", "DENY"),
        ("Referrer-Policy", "strict-origin-when-cross-origin"),
        ("Content-Security-Policy", csp),
        (
            "Permissions-Policy",
            "geolocation=(), microphone=(), camera=()",
        ),
    ];
    for (name, value) in defaults {
        if !headers.contains_key(name) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }

    if config.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
