use axum::{
    extract::{Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderName, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Header carrying the shared API token.
pub const AUTH_HEADER: HeaderName = HeaderName::from_static("authtoken");

pub const NOT_AUTHORIZED: &str = "Not Authorized to use these APIs";

const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE";

/// Token check for every `/api` request.
///
/// Requests without the exact token are answered with 401 and never reach a
/// handler. Accepted requests get permissive CORS headers on the way out.
pub async fn require_auth_token(
    State(expected): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(expected.as_ref()) {
        debug!(method = %request.method(), uri = %request.uri(), "Rejected request without valid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": NOT_AUTHORIZED })),
        )
            .into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}
