use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use assetforge_auth::AuthError;
use assetforge_infra::StoreError;

/// Uniform error body: `{ "success": false, "message": ... }`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map a gate failure: authentication is 401, authorization is 403. The
/// message is the error's own coarse client-facing text.
pub fn auth_error(err: &AuthError) -> axum::response::Response {
    let status = if err.is_authentication() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::FORBIDDEN
    };
    json_error(status, err.to_string())
}

/// Map a store failure. 500-class causes are logged with detail and surface
/// as one generic message.
pub fn store_error(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
        StoreError::Conflict(message) => json_error(StatusCode::CONFLICT, message),
        StoreError::Unavailable(detail) | StoreError::Decode(detail) => {
            tracing::error!(error = %detail, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}
