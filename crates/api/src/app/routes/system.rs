use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

/// GET /health - storage liveness probe (public).
pub async fn health(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.health.ping().await {
        Ok(db_time) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "OK",
                "db_time": db_time,
                "message": "Server is up and storage is reachable",
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health probe failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage connection failed",
            )
        }
    }
}

/// GET /whoami - echo of the authenticated claims.
pub async fn whoami(
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    let claims = principal.claims();
    Json(json!({
        "success": true,
        "subject_id": claims.subject_id,
        "email": claims.email,
        "role": claims.role,
        "department": claims.department,
        "full_name": claims.full_name,
    }))
}
