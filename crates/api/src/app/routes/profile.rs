//! The caller's own profile.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use assetforge_auth::{ProtectedAction, require};

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

/// GET /profile - the stored user record behind the authenticated claims.
pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::ProfileRead) {
        return errors::auth_error(&e);
    }

    match services.users.get(principal.subject_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "user": dto::user_json(&user) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => errors::store_error(e),
    }
}
