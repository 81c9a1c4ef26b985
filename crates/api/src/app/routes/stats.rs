//! Admin dashboard statistics.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use assetforge_auth::{ProtectedAction, require};

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

/// GET /admin/stats - cross-resource aggregates (admin only).
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::DashboardStats) {
        return errors::auth_error(&e);
    }

    match services.stats.dashboard_stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({ "success": true, "stats": dto::dashboard_json(&stats) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}
