//! Login/logout endpoints for the identity collaborator.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use assetforge_auth::ClaimSet;
use assetforge_infra::{UserStatus, verify_password};

use crate::app::{dto, errors, services::AppServices};

/// POST /auth/login - verify email + password, issue a signed token.
///
/// Unknown email and wrong password produce the identical response so the
/// endpoint cannot be used as a user-existence oracle.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "Email and password are required");
    }

    let email = dto::normalize_email(&body.email);
    let credentials = match services.users.find_credentials(&email).await {
        Ok(c) => c,
        Err(e) => return errors::store_error(e),
    };

    let Some(credentials) = credentials else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    if !verify_password(&body.password, &credentials.password_hash) {
        return errors::json_error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    if credentials.user.status != UserStatus::Active {
        return errors::json_error(StatusCode::FORBIDDEN, "Account is inactive");
    }

    let user = credentials.user;
    let now = Utc::now();
    let claims = ClaimSet {
        subject_id: user.id,
        email: user.email.clone(),
        role: user.role,
        department: user.department.clone(),
        full_name: Some(user.full_name()),
        issued_at: now,
        expires_at: now + services.token_ttl,
    };

    let token = match services.tokens.sign(&claims) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "user": dto::user_json(&user),
            "access_token": token,
        })),
    )
        .into_response()
}

/// POST /auth/logout - stateless acknowledgement.
///
/// Tokens are self-contained and expire on their own; there is no server-side
/// session to destroy.
pub async fn logout() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}
