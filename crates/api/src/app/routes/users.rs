//! User administration (admin only).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use assetforge_auth::{ProtectedAction, require};
use assetforge_core::UserId;
use assetforge_infra::{NewUser, UserChanges, hash_password};

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// POST /admin/users - create a user with an initial password.
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::UserAdmin) {
        return errors::auth_error(&e);
    }
    if let Err(response) = dto::require_non_empty(&[
        &body.first_name,
        &body.last_name,
        &body.email,
        &body.department,
        &body.password,
    ]) {
        return response;
    }
    if !body.email.contains('@') {
        return errors::json_error(StatusCode::BAD_REQUEST, "Invalid email format");
    }
    let role = match dto::parse_role(&body.role) {
        Ok(r) => r,
        Err(response) => return response,
    };
    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => return errors::store_error(e),
    };

    let new = NewUser {
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        email: dto::normalize_email(&body.email),
        phone: body.phone,
        role,
        department: Some(body.department),
        password_hash,
    };

    match services.users.create(new).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User created successfully",
                "user": dto::user_json(&user),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /admin/users - list all users.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::UserAdmin) {
        return errors::auth_error(&e);
    }

    match services.users.list().await {
        Ok(users) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "users": users.iter().map(dto::user_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}

/// GET /admin/users/:id - fetch one user.
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::UserAdmin) {
        return errors::auth_error(&e);
    }
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid user id"),
    };

    match services.users.get(id).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "user": dto::user_json(&user) })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => errors::store_error(e),
    }
}

/// PUT /admin/users/:id - full-row update; `status` stays put when omitted.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::UserAdmin) {
        return errors::auth_error(&e);
    }
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid user id"),
    };
    if let Err(response) = dto::require_non_empty(&[
        &body.first_name,
        &body.last_name,
        &body.email,
        &body.department,
    ]) {
        return response;
    }
    let role = match dto::parse_role(&body.role) {
        Ok(r) => r,
        Err(response) => return response,
    };
    let status = match body.status.as_deref() {
        Some(s) => match dto::parse_status(s) {
            Ok(parsed) => Some(parsed),
            Err(response) => return response,
        },
        None => None,
    };

    let changes = UserChanges {
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        email: dto::normalize_email(&body.email),
        phone: body.phone,
        role,
        department: Some(body.department),
        status,
    };

    match services.users.update(id, changes).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "User updated successfully",
                "user": dto::user_json(&user),
            })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => errors::store_error(e),
    }
}

/// DELETE /admin/users/:id - remove a user (their assets go with them).
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require(principal.claims(), ProtectedAction::UserAdmin) {
        return errors::auth_error(&e);
    }
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "Invalid user id"),
    };

    match services.users.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "User deleted successfully" })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => errors::store_error(e),
    }
}
