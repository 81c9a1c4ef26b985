use axum::{
    Router,
    routing::{get, post},
};

pub mod assets;
pub mod auth;
pub mod categories;
pub mod departments;
pub mod profile;
pub mod stats;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/auth/logout", post(auth::logout))
        .route("/profile", get(profile::get_profile))
        .nest("/assets", assets::router())
        .nest("/categories", categories::router())
        .nest("/departments", departments::router())
        .nest("/admin", admin_router())
}

fn admin_router() -> Router {
    Router::new()
        .route("/stats", get(stats::dashboard))
        .nest("/users", users::router())
}
