use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};
use chrono::Utc;

use assetforge_auth::{TokenVerifier, authenticate};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Verification state shared by the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Authentication gate for every protected route.
///
/// Runs strictly before any handler, so a request without a valid credential
/// learns nothing about the target resource, not even which role it would
/// have required.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let raw_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let claims = authenticate(raw_header, state.verifier.as_ref(), Utc::now())
        .map_err(|e| errors::auth_error(&e))?;

    req.extensions_mut().insert(PrincipalContext::new(claims));

    Ok(next.run(req).await)
}
