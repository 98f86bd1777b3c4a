//! Authentication middleware for Axum
//!
//! Bearer tokens are verified by the identity service; the caller's roles
//! are then read from the store so a role change applies to the next
//! request without re-issuing the token.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::common::ApiResponse;
use crate::application::IdentityService;
use crate::domain::{Actor, DomainError};
use crate::infrastructure::crypto::TokenClaims;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    ServiceUnavailable,
}

/// State shared by every protected route
#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<IdentityService>,
}

/// Caller of a protected route, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub claims: TokenClaims,
    pub actor: Actor,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.actor.user_id
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::MissingToken);
    };

    let claims = match auth_state.identity.authenticate(token) {
        Ok(claims) => claims,
        Err(e) => return auth_error_response(AuthError::InvalidToken(e.user_message())),
    };

    let actor = match auth_state.identity.actor_for(&claims.sub).await {
        Ok(actor) => actor,
        Err(DomainError::Unauthorized(msg)) => {
            return auth_error_response(AuthError::InvalidToken(msg))
        }
        Err(e) => {
            tracing::error!(user_id = %claims.sub, error = %e, "Failed to load roles");
            return auth_error_response(AuthError::ServiceUnavailable);
        }
    };

    debug!(user_id = %actor.user_id, roles = ?actor.roles, "Request authenticated");
    request
        .extensions_mut()
        .insert(AuthenticatedUser { claims, actor });
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "Missing or malformed Authorization header".to_string(),
        ),
        AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        AuthError::ServiceUnavailable => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to verify credentials".to_string(),
        ),
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}
