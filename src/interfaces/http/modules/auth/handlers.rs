//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Extension};

use super::dto::{AccountDto, SignInRequest, SignInResponse};
use crate::application::IdentityService;
use crate::interfaces::http::common::{api_error, ok, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SignInResponse>),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid login credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<SignInResponse> {
    let auth = state
        .identity
        .sign_in(&request.email, &request.password)
        .await
        .map_err(api_error)?;

    ok(SignInResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        account: auth.account.into(),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn sign_out(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<String> {
    state.identity.sign_out(&user.claims);
    ok("Signed out".to_string())
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AccountDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn current_account(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<AccountDto> {
    let account = state
        .identity
        .current_account(user.user_id())
        .await
        .map_err(api_error)?;
    ok(account.into())
}
