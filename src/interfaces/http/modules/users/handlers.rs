//! Account provisioning API handlers
//!
//! Admin-only endpoints. The admin check uses the roles held in the store,
//! loaded by the auth middleware, never the roles embedded in the token.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use super::dto::{CreateUserRequest, CreateUserResponse};
use crate::application::identity::NewAccount;
use crate::application::IdentityService;
use crate::domain::Role;
use crate::interfaces::http::common::{api_error, bad_request, ok, ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::AccountDto;

#[derive(Clone)]
pub struct UserHandlerState {
    pub identity: Arc<IdentityService>,
}

#[utoipa::path(
    post,
    path = "/create-user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Account created", body = CreateUserResponse),
        (status = 400, description = "Missing fields, invalid role or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Provisioning failed and was rolled back")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    user.actor.require_admin().map_err(api_error)?;

    let Json(request) = body.map_err(|e| bad_request(format!("Invalid JSON: {}", e)))?;
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let CreateUserRequest {
        full_name: Some(full_name),
        email: Some(email),
        password: Some(password),
        role: Some(role),
        phone,
    } = request
    else {
        return Err(bad_request("Missing required fields"));
    };

    let role = Role::parse_provisionable(&role).map_err(api_error)?;

    let account = state
        .identity
        .provision(
            &user.actor,
            NewAccount {
                full_name,
                email,
                password,
                phone: phone.filter(|p| !p.trim().is_empty()),
                role,
            },
        )
        .await
        .map_err(api_error)?;

    Ok(Json(CreateUserResponse {
        success: true,
        user_id: account.profile.id,
        role: role.as_str().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts ordered by name", body = ApiResponse<Vec<AccountDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<AccountDto>> {
    let accounts = state
        .identity
        .list_accounts(&user.actor)
        .await
        .map_err(api_error)?;
    ok(accounts.into_iter().map(AccountDto::from).collect())
}
