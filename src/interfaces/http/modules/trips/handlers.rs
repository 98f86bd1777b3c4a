//! Active trip board

use std::sync::Arc;

use axum::{extract::State, Extension};

use super::dto::ActiveTripDto;
use crate::application::TripLifecycleService;
use crate::interfaces::http::common::{api_error, ok, ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// State shared by the request and trip endpoints
#[derive(Clone)]
pub struct TripHandlerState {
    pub lifecycle: Arc<TripLifecycleService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/active",
    tag = "Trips",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active trips, most recent first", body = ApiResponse<Vec<ActiveTripDto>>),
        (status = 403, description = "Vehicle manager role required")
    )
)]
pub async fn list_active_trips(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<ActiveTripDto>> {
    let trips = state
        .lifecycle
        .active_trips(&user.actor)
        .await
        .map_err(api_error)?;
    ok(trips.into_iter().map(ActiveTripDto::from).collect())
}
