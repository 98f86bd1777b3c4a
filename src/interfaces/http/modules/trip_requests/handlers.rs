//! Trip request API handlers
//!
//! Employees submit requests and drive their own trips; managers work the
//! pending and approved queues.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::dto::{
    AssignVehicleRequest, CreateTripRequestRequest, MyTripRequestDto, QueuedRequestDto,
    RejectTripRequestRequest, TripCheckpointRequest, TripRequestDto,
};
use crate::interfaces::http::common::{api_error, ok, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::trips::{TripDto, TripHandlerState};

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    request_body = CreateTripRequestRequest,
    responses(
        (status = 200, description = "Request submitted as pending", body = ApiResponse<TripRequestDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_trip_request(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateTripRequestRequest>,
) -> ApiResult<TripRequestDto> {
    let created = state
        .lifecycle
        .create_request(
            &user.actor,
            &request.destination,
            &request.purpose,
            request.expected_time,
        )
        .await
        .map_err(api_error)?;
    ok(created.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/trip-requests/mine",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's requests, newest first", body = ApiResponse<Vec<MyTripRequestDto>>)
    )
)]
pub async fn my_trip_requests(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<MyTripRequestDto>> {
    let requests = state
        .lifecycle
        .my_requests(&user.actor)
        .await
        .map_err(api_error)?;
    ok(requests.into_iter().map(MyTripRequestDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/trip-requests/pending",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending requests, oldest first", body = ApiResponse<Vec<QueuedRequestDto>>),
        (status = 403, description = "Vehicle manager role required")
    )
)]
pub async fn pending_trip_requests(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<QueuedRequestDto>> {
    let queued = state
        .lifecycle
        .pending_requests(&user.actor)
        .await
        .map_err(api_error)?;
    ok(queued.into_iter().map(QueuedRequestDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/trip-requests/approved",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Approved requests awaiting a vehicle", body = ApiResponse<Vec<QueuedRequestDto>>),
        (status = 403, description = "Vehicle manager role required")
    )
)]
pub async fn approved_trip_requests(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<QueuedRequestDto>> {
    let queued = state
        .lifecycle
        .approved_requests(&user.actor)
        .await
        .map_err(api_error)?;
    ok(queued.into_iter().map(QueuedRequestDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests/{id}/approve",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    responses(
        (status = 200, description = "Request approved", body = ApiResponse<TripRequestDto>),
        (status = 404, description = "Trip request not found"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn approve_trip_request(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<TripRequestDto> {
    let request = state
        .lifecycle
        .approve(&user.actor, &id)
        .await
        .map_err(api_error)?;
    ok(request.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests/{id}/reject",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    request_body = RejectTripRequestRequest,
    responses(
        (status = 200, description = "Request rejected", body = ApiResponse<TripRequestDto>),
        (status = 400, description = "Missing reason"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn reject_trip_request(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<RejectTripRequestRequest>,
) -> ApiResult<TripRequestDto> {
    let request = state
        .lifecycle
        .reject(&user.actor, &id, &body.reason)
        .await
        .map_err(api_error)?;
    ok(request.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests/{id}/assign",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    request_body = AssignVehicleRequest,
    responses(
        (status = 200, description = "Vehicle assigned", body = ApiResponse<TripRequestDto>),
        (status = 404, description = "Request or vehicle not found"),
        (status = 409, description = "Vehicle taken or request not approved")
    )
)]
pub async fn assign_vehicle(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<AssignVehicleRequest>,
) -> ApiResult<TripRequestDto> {
    let request = state
        .lifecycle
        .assign_vehicle(&user.actor, &id, &body.vehicle_id)
        .await
        .map_err(api_error)?;
    ok(request.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/trip-requests/{id}/trip",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    responses(
        (status = 200, description = "Trip of the request, `null` before start", body = ApiResponse<TripDto>),
        (status = 403, description = "Request belongs to another employee"),
        (status = 404, description = "Trip request not found")
    )
)]
pub async fn get_trip(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Option<TripDto>> {
    let trip = state
        .lifecycle
        .trip_for_request(&user.actor, &id)
        .await
        .map_err(api_error)?;
    ok(trip.map(TripDto::from))
}

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests/{id}/trip/start",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    request_body = TripCheckpointRequest,
    responses(
        (status = 200, description = "Trip started", body = ApiResponse<TripDto>),
        (status = 400, description = "Invalid reading, photo or location"),
        (status = 403, description = "Request belongs to another employee"),
        (status = 409, description = "No vehicle assigned or trip already started")
    )
)]
pub async fn start_trip(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<TripCheckpointRequest>,
) -> ApiResult<TripDto> {
    let evidence = body.into_evidence().map_err(api_error)?;
    let trip = state
        .lifecycle
        .start_trip(&user.actor, &id, evidence)
        .await
        .map_err(api_error)?;
    ok(trip.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/trip-requests/{id}/trip/end",
    tag = "Trip Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Trip request ID")),
    request_body = TripCheckpointRequest,
    responses(
        (status = 200, description = "Trip completed, vehicle released", body = ApiResponse<TripDto>),
        (status = 400, description = "Invalid reading, photo or location"),
        (status = 404, description = "Trip not started"),
        (status = 409, description = "Trip already completed")
    )
)]
pub async fn end_trip(
    State(state): State<TripHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<TripCheckpointRequest>,
) -> ApiResult<TripDto> {
    let evidence = body.into_evidence().map_err(api_error)?;
    let trip = state
        .lifecycle
        .end_trip(&user.actor, &id, evidence)
        .await
        .map_err(api_error)?;
    ok(trip.into())
}
