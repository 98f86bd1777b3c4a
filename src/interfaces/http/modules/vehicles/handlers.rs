//! Vehicle API handlers (managers and admins)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use super::dto::{
    parse_status, CreateVehicleRequest, ListVehiclesParams, UpdateVehicleRequest, VehicleDto,
};
use crate::application::VehicleService;
use crate::domain::VehicleChanges;
use crate::interfaces::http::common::{api_error, ok, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct VehicleHandlerState {
    pub vehicles: Arc<VehicleService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(ListVehiclesParams),
    responses(
        (status = 200, description = "Vehicles ordered by name", body = ApiResponse<Vec<VehicleDto>>),
        (status = 400, description = "Unknown status filter"),
        (status = 403, description = "Vehicle manager role required")
    )
)]
pub async fn list_vehicles(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListVehiclesParams>,
) -> ApiResult<Vec<VehicleDto>> {
    let status = params
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(api_error)?;
    let vehicles = state
        .vehicles
        .list(&user.actor, status)
        .await
        .map_err(api_error)?;
    ok(vehicles.into_iter().map(VehicleDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<VehicleDto> {
    let vehicle = state
        .vehicles
        .get(&user.actor, &id)
        .await
        .map_err(api_error)?;
    ok(vehicle.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle added as available", body = ApiResponse<VehicleDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Number plate already registered")
    )
)]
pub async fn create_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<VehicleDto> {
    let vehicle = state
        .vehicles
        .create(
            &user.actor,
            &request.name,
            &request.number_plate,
            request.description,
        )
        .await
        .map_err(api_error)?;
    ok(vehicle.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Number plate already registered")
    )
)]
pub async fn update_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<VehicleDto> {
    let status = request
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(api_error)?;
    let changes = VehicleChanges {
        name: request.name,
        number_plate: request.number_plate,
        description: request.description,
        status,
    };
    let vehicle = state
        .vehicles
        .update(&user.actor, &id, changes)
        .await
        .map_err(api_error)?;
    ok(vehicle.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted", body = ApiResponse<String>),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Vehicle is in use")
    )
)]
pub async fn delete_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state
        .vehicles
        .delete(&user.actor, &id)
        .await
        .map_err(api_error)?;
    ok(format!("Vehicle {} deleted", id))
}
