//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    IdentityService, ObjectStore, ReportService, TokenRevocations, TripLifecycleService,
    VehicleService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    auth, health, metrics, reports, request_id, storage, trip_requests, trips, users, vehicles,
};

/// Trip start/end bodies carry a base64 photo of up to 10 MB.
const MAX_CHECKPOINT_BODY: usize = 16 * 1024 * 1024;

/// Application services shared by the handlers
#[derive(Clone)]
pub struct ApiServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub objects: Arc<dyn ObjectStore>,
    pub identity: Arc<IdentityService>,
    pub lifecycle: Arc<TripLifecycleService>,
    pub vehicles: Arc<VehicleService>,
    pub reports: Arc<ReportService>,
}

impl ApiServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        objects: Arc<dyn ObjectStore>,
        config: &AppConfig,
    ) -> Self {
        let identity = IdentityService::new(
            repos.clone(),
            JwtConfig::from_security(&config.security),
            config.security.bcrypt_cost,
            Arc::new(TokenRevocations::new()),
        );
        Self {
            identity: Arc::new(identity),
            lifecycle: Arc::new(TripLifecycleService::new(
                repos.clone(),
                objects.clone(),
                config.trips.clone(),
            )),
            vehicles: Arc::new(VehicleService::new(repos.clone())),
            reports: Arc::new(ReportService::new(repos.clone())),
            repos,
            objects,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/sign-in"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::sign_in,
        auth::sign_out,
        auth::current_account,
        // Users
        users::create_user,
        users::list_users,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        // Trip requests
        trip_requests::create_trip_request,
        trip_requests::my_trip_requests,
        trip_requests::pending_trip_requests,
        trip_requests::approved_trip_requests,
        trip_requests::approve_trip_request,
        trip_requests::reject_trip_request,
        trip_requests::assign_vehicle,
        trip_requests::get_trip,
        trip_requests::start_trip,
        trip_requests::end_trip,
        // Trips
        trips::list_active_trips,
        // Reports
        reports::list_weeks,
        reports::weekly_report,
        reports::export_weekly_report,
        // Storage
        storage::get_object,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::SignInRequest,
            auth::SignInResponse,
            auth::AccountDto,
            users::CreateUserRequest,
            users::CreateUserResponse,
            vehicles::VehicleDto,
            vehicles::CreateVehicleRequest,
            vehicles::UpdateVehicleRequest,
            trip_requests::TripRequestDto,
            trip_requests::MyTripRequestDto,
            trip_requests::QueuedRequestDto,
            trip_requests::CreateTripRequestRequest,
            trip_requests::RejectTripRequestRequest,
            trip_requests::AssignVehicleRequest,
            trip_requests::TripCheckpointRequest,
            trips::TripDto,
            trips::PersonDto,
            trips::ActiveTripDto,
            reports::WeekOptionDto,
            reports::WeeklyReportDto,
            reports::WeeklySummaryDto,
            reports::VehicleUtilizationDto,
            reports::EmployeeActivityDto,
            reports::TripReportRecordDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and store health"),
        (name = "Authentication", description = "Sign-in, sign-out and the current account"),
        (name = "Users", description = "Admin account provisioning"),
        (name = "Vehicles", description = "Fleet vehicles, managed by vehicle managers"),
        (name = "Trip Requests", description = "Request, approval, assignment and trip start/end"),
        (name = "Trips", description = "Active trip board"),
        (name = "Reports", description = "Weekly trip reports and spreadsheet export"),
        (name = "Storage", description = "Stored meter photos"),
    ),
    info(
        title = "Fleet Trips API",
        version = "1.0.0",
        description = "Vehicle requests, assignments, odometer-evidenced trips and weekly reports",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(services: ApiServices, prometheus_handle: PrometheusHandle) -> Router {
    let auth_layer = middleware::from_fn_with_state(
        AuthState {
            identity: services.identity.clone(),
        },
        auth_middleware,
    );

    // Auth routes: sign-in is public, the rest need a token
    let auth_state = auth::AuthHandlerState {
        identity: services.identity.clone(),
    };
    let auth_routes = Router::new()
        .route("/sign-in", post(auth::sign_in))
        .with_state(auth_state.clone())
        .merge(
            Router::new()
                .route("/sign-out", post(auth::sign_out))
                .route("/me", get(auth::current_account))
                .layer(auth_layer.clone())
                .with_state(auth_state),
        );

    let user_state = users::UserHandlerState {
        identity: services.identity.clone(),
    };
    let create_user_routes = Router::new()
        .route("/create-user", post(users::create_user))
        .layer(auth_layer.clone())
        .with_state(user_state.clone());
    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .layer(auth_layer.clone())
        .with_state(user_state);

    let vehicle_routes = Router::new()
        .route(
            "/",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/{id}",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .layer(auth_layer.clone())
        .with_state(vehicles::VehicleHandlerState {
            vehicles: services.vehicles.clone(),
        });

    let trip_state = trips::TripHandlerState {
        lifecycle: services.lifecycle.clone(),
    };
    let trip_request_routes = Router::new()
        .route("/", post(trip_requests::create_trip_request))
        .route("/mine", get(trip_requests::my_trip_requests))
        .route("/pending", get(trip_requests::pending_trip_requests))
        .route("/approved", get(trip_requests::approved_trip_requests))
        .route("/{id}/approve", post(trip_requests::approve_trip_request))
        .route("/{id}/reject", post(trip_requests::reject_trip_request))
        .route("/{id}/assign", post(trip_requests::assign_vehicle))
        .route("/{id}/trip", get(trip_requests::get_trip))
        .route("/{id}/trip/start", post(trip_requests::start_trip))
        .route("/{id}/trip/end", post(trip_requests::end_trip))
        .layer(DefaultBodyLimit::max(MAX_CHECKPOINT_BODY))
        .layer(auth_layer.clone())
        .with_state(trip_state.clone());

    let trip_routes = Router::new()
        .route("/active", get(trips::list_active_trips))
        .layer(auth_layer.clone())
        .with_state(trip_state);

    let report_routes = Router::new()
        .route("/weeks", get(reports::list_weeks))
        .route("/weekly", get(reports::weekly_report))
        .route("/weekly/export", get(reports::export_weekly_report))
        .layer(auth_layer)
        .with_state(reports::ReportHandlerState {
            reports: services.reports.clone(),
        });

    // Public object downloads, photo URLs point here
    let storage_routes = Router::new()
        .route("/{bucket}/{*path}", get(storage::get_object))
        .with_state(storage::StorageHandlerState {
            objects: services.objects.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            repos: services.repos.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(create_user_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/vehicles", vehicle_routes)
        .nest("/api/v1/trip-requests", trip_request_routes)
        .nest("/api/v1/trips", trip_routes)
        .nest("/api/v1/reports", report_routes)
        .nest("/storage", storage_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
