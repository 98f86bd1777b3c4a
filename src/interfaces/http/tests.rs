//! Router-level tests over the in-memory adapters

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::router::{create_api_router, ApiServices};
use crate::config::AppConfig;
use crate::domain::{VehicleRepository, VehicleStatus};
use crate::infrastructure::memory::InMemoryRepositoryProvider;
use crate::infrastructure::storage::InMemoryObjectStore;

const BASE_URL: &str = "http://fleet.test";
// "odometer"
const PHOTO: &str = "b2RvbWV0ZXI=";

struct TestApp {
    router: Router,
    repos: Arc<InMemoryRepositoryProvider>,
    objects: Arc<InMemoryObjectStore>,
    config: AppConfig,
}

struct Reply {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    bytes: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        if self.bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.bytes).unwrap()
        }
    }
}

async fn app() -> TestApp {
    let repos = Arc::new(InMemoryRepositoryProvider::new());
    let objects = Arc::new(InMemoryObjectStore::new(BASE_URL));
    let mut config = AppConfig::default();
    config.security.bcrypt_cost = 4;

    let services = ApiServices::new(repos.clone(), objects.clone(), &config);
    services
        .identity
        .ensure_default_admin(&config.admin)
        .await
        .unwrap();
    let handle = PrometheusBuilder::new().build_recorder().handle();

    TestApp {
        router: create_api_router(services, handle),
        repos,
        objects,
        config,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        Reply {
            status,
            headers,
            bytes,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> String {
        let reply = self
            .send(
                "POST",
                "/api/v1/auth/sign-in",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
        reply.json()["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let admin = self.config.admin.clone();
        self.sign_in(&admin.email, &admin.password).await
    }

    /// Provision an account and return `(user_id, token)`.
    async fn account(&self, admin: &str, name: &str, email: &str, role: &str) -> (String, String) {
        let reply = self
            .send(
                "POST",
                "/create-user",
                Some(admin),
                Some(json!({
                    "fullName": name,
                    "email": email,
                    "password": "secret123",
                    "role": role
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
        let user_id = reply.json()["userId"].as_str().unwrap().to_string();
        (user_id, self.sign_in(email, "secret123").await)
    }

    async fn vehicle(&self, manager: &str, name: &str, plate: &str) -> String {
        let reply = self
            .send(
                "POST",
                "/api/v1/vehicles",
                Some(manager),
                Some(json!({"name": name, "number_plate": plate})),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
        reply.json()["data"]["id"].as_str().unwrap().to_string()
    }

    async fn approved_request(&self, employee: &str, manager: &str) -> String {
        let reply = self
            .send(
                "POST",
                "/api/v1/trip-requests",
                Some(employee),
                Some(json!({
                    "destination": "Client Site",
                    "purpose": "Demo",
                    "expected_time": "2030-01-01T09:00:00Z"
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
        let id = reply.json()["data"]["id"].as_str().unwrap().to_string();

        let reply = self
            .send("POST", &format!("/api/v1/trip-requests/{}/approve", id), Some(manager), None)
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
        id
    }
}

fn checkpoint(reading: f64) -> Value {
    json!({
        "reading": reading,
        "photo": PHOTO,
        "latitude": 12.9716,
        "longitude": 77.5946
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let reply = app.send("GET", "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert_eq!(reply.json()["database"]["status"], "ok");
}

#[tokio::test]
async fn metrics_endpoint_renders_text() {
    let app = app().await;
    let reply = app.send("GET", "/metrics", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = app().await;
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;
    let reply = app.send("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["success"], false);

    let reply = app.send("GET", "/api/v1/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_in_me_and_sign_out() {
    let app = app().await;
    let reply = app
        .send(
            "POST",
            "/api/v1/auth/sign-in",
            None,
            Some(json!({"email": app.config.admin.email, "password": "wrong"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let token = app.admin_token().await;
    let reply = app.send("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let account = &reply.json()["data"];
    assert_eq!(account["email"], app.config.admin.email);
    assert_eq!(account["primary_role"], "admin");

    let reply = app.send("POST", "/api/v1/auth/sign-out", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = app.send("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_user_checks_auth_then_role_then_body() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;

    let reply = app.send("POST", "/create-user", None, Some(json!({}))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // a non-admin is refused before the body is looked at
    let reply = app.send("POST", "/create-user", Some(&employee), Some(json!({}))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .send(
            "POST",
            "/create-user",
            Some(&admin),
            Some(json!({"fullName": "Ravi", "email": "ravi@fleet.local"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let error = reply.json()["error"].as_str().unwrap().to_string();
    assert!(error.contains("password") && error.contains("role"));

    let reply = app
        .send(
            "POST",
            "/create-user",
            Some(&admin),
            Some(json!({
                "fullName": "Ravi",
                "email": "ravi@fleet.local",
                "password": "secret123",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.json()["error"],
        "Invalid role. Must be one of: employee, vehicle_manager"
    );

    let reply = app
        .send(
            "POST",
            "/create-user",
            Some(&admin),
            Some(json!({
                "fullName": "Asha Again",
                "email": "asha@fleet.local",
                "password": "secret123",
                "role": "employee"
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_user_returns_flat_body() {
    let app = app().await;
    let admin = app.admin_token().await;
    let reply = app
        .send(
            "POST",
            "/create-user",
            Some(&admin),
            Some(json!({
                "fullName": "Meera",
                "email": "Meera@Fleet.local",
                "password": "secret123",
                "role": "vehicle_manager",
                "phone": "+91 98450 00000"
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "vehicle_manager");
    assert!(body["userId"].as_str().is_some());

    let reply = app.send("GET", "/api/v1/users", Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let names: Vec<_> = reply.json()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["full_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Fleet Administrator", "Meera"]);
}

#[tokio::test]
async fn role_guards_on_fleet_routes() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;

    let reply = app.send("GET", "/api/v1/trip-requests/pending", Some(&employee), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    let reply = app.send("GET", "/api/v1/vehicles", Some(&employee), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    let reply = app.send("GET", "/api/v1/reports/weeks", Some(&manager), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app.send("GET", "/api/v1/reports/weeks", Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"].as_array().unwrap().len(), 12);
    assert_eq!(reply.json()["data"][0]["value"], 0);
}

#[tokio::test]
async fn vehicle_crud_and_status_filter() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;

    let van = app.vehicle(&manager, "Van", "KA-01-1111").await;
    app.vehicle(&manager, "Sedan", "KA-01-2222").await;

    let reply = app
        .send(
            "POST",
            "/api/v1/vehicles",
            Some(&manager),
            Some(json!({"name": "Copy", "number_plate": "KA-01-1111"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = app
        .send(
            "PUT",
            &format!("/api/v1/vehicles/{}", van),
            Some(&manager),
            Some(json!({"status": "maintenance"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["status"], "maintenance");

    let reply = app
        .send("GET", "/api/v1/vehicles?status=available", Some(&manager), None)
        .await;
    let plates: Vec<_> = reply.json()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["number_plate"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(plates, vec!["KA-01-2222"]);

    let reply = app
        .send("GET", "/api/v1/vehicles?status=parked", Some(&manager), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send("DELETE", &format!("/api/v1/vehicles/{}", van), Some(&manager), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = app
        .send("GET", &format!("/api/v1/vehicles/{}", van), Some(&manager), None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trip_lifecycle_end_to_end() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (employee_id, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;
    let vehicle_id = app.vehicle(&manager, "Van", "KA-01-1111").await;

    let request_id = app.approved_request(&employee, &manager).await;

    let reply = app.send("GET", "/api/v1/trip-requests/approved", Some(&manager), None).await;
    let queue = reply.json()["data"].as_array().unwrap().clone();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["requester"]["full_name"], "Asha");

    // no vehicle yet
    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/start", request_id),
            Some(&employee),
            Some(checkpoint(1200.0)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/assign", request_id),
            Some(&manager),
            Some(json!({"vehicle_id": vehicle_id})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["approval_status"], "assigned");

    // only the owner may drive the trip
    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/start", request_id),
            Some(&manager),
            Some(checkpoint(1200.0)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/start", request_id),
            Some(&employee),
            Some(checkpoint(1200.0)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
    let trip = reply.json()["data"].clone();
    assert_eq!(trip["status"], "active");
    assert_eq!(trip["employee_id"], employee_id.as_str());

    let photo_url = trip["start_meter_photo"].as_str().unwrap();
    let photo_path = photo_url.strip_prefix(BASE_URL).unwrap();
    assert!(photo_path.starts_with(&format!("/storage/meter-photos/{}/start-", employee_id)));
    let reply = app.send("GET", photo_path, None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(reply.bytes, b"odometer");

    let reply = app.send("GET", "/api/v1/trips/active", Some(&manager), None).await;
    let active = reply.json()["data"].as_array().unwrap().clone();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["vehicle"]["status"], "in_use");

    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/end", request_id),
            Some(&employee),
            Some(checkpoint(1250.5)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());
    let trip = reply.json()["data"].clone();
    assert_eq!(trip["status"], "completed");
    assert_eq!(trip["distance"], 50.5);
    assert_eq!(app.objects.len(), 2);

    let vehicle = VehicleRepository::find_by_id(app.repos.as_ref(), &vehicle_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Available);

    let reply = app.send("GET", "/api/v1/trip-requests/mine", Some(&employee), None).await;
    let mine = reply.json()["data"].as_array().unwrap().clone();
    assert_eq!(mine[0]["trip"]["status"], "completed");
    assert_eq!(mine[0]["vehicle"]["number_plate"], "KA-01-1111");

    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/end", request_id),
            Some(&employee),
            Some(checkpoint(1300.0)),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_checkpoint_is_rejected_before_upload() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;
    let vehicle_id = app.vehicle(&manager, "Van", "KA-01-1111").await;
    let request_id = app.approved_request(&employee, &manager).await;
    app.send(
        "POST",
        &format!("/api/v1/trip-requests/{}/assign", request_id),
        Some(&manager),
        Some(json!({"vehicle_id": vehicle_id})),
    )
    .await;

    let uri = format!("/api/v1/trip-requests/{}/trip/start", request_id);
    let mut body = checkpoint(1200.0);
    body["photo"] = json!("data:application/pdf;base64,aGVsbG8=");
    let reply = app.send("POST", &uri, Some(&employee), Some(body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app.send("POST", &uri, Some(&employee), Some(checkpoint(-5.0))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn reject_needs_a_reason_and_is_final() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;

    let reply = app
        .send(
            "POST",
            "/api/v1/trip-requests",
            Some(&employee),
            Some(json!({
                "destination": "Airport",
                "purpose": "Pickup",
                "expected_time": "2030-01-01T09:00:00Z"
            })),
        )
        .await;
    let id = reply.json()["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/trip-requests/{}/reject", id);

    let reply = app.send("POST", &uri, Some(&manager), Some(json!({"reason": ""}))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send("POST", &uri, Some(&manager), Some(json!({"reason": "No budget"})))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["rejection_reason"], "No budget");

    let reply = app
        .send("POST", &format!("/api/v1/trip-requests/{}/approve", id), Some(&manager), None)
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn concurrent_assignment_has_one_winner() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;
    let vehicle_id = app.vehicle(&manager, "Van", "KA-01-1111").await;
    let first = app.approved_request(&employee, &manager).await;
    let second = app.approved_request(&employee, &manager).await;

    let body = json!({"vehicle_id": vehicle_id});
    let first_uri = format!("/api/v1/trip-requests/{}/assign", first);
    let second_uri = format!("/api/v1/trip-requests/{}/assign", second);
    let (a, b) = tokio::join!(
        app.send("POST", &first_uri, Some(&manager), Some(body.clone())),
        app.send("POST", &second_uri, Some(&manager), Some(body.clone())),
    );

    let mut statuses = vec![a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let reply = app.send("GET", "/api/v1/trip-requests/approved", Some(&manager), None).await;
    assert_eq!(reply.json()["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn weekly_report_and_export() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (_, employee) = app
        .account(&admin, "Asha Rao", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;
    let vehicle_id = app.vehicle(&manager, "Van", "KA-01-1111").await;
    let request_id = app.approved_request(&employee, &manager).await;
    app.send(
        "POST",
        &format!("/api/v1/trip-requests/{}/assign", request_id),
        Some(&manager),
        Some(json!({"vehicle_id": vehicle_id})),
    )
    .await;
    for (stage, reading) in [("start", 100.0), ("end", 142.25)] {
        let reply = app
            .send(
                "POST",
                &format!("/api/v1/trip-requests/{}/trip/{}", request_id, stage),
                Some(&employee),
                Some(checkpoint(reading)),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let reply = app
        .send("GET", "/api/v1/reports/weekly?weeks_ago=0", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let report = reply.json()["data"].clone();
    assert_eq!(report["summary"]["total_trips"], 1);
    assert_eq!(report["summary"]["completed_trips"], 1);
    assert_eq!(report["summary"]["total_distance"], 42.25);
    assert_eq!(report["vehicles"][0]["vehicle_name"], "Van");
    assert_eq!(report["employees"][0]["employee_name"], "Asha Rao");

    let reply = app
        .send("GET", "/api/v1/reports/weekly?vehicle=Truck", Some(&admin), None)
        .await;
    assert_eq!(reply.json()["data"]["summary"]["total_trips"], 0);

    let reply = app
        .send(
            "GET",
            "/api/v1/reports/weekly?vehicle=Van&employee=Asha%20Rao",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send(
            "GET",
            "/api/v1/reports/weekly/export?employee=Asha%20Rao",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.headers[header::CONTENT_TYPE],
        super::modules::reports::XLSX_CONTENT_TYPE
    );
    let disposition = reply.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Trip_Report_"));
    assert!(disposition.ends_with("_Asha_Rao.xlsx\""));
    // xlsx is a zip container
    assert_eq!(&reply.bytes[..2], b"PK");
}

#[tokio::test]
async fn huge_week_offset_is_a_bad_request() {
    let app = app().await;
    let admin = app.admin_token().await;
    for uri in [
        "/api/v1/reports/weekly?weeks_ago=4294967295",
        "/api/v1/reports/weekly/export?weeks_ago=4294967295",
        "/api/v1/reports/weekly?weeks_ago=521",
    ] {
        let reply = app.send("GET", uri, Some(&admin), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(reply.json()["success"], false);
    }

    let reply = app
        .send("GET", "/api/v1/reports/weekly?weeks_ago=520", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn png_meter_photo_is_served_as_png() {
    let app = app().await;
    let admin = app.admin_token().await;
    let (employee_id, employee) = app
        .account(&admin, "Asha", "asha@fleet.local", "employee")
        .await;
    let (_, manager) = app
        .account(&admin, "Meera", "meera@fleet.local", "vehicle_manager")
        .await;
    let vehicle_id = app.vehicle(&manager, "Van", "KA-01-1111").await;
    let request_id = app.approved_request(&employee, &manager).await;
    app.send(
        "POST",
        &format!("/api/v1/trip-requests/{}/assign", request_id),
        Some(&manager),
        Some(json!({"vehicle_id": vehicle_id})),
    )
    .await;

    let mut body = checkpoint(1200.0);
    body["photo"] = json!("data:image/png;base64,iVBORw0KGgo=");
    let reply = app
        .send(
            "POST",
            &format!("/api/v1/trip-requests/{}/trip/start", request_id),
            Some(&employee),
            Some(body),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.json());

    let photo_url = reply.json()["data"]["start_meter_photo"]
        .as_str()
        .unwrap()
        .to_string();
    let photo_path = photo_url.strip_prefix(BASE_URL).unwrap();
    assert!(photo_path.starts_with(&format!("/storage/meter-photos/{}/start-", employee_id)));
    assert!(photo_path.ends_with(".png"));
    let reply = app.send("GET", photo_path, None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(reply.bytes, [137, 80, 78, 71, 13, 10, 26, 10]);
}
