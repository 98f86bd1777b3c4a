pub mod auth;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod request_id;
pub mod storage;
pub mod trip_requests;
pub mod trips;
pub mod users;
pub mod vehicles;
