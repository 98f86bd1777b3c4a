//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Create user request
///
/// Every field is optional at the wire level so that a missing field is
/// reported after the admin check, as a 400.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `employee` or `vehicle_manager`
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl CreateUserRequest {
    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("password", &self.password),
            ("role", &self.role),
        ]
        .into_iter()
        .filter(|(_, v)| blank(v))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Flat success body of `POST /create-user`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub user_id: String,
    pub role: String,
}
