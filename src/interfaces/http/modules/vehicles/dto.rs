//! Vehicle DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{DomainError, DomainResult, Vehicle, VehicleStatus};

/// Vehicle API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleDto {
    pub id: String,
    pub name: String,
    pub number_plate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `available`, `in_use` or `maintenance`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            number_plate: v.number_plate,
            description: v.description,
            status: v.status.as_str().to_string(),
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

pub fn parse_status(s: &str) -> DomainResult<VehicleStatus> {
    VehicleStatus::from_str(s).ok_or_else(|| {
        DomainError::Validation(format!(
            "Invalid vehicle status '{}'. Must be one of: available, in_use, maintenance",
            s
        ))
    })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "number plate is required"))]
    pub number_plate: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub number_plate: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListVehiclesParams {
    /// Filter by status (available, in_use, maintenance)
    pub status: Option<String>,
}
