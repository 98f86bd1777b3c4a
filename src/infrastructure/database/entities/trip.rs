//! Trip entity with odometer and location evidence

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub request_id: String,
    pub employee_id: String,
    /// Kept without a foreign key so history survives vehicle removal
    pub vehicle_id: String,
    /// active or completed
    pub status: String,

    pub start_time: DateTime<Utc>,
    /// Odometer reading in km
    #[sea_orm(column_type = "Double")]
    pub start_reading: f64,
    pub start_meter_photo: String,
    #[sea_orm(column_type = "Double")]
    pub start_location_lat: f64,
    #[sea_orm(column_type = "Double")]
    pub start_location_lng: f64,

    #[sea_orm(nullable)]
    pub end_time: Option<DateTime<Utc>>,
    #[sea_orm(nullable, column_type = "Double")]
    pub end_reading: Option<f64>,
    #[sea_orm(nullable)]
    pub end_meter_photo: Option<String>,
    #[sea_orm(nullable, column_type = "Double")]
    pub end_location_lat: Option<f64>,
    #[sea_orm(nullable, column_type = "Double")]
    pub end_location_lng: Option<f64>,

    /// end_reading - start_reading, km
    #[sea_orm(nullable, column_type = "Double")]
    pub distance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip_request::Entity",
        from = "Column::RequestId",
        to = "super::trip_request::Column::Id"
    )]
    TripRequest,
}

impl Related<super::trip_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
