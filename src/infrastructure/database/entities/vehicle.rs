//! Vehicle entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub number_plate: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    /// available, in_use or maintenance
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_request::Entity")]
    TripRequests,
}

impl Related<super::trip_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
