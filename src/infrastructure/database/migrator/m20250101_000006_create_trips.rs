//! Create trips table
//!
//! One trip per request; `vehicle_id` carries no foreign key so completed
//! trips survive the removal of their vehicle.

use sea_orm_migration::prelude::*;

use super::m20250101_000005_create_trip_requests::TripRequests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Trips::RequestId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Trips::EmployeeId).string().not_null())
                    .col(ColumnDef::new(Trips::VehicleId).string().not_null())
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Trips::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::StartReading).double().not_null())
                    .col(ColumnDef::new(Trips::StartMeterPhoto).string().not_null())
                    .col(ColumnDef::new(Trips::StartLocationLat).double().not_null())
                    .col(ColumnDef::new(Trips::StartLocationLng).double().not_null())
                    .col(ColumnDef::new(Trips::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trips::EndReading).double())
                    .col(ColumnDef::new(Trips::EndMeterPhoto).string())
                    .col(ColumnDef::new(Trips::EndLocationLat).double())
                    .col(ColumnDef::new(Trips::EndLocationLng).double())
                    .col(ColumnDef::new(Trips::Distance).double())
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_request")
                            .from(Trips::Table, Trips::RequestId)
                            .to(TripRequests::Table, TripRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_status")
                    .table(Trips::Table)
                    .col(Trips::Status)
                    .to_owned(),
            )
            .await?;

        // Weekly reports scan by start time
        manager
            .create_index(
                Index::create()
                    .name("idx_trips_start_time")
                    .table(Trips::Table)
                    .col(Trips::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Trips {
    Table,
    Id,
    RequestId,
    EmployeeId,
    VehicleId,
    Status,
    StartTime,
    StartReading,
    StartMeterPhoto,
    StartLocationLat,
    StartLocationLng,
    EndTime,
    EndReading,
    EndMeterPhoto,
    EndLocationLat,
    EndLocationLng,
    Distance,
    CreatedAt,
}
