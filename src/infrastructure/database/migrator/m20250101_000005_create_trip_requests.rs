//! Create trip_requests table

use sea_orm_migration::prelude::*;

use super::m20250101_000004_create_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TripRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripRequests::EmployeeId).string().not_null())
                    .col(ColumnDef::new(TripRequests::VehicleId).string())
                    .col(ColumnDef::new(TripRequests::Destination).string().not_null())
                    .col(ColumnDef::new(TripRequests::Purpose).string().not_null())
                    .col(
                        ColumnDef::new(TripRequests::ExpectedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRequests::ApprovalStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(TripRequests::ApprovedBy).string())
                    .col(ColumnDef::new(TripRequests::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TripRequests::AssignedBy).string())
                    .col(ColumnDef::new(TripRequests::RejectionReason).string())
                    .col(
                        ColumnDef::new(TripRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_requests_vehicle")
                            .from(TripRequests::Table, TripRequests::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Approval queues
        manager
            .create_index(
                Index::create()
                    .name("idx_trip_requests_status")
                    .table(TripRequests::Table)
                    .col(TripRequests::ApprovalStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_requests_employee")
                    .table(TripRequests::Table)
                    .col(TripRequests::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TripRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TripRequests {
    Table,
    Id,
    EmployeeId,
    VehicleId,
    Destination,
    Purpose,
    ExpectedTime,
    ApprovalStatus,
    ApprovedBy,
    ApprovedAt,
    AssignedBy,
    RejectionReason,
    CreatedAt,
}
