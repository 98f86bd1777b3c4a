//! Report DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::reports::{
    EmployeeActivity, ReportFilter, VehicleUtilization, WeekOption, WeeklyReport, WeeklySummary,
};
use crate::domain::{DomainError, DomainResult, TripReportRecord};

/// A selectable week, `value` is the number of weeks back
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeekOptionDto {
    pub value: u32,
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<WeekOption> for WeekOptionDto {
    fn from(w: WeekOption) -> Self {
        Self {
            value: w.value,
            label: w.label,
            start: w.range.start,
            end: w.range.end,
        }
    }
}

/// Furthest week back a report may reach (about ten years)
pub const MAX_WEEKS_AGO: u32 = 520;

/// Report query: week offset plus an optional vehicle or employee name
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct WeeklyReportParams {
    /// 0 is the current week
    #[serde(default)]
    #[validate(range(max = 520, message = "weeks_ago must be at most 520"))]
    pub weeks_ago: u32,
    /// Vehicle name to narrow the report to
    pub vehicle: Option<String>,
    /// Employee full name to narrow the report to
    pub employee: Option<String>,
}

impl WeeklyReportParams {
    /// Checks the offset bound, then resolves the optional filter.
    pub fn filter(&self) -> DomainResult<Option<ReportFilter>> {
        self.validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match (present(&self.vehicle), present(&self.employee)) {
            (Some(_), Some(_)) => Err(DomainError::Validation(
                "Filter by either vehicle or employee, not both".into(),
            )),
            (Some(v), None) => Ok(Some(ReportFilter::Vehicle(v))),
            (None, Some(e)) => Ok(Some(ReportFilter::Employee(e))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklySummaryDto {
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub total_trips: usize,
    pub completed_trips: usize,
    pub active_trips: usize,
    pub pending_trips: usize,
    pub approved_trips: usize,
    pub rejected_trips: usize,
    pub total_distance: f64,
    pub avg_distance_per_trip: f64,
    pub total_vehicles: usize,
    pub total_employees: usize,
    pub avg_trips_per_vehicle: f64,
    pub avg_trips_per_employee: f64,
}

impl From<WeeklySummary> for WeeklySummaryDto {
    fn from(s: WeeklySummary) -> Self {
        Self {
            week_start: s.week.start,
            week_end: s.week.end,
            total_trips: s.total_trips,
            completed_trips: s.completed_trips,
            active_trips: s.active_trips,
            pending_trips: s.pending_trips,
            approved_trips: s.approved_trips,
            rejected_trips: s.rejected_trips,
            total_distance: s.total_distance,
            avg_distance_per_trip: s.avg_distance_per_trip,
            total_vehicles: s.total_vehicles,
            total_employees: s.total_employees,
            avg_trips_per_vehicle: s.avg_trips_per_vehicle,
            avg_trips_per_employee: s.avg_trips_per_employee,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleUtilizationDto {
    pub vehicle_name: String,
    pub vehicle_number: String,
    pub total_trips: usize,
    pub total_distance: f64,
    pub avg_distance: f64,
    pub utilization_days: usize,
    pub utilization_percentage: f64,
}

impl From<VehicleUtilization> for VehicleUtilizationDto {
    fn from(v: VehicleUtilization) -> Self {
        Self {
            vehicle_name: v.vehicle_name,
            vehicle_number: v.vehicle_number,
            total_trips: v.total_trips,
            total_distance: v.total_distance,
            avg_distance: v.avg_distance,
            utilization_days: v.utilization_days,
            utilization_percentage: v.utilization_percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeActivityDto {
    pub employee_name: String,
    pub employee_email: String,
    pub total_trips: usize,
    pub completed_trips: usize,
    pub total_distance: f64,
    pub avg_distance_per_trip: f64,
}

impl From<EmployeeActivity> for EmployeeActivityDto {
    fn from(e: EmployeeActivity) -> Self {
        Self {
            employee_name: e.employee_name,
            employee_email: e.employee_email,
            total_trips: e.total_trips,
            completed_trips: e.completed_trips,
            total_distance: e.total_distance,
            avg_distance_per_trip: e.avg_distance_per_trip,
        }
    }
}

/// One trip joined with its vehicle, employee and request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TripReportRecordDto {
    pub trip_id: String,
    pub vehicle_name: String,
    pub vehicle_number_plate: String,
    pub employee_name: String,
    pub employee_email: String,
    pub purpose: String,
    pub destination: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub distance: Option<f64>,
    pub status: String,
    pub approval_status: String,
    pub start_reading: Option<f64>,
    pub end_reading: Option<f64>,
}

impl From<TripReportRecord> for TripReportRecordDto {
    fn from(r: TripReportRecord) -> Self {
        Self {
            trip_id: r.trip_id,
            vehicle_name: r.vehicle_name,
            vehicle_number_plate: r.vehicle_number_plate,
            employee_name: r.employee_name,
            employee_email: r.employee_email,
            purpose: r.purpose,
            destination: r.destination,
            start_time: r.start_time,
            end_time: r.end_time,
            distance: r.distance,
            status: r.status.as_str().to_string(),
            approval_status: r.approval_status.as_str().to_string(),
            start_reading: r.start_reading,
            end_reading: r.end_reading,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklyReportDto {
    pub summary: WeeklySummaryDto,
    pub vehicles: Vec<VehicleUtilizationDto>,
    pub employees: Vec<EmployeeActivityDto>,
    pub trips: Vec<TripReportRecordDto>,
}

impl From<WeeklyReport> for WeeklyReportDto {
    fn from(r: WeeklyReport) -> Self {
        Self {
            summary: r.summary.into(),
            vehicles: r.vehicles.into_iter().map(Into::into).collect(),
            employees: r.employees.into_iter().map(Into::into).collect(),
            trips: r.records.into_iter().map(Into::into).collect(),
        }
    }
}
