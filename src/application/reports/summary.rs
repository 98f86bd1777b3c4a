//! Weekly aggregates over joined trip records

use std::collections::{HashMap, HashSet};

use super::week::WeekRange;
use crate::domain::trip::UNASSIGNED_VEHICLE;
use crate::domain::{ApprovalStatus, TripReportRecord, TripStatus};

const DAYS_IN_WEEK: f64 = 7.0;

/// Narrows the records of a report to one vehicle or one employee, by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFilter {
    Vehicle(String),
    Employee(String),
}

impl ReportFilter {
    pub fn matches(&self, record: &TripReportRecord) -> bool {
        match self {
            Self::Vehicle(name) => record.vehicle_name == *name,
            Self::Employee(name) => record.employee_name == *name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vehicle(_) => "Vehicle:",
            Self::Employee(_) => "Employee:",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Vehicle(name) | Self::Employee(name) => name,
        }
    }
}

pub fn apply_filter(
    records: Vec<TripReportRecord>,
    filter: Option<&ReportFilter>,
) -> Vec<TripReportRecord> {
    match filter {
        Some(filter) => records.into_iter().filter(|r| filter.matches(r)).collect(),
        None => records,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub week: WeekRange,
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

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleUtilization {
    pub vehicle_name: String,
    pub vehicle_number: String,
    pub total_trips: usize,
    pub total_distance: f64,
    pub avg_distance: f64,
    /// Distinct days with at least one trip start
    pub utilization_days: usize,
    pub utilization_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeActivity {
    pub employee_name: String,
    pub employee_email: String,
    pub total_trips: usize,
    pub completed_trips: usize,
    pub total_distance: f64,
    pub avg_distance_per_trip: f64,
}

fn has_vehicle(record: &TripReportRecord) -> bool {
    !record.vehicle_name.is_empty() && record.vehicle_name != UNASSIGNED_VEHICLE
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn distance_sum<'a>(records: impl Iterator<Item = &'a TripReportRecord>) -> f64 {
    records.map(|r| r.distance.unwrap_or(0.0)).sum()
}

/// Group records by key, keeping first-seen order.
fn group_by<'a, F>(records: &'a [TripReportRecord], key: F) -> Vec<(String, Vec<&'a TripReportRecord>)>
where
    F: Fn(&TripReportRecord) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&TripReportRecord>)> = Vec::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }
    groups
}

pub fn generate_summary(records: &[TripReportRecord], week: WeekRange) -> WeeklySummary {
    let count_status = |s: TripStatus| records.iter().filter(|r| r.status == s).count();
    let count_approval =
        |s: ApprovalStatus| records.iter().filter(|r| r.approval_status == s).count();

    let total_distance = distance_sum(records.iter());
    let vehicles: HashSet<&str> = records
        .iter()
        .filter(|r| has_vehicle(r))
        .map(|r| r.vehicle_name.as_str())
        .collect();
    let employees: HashSet<&str> = records.iter().map(|r| r.employee_name.as_str()).collect();

    WeeklySummary {
        week,
        total_trips: records.len(),
        completed_trips: count_status(TripStatus::Completed),
        active_trips: count_status(TripStatus::Active),
        pending_trips: count_approval(ApprovalStatus::Pending),
        approved_trips: count_approval(ApprovalStatus::Approved),
        rejected_trips: count_approval(ApprovalStatus::Rejected),
        total_distance,
        avg_distance_per_trip: ratio(total_distance, records.len()),
        total_vehicles: vehicles.len(),
        total_employees: employees.len(),
        avg_trips_per_vehicle: ratio(records.len() as f64, vehicles.len()),
        avg_trips_per_employee: ratio(records.len() as f64, employees.len()),
    }
}

/// Per-vehicle trip counts, distance and days in use, busiest first.
pub fn vehicle_utilization(records: &[TripReportRecord]) -> Vec<VehicleUtilization> {
    let mut rows: Vec<VehicleUtilization> =
        group_by(records, |r| has_vehicle(r).then(|| r.vehicle_name.clone()))
            .into_iter()
            .map(|(vehicle_name, trips)| {
                let total_distance = distance_sum(trips.iter().copied());
                let days: HashSet<_> = trips.iter().map(|t| t.start_time.date_naive()).collect();
                VehicleUtilization {
                    vehicle_number: trips[0].vehicle_number_plate.clone(),
                    total_trips: trips.len(),
                    total_distance,
                    avg_distance: ratio(total_distance, trips.len()),
                    utilization_days: days.len(),
                    utilization_percentage: days.len() as f64 / DAYS_IN_WEEK * 100.0,
                    vehicle_name,
                }
            })
            .collect();
    rows.sort_by(|a, b| b.total_trips.cmp(&a.total_trips));
    rows
}

/// Per-employee trip counts and distance, most active first.
pub fn employee_activity(records: &[TripReportRecord]) -> Vec<EmployeeActivity> {
    let mut rows: Vec<EmployeeActivity> = group_by(records, |r| Some(r.employee_name.clone()))
        .into_iter()
        .map(|(employee_name, trips)| {
            let total_distance = distance_sum(trips.iter().copied());
            EmployeeActivity {
                employee_email: trips[0].employee_email.clone(),
                total_trips: trips.len(),
                completed_trips: trips
                    .iter()
                    .filter(|t| t.status == TripStatus::Completed)
                    .count(),
                total_distance,
                avg_distance_per_trip: ratio(total_distance, trips.len()),
                employee_name,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total_trips.cmp(&a.total_trips));
    rows
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::reports::week::week_range;
    use chrono::{DateTime, TimeZone, Utc};

    pub(crate) fn record(
        vehicle: &str,
        employee: &str,
        start: DateTime<Utc>,
        distance: Option<f64>,
        status: TripStatus,
    ) -> TripReportRecord {
        TripReportRecord {
            trip_id: uuid::Uuid::new_v4().to_string(),
            vehicle_name: vehicle.into(),
            vehicle_number_plate: format!("{}-PLATE", vehicle),
            employee_name: employee.into(),
            employee_email: format!("{}@fleet.local", employee.to_lowercase()),
            purpose: "Client visit".into(),
            destination: "Downtown".into(),
            start_time: start,
            end_time: None,
            distance,
            status,
            approval_status: ApprovalStatus::Assigned,
            start_reading: Some(1000.0),
            end_reading: distance.map(|d| 1000.0 + d),
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: start,
        }
    }

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<TripReportRecord> {
        vec![
            record("Van", "Asha", day(13, 9), Some(40.0), TripStatus::Completed),
            record("Van", "Ravi", day(13, 15), Some(10.0), TripStatus::Completed),
            record("Van", "Asha", day(15, 9), None, TripStatus::Active),
            record("Sedan", "Asha", day(14, 9), Some(25.5), TripStatus::Completed),
        ]
    }

    #[test]
    fn summary_counts_and_averages() {
        let week = week_range(0, day(15, 12)).unwrap();
        let s = generate_summary(&sample(), week);
        assert_eq!(s.total_trips, 4);
        assert_eq!(s.completed_trips, 3);
        assert_eq!(s.active_trips, 1);
        assert_eq!(s.pending_trips, 0);
        assert!((s.total_distance - 75.5).abs() < 1e-9);
        assert!((s.avg_distance_per_trip - 18.875).abs() < 1e-9);
        assert_eq!(s.total_vehicles, 2);
        assert_eq!(s.total_employees, 2);
        assert!((s.avg_trips_per_vehicle - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_has_zero_averages() {
        let s = generate_summary(&[], week_range(0, day(15, 12)).unwrap());
        assert_eq!(s.total_trips, 0);
        assert_eq!(s.avg_distance_per_trip, 0.0);
        assert_eq!(s.avg_trips_per_vehicle, 0.0);
    }

    #[test]
    fn utilization_counts_distinct_days() {
        let rows = vehicle_utilization(&sample());
        assert_eq!(rows[0].vehicle_name, "Van");
        assert_eq!(rows[0].total_trips, 3);
        assert_eq!(rows[0].utilization_days, 2);
        assert!((rows[0].utilization_percentage - 200.0 / 7.0).abs() < 1e-9);
        assert!((rows[0].avg_distance - 50.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[1].vehicle_name, "Sedan");
        assert_eq!(rows[1].vehicle_number, "Sedan-PLATE");
    }

    #[test]
    fn unassigned_vehicle_is_not_counted() {
        let mut records = sample();
        records.push(record(
            UNASSIGNED_VEHICLE,
            "Ravi",
            day(16, 9),
            None,
            TripStatus::Active,
        ));
        let s = generate_summary(&records, week_range(0, day(15, 12)).unwrap());
        assert_eq!(s.total_vehicles, 2);
        assert!(vehicle_utilization(&records)
            .iter()
            .all(|v| v.vehicle_name != UNASSIGNED_VEHICLE));
    }

    #[test]
    fn employee_activity_sorted_by_trips() {
        let rows = employee_activity(&sample());
        assert_eq!(rows[0].employee_name, "Asha");
        assert_eq!(rows[0].total_trips, 3);
        assert_eq!(rows[0].completed_trips, 2);
        assert_eq!(rows[0].employee_email, "asha@fleet.local");
        assert_eq!(rows[1].employee_name, "Ravi");
    }

    #[test]
    fn filter_narrows_records() {
        let vans = apply_filter(sample(), Some(&ReportFilter::Vehicle("Van".into())));
        assert_eq!(vans.len(), 3);
        let ravi = apply_filter(sample(), Some(&ReportFilter::Employee("Ravi".into())));
        assert_eq!(ravi.len(), 1);
        assert_eq!(apply_filter(sample(), None).len(), 4);
    }
}
