//! Weekly report use cases

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::export::{build_sheet, report_file_name, ReportSheet};
use super::summary::{
    apply_filter, employee_activity, generate_summary, vehicle_utilization, EmployeeActivity,
    ReportFilter, VehicleUtilization, WeeklySummary,
};
use super::week::{available_weeks, week_range, WeekOption, WeekRange};
use crate::domain::{Actor, DomainResult, RepositoryProvider, TripReportRecord};

/// Number of weeks offered for selection
pub const DEFAULT_WEEK_COUNT: u32 = 12;

#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub week: WeekRange,
    pub summary: WeeklySummary,
    pub vehicles: Vec<VehicleUtilization>,
    pub employees: Vec<EmployeeActivity>,
    pub records: Vec<TripReportRecord>,
}

/// A rendered spreadsheet ready for download
#[derive(Debug, Clone)]
pub struct ReportExport {
    pub file_name: String,
    pub sheet: ReportSheet,
    pub bytes: Vec<u8>,
}

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub fn weeks(&self, actor: &Actor, now: DateTime<Utc>) -> DomainResult<Vec<WeekOption>> {
        actor.require_admin()?;
        Ok(available_weeks(DEFAULT_WEEK_COUNT, now))
    }

    async fn records(
        &self,
        week: WeekRange,
        filter: Option<&ReportFilter>,
    ) -> DomainResult<Vec<TripReportRecord>> {
        let records = self
            .repos
            .trips()
            .find_report_records(week.start, week.end)
            .await?;
        Ok(apply_filter(records, filter))
    }

    pub async fn weekly_report(
        &self,
        actor: &Actor,
        weeks_ago: u32,
        filter: Option<&ReportFilter>,
        now: DateTime<Utc>,
    ) -> DomainResult<WeeklyReport> {
        actor.require_admin()?;
        let week = week_range(weeks_ago, now)?;
        let records = self.records(week, filter).await?;
        Ok(WeeklyReport {
            week,
            summary: generate_summary(&records, week),
            vehicles: vehicle_utilization(&records),
            employees: employee_activity(&records),
            records,
        })
    }

    pub async fn export(
        &self,
        actor: &Actor,
        weeks_ago: u32,
        filter: Option<&ReportFilter>,
        now: DateTime<Utc>,
    ) -> DomainResult<ReportExport> {
        actor.require_admin()?;
        let week = week_range(weeks_ago, now)?;
        let records = self.records(week, filter).await?;
        let sheet = build_sheet(&records, week, filter, now);
        let bytes = sheet.render_xlsx()?;
        let file_name = report_file_name(week.start, filter);

        metrics::counter!("fleet_report_exports_total").increment(1);
        info!(file_name = %file_name, trips = records.len(), "Weekly report exported");
        Ok(ReportExport {
            file_name,
            sheet,
            bytes,
        })
    }
}
