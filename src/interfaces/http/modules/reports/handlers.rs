//! Report API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;

use super::dto::{WeekOptionDto, WeeklyReportDto, WeeklyReportParams};
use crate::application::ReportService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{api_error, ok, ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct ReportHandlerState {
    pub reports: Arc<ReportService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/weeks",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Selectable weeks, current first", body = ApiResponse<Vec<WeekOptionDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_weeks(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<WeekOptionDto>> {
    let weeks = state
        .reports
        .weeks(&user.actor, Utc::now())
        .map_err(api_error)?;
    ok(weeks.into_iter().map(WeekOptionDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/weekly",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(WeeklyReportParams),
    responses(
        (status = 200, description = "Summary, utilization and trips of the week", body = ApiResponse<WeeklyReportDto>),
        (status = 400, description = "Both filters given or week offset out of range"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn weekly_report(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<WeeklyReportParams>,
) -> ApiResult<WeeklyReportDto> {
    let filter = params.filter().map_err(api_error)?;
    let report = state
        .reports
        .weekly_report(&user.actor, params.weeks_ago, filter.as_ref(), Utc::now())
        .await
        .map_err(api_error)?;
    ok(report.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/weekly/export",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(WeeklyReportParams),
    responses(
        (status = 200, description = "Spreadsheet download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Both filters given or week offset out of range"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn export_weekly_report(
    State(state): State<ReportHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<WeeklyReportParams>,
) -> Result<Response, ApiError> {
    let filter = params.filter().map_err(api_error)?;
    let export = state
        .reports
        .export(&user.actor, params.weeks_ago, filter.as_ref(), Utc::now())
        .await
        .map_err(api_error)?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.file_name.replace('"', "'")
    ))
    .map_err(|e| api_error(DomainError::Storage(format!("Bad file name: {}", e))))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}
