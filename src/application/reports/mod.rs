//! Weekly reporting: week windows, aggregates and spreadsheet export

pub mod export;
pub mod service;
pub mod summary;
pub mod week;

pub use export::{build_sheet, report_file_name, Cell, ReportSheet};
pub use service::{ReportExport, ReportService, WeeklyReport, DEFAULT_WEEK_COUNT};
pub use summary::{EmployeeActivity, ReportFilter, VehicleUtilization, WeeklySummary};
pub use week::{available_weeks, week_range, WeekOption, WeekRange};
