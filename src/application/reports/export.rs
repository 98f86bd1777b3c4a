//! Weekly report spreadsheet
//!
//! The sheet is assembled as rows of [`Cell`]s first so it can be inspected
//! and re-read, then rendered to `.xlsx` bytes.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};

use super::summary::ReportFilter;
use super::week::WeekRange;
use crate::domain::{TripReportRecord, TripStatus};
use crate::shared::errors::InfraError;

pub const SHEET_NAME: &str = "Weekly Report";
pub const REPORT_TITLE: &str = "Weekly Vehicle Report";

pub const COLUMNS: [&str; 9] = [
    "Sr. No.",
    "Date",
    "Employee Name",
    "Vehicle Number",
    "Start Meter",
    "End Meter",
    "Total Distance (km)",
    "Trip Purpose",
    "Status",
];

pub const COLUMN_WIDTHS: [f64; 9] = [8.0, 14.0, 22.0, 16.0, 14.0, 14.0, 18.0, 35.0, 12.0];

const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    pub column_widths: Vec<f64>,
}

fn status_label(status: TripStatus) -> &'static str {
    match status {
        TripStatus::Completed => "Completed",
        TripStatus::Active => "Active",
    }
}

fn meter(reading: Option<f64>) -> Cell {
    reading.map_or_else(|| Cell::text(MISSING), Cell::Number)
}

fn trip_row(index: usize, record: &TripReportRecord) -> Vec<Cell> {
    vec![
        Cell::Number((index + 1) as f64),
        Cell::text(record.start_time.format("%d %b %Y").to_string()),
        Cell::text(record.employee_name.clone()),
        Cell::text(if record.vehicle_number_plate.is_empty() {
            MISSING.to_string()
        } else {
            record.vehicle_number_plate.clone()
        }),
        meter(record.start_reading),
        meter(record.end_reading),
        Cell::text(
            record
                .distance
                .map_or_else(|| MISSING.to_string(), |d| format!("{:.2}", d)),
        ),
        Cell::text(record.purpose.clone()),
        Cell::text(status_label(record.status)),
    ]
}

/// Lay out the metadata block, the header row and one row per trip.
pub fn build_sheet(
    records: &[TripReportRecord],
    week: WeekRange,
    filter: Option<&ReportFilter>,
    generated_at: DateTime<Utc>,
) -> ReportSheet {
    let mut rows = vec![
        vec![Cell::text(REPORT_TITLE)],
        vec![
            Cell::text("Report Period:"),
            Cell::text(format!(
                "{} - {}",
                week.start.format("%d %b %Y"),
                week.end.format("%d %b %Y")
            )),
        ],
        vec![
            Cell::text("Generated On:"),
            Cell::text(generated_at.format("%d %b %Y %H:%M").to_string()),
        ],
    ];
    if let Some(filter) = filter {
        rows.push(vec![Cell::text(filter.label()), Cell::text(filter.name())]);
    }
    rows.push(vec![
        Cell::text("Total Trips:"),
        Cell::text(records.len().to_string()),
    ]);
    rows.push(vec![Cell::Empty]);
    rows.push(COLUMNS.iter().map(|c| Cell::text(*c)).collect());
    rows.extend(records.iter().enumerate().map(|(i, r)| trip_row(i, r)));

    ReportSheet {
        name: SHEET_NAME.to_string(),
        rows,
        column_widths: COLUMN_WIDTHS.to_vec(),
    }
}

impl ReportSheet {
    /// Index of the column header row.
    pub fn header_index(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.first().and_then(Cell::as_text) == Some(COLUMNS[0]))
    }

    /// Rows below the column header.
    pub fn trip_rows(&self) -> &[Vec<Cell>] {
        match self.header_index() {
            Some(i) => &self.rows[i + 1..],
            None => &[],
        }
    }

    pub fn render_xlsx(&self) -> Result<Vec<u8>, InfraError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let header = self.header_index();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.name)?;

        for (col, width) in self.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        for (r, row) in self.rows.iter().enumerate() {
            let emphasize = r == 0 || Some(r) == header;
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(s) if emphasize => {
                        worksheet.write_string_with_format(r, c, s, &bold)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

/// `Trip_Report_<yyyy-mm-dd>[_<Filter_Name>].xlsx`
pub fn report_file_name(week_start: DateTime<Utc>, filter: Option<&ReportFilter>) -> String {
    let suffix = filter
        .map(|f| format!("_{}", underscore_whitespace(f.name())))
        .unwrap_or_default();
    format!("Trip_Report_{}{}.xlsx", week_start.format("%Y-%m-%d"), suffix)
}

/// Each run of whitespace becomes one `_`, including leading and trailing runs.
fn underscore_whitespace(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reports::summary::tests::record;
    use crate::application::reports::week::week_range;
    use chrono::TimeZone;

    fn week() -> WeekRange {
        week_range(0, Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()).unwrap()
    }

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 5, 0).unwrap()
    }

    fn records() -> Vec<TripReportRecord> {
        vec![
            record(
                "Van",
                "Asha",
                Utc.with_ymd_and_hms(2024, 5, 15, 9, 0, 0).unwrap(),
                Some(50.0),
                TripStatus::Completed,
            ),
            record(
                "Sedan",
                "Ravi",
                Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap(),
                None,
                TripStatus::Active,
            ),
        ]
    }

    #[test]
    fn metadata_block_layout() {
        let sheet = build_sheet(&records(), week(), None, generated());
        assert_eq!(sheet.name, SHEET_NAME);
        assert_eq!(sheet.rows[0], vec![Cell::text(REPORT_TITLE)]);
        assert_eq!(sheet.rows[1][1].as_text(), Some("13 May 2024 - 19 May 2024"));
        assert_eq!(sheet.rows[2][1].as_text(), Some("20 May 2024 08:05"));
        assert_eq!(sheet.rows[3][0].as_text(), Some("Total Trips:"));
        assert_eq!(sheet.rows[3][1].as_text(), Some("2"));
        assert_eq!(sheet.rows[4], vec![Cell::Empty]);
        assert_eq!(sheet.header_index(), Some(5));
        assert_eq!(sheet.column_widths, COLUMN_WIDTHS.to_vec());
    }

    #[test]
    fn filter_line_precedes_total() {
        let filter = ReportFilter::Vehicle("Van".into());
        let sheet = build_sheet(&records()[..1], week(), Some(&filter), generated());
        assert_eq!(sheet.rows[3][0].as_text(), Some("Vehicle:"));
        assert_eq!(sheet.rows[3][1].as_text(), Some("Van"));
        assert_eq!(sheet.rows[4][0].as_text(), Some("Total Trips:"));
        assert_eq!(sheet.header_index(), Some(6));
    }

    #[test]
    fn trip_rows_reproduce_records() {
        let input = records();
        let sheet = build_sheet(&input, week(), None, generated());
        let rows = sheet.trip_rows();
        assert_eq!(rows.len(), input.len());

        assert_eq!(rows[0][0].as_number(), Some(1.0));
        assert_eq!(rows[0][1].as_text(), Some("15 May 2024"));
        assert_eq!(rows[0][2].as_text(), Some("Asha"));
        assert_eq!(rows[0][3].as_text(), Some("Van-PLATE"));
        assert_eq!(rows[0][4].as_number(), Some(1000.0));
        assert_eq!(rows[0][5].as_number(), Some(1050.0));
        assert_eq!(rows[0][6].as_text(), Some("50.00"));
        assert_eq!(rows[0][7].as_text(), Some("Client visit"));
        assert_eq!(rows[0][8].as_text(), Some("Completed"));

        assert_eq!(rows[1][0].as_number(), Some(2.0));
        assert_eq!(rows[1][5].as_text(), Some("-"));
        assert_eq!(rows[1][6].as_text(), Some("-"));
        assert_eq!(rows[1][8].as_text(), Some("Active"));
    }

    #[test]
    fn renders_xlsx_archive() {
        let sheet = build_sheet(&records(), week(), None, generated());
        let bytes = sheet.render_xlsx().unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn file_names() {
        let start = week().start;
        assert_eq!(report_file_name(start, None), "Trip_Report_2024-05-13.xlsx");
        let filter = ReportFilter::Employee("Asha  Rao".into());
        assert_eq!(
            report_file_name(start, Some(&filter)),
            "Trip_Report_2024-05-13_Asha_Rao.xlsx"
        );
        let filter = ReportFilter::Vehicle(" Van\t KA-01 ".into());
        assert_eq!(
            report_file_name(start, Some(&filter)),
            "Trip_Report_2024-05-13__Van_KA-01_.xlsx"
        );
    }
}
