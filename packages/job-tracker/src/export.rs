//! CSV export of application records.
//!
//! Rows come out in the order the caller passes them; nothing is re-sorted.
//! Company and location are always quoted (embedded quotes doubled), date
//! and status never are.

use chrono::NaiveDate;

use crate::error::{Result, TrackerError};
use crate::types::application::ApplicationRecord;

/// Header row, literal column order.
pub const CSV_HEADER: &str = "Company Name,Application Date,Job Location,Status";

/// MIME type of the export file.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Serialise `records` as CSV, one header row then one row per record.
///
/// Fails with [`TrackerError::NothingToExport`] for an empty slice so the
/// caller can tell the user instead of producing an empty file.
pub fn export_csv(records: &[ApplicationRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(TrackerError::NothingToExport);
    }

    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for record in records {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            quoted(&record.company_name),
            record.application_date.format("%Y-%m-%d"),
            quoted(record.location()),
            record.status
        ));
    }

    Ok(csv)
}

/// File name for an export made on `date`, e.g.
/// `job_applications_2024-01-05.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("job_applications_{}.csv", date.format("%Y-%m-%d"))
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::application::{ApplicationId, ApplicationStatus, NewApplication};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_single_record_with_comma_and_empty_location() {
        let record = NewApplication::new("Acme, Inc", date("2024-01-05"))
            .with_status(ApplicationStatus::new("pending"))
            .into_record(ApplicationId(1));

        let csv = export_csv(&[record]).unwrap();

        assert_eq!(
            csv,
            "Company Name,Application Date,Job Location,Status\n\"Acme, Inc\",2024-01-05,\"\",pending\n"
        );
    }

    #[test]
    fn test_rows_follow_caller_order() {
        let records = vec![
            NewApplication::new("Older", date("2023-01-01")).into_record(ApplicationId(1)),
            NewApplication::new("Newer", date("2024-01-01"))
                .with_location("Oslo")
                .with_status("interviewing")
                .into_record(ApplicationId(2)),
        ];

        let csv = export_csv(&records).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"Older\",2023-01-01,\"\",pending");
        assert_eq!(lines[2], "\"Newer\",2024-01-01,\"Oslo\",interviewing");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let record = NewApplication::new(r#"The "Best" Co"#, date("2024-01-05"))
            .into_record(ApplicationId(1));

        let csv = export_csv(&[record]).unwrap();
        assert!(csv.contains(r#""The ""Best"" Co",2024-01-05"#));
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(export_csv(&[]), Err(TrackerError::NothingToExport)));
    }

    #[test]
    fn test_filename() {
        assert_eq!(export_filename(date("2024-01-05")), "job_applications_2024-01-05.csv");
    }
}
