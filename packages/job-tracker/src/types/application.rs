//! Application records and their labels.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::signal::PageSignal;

/// Unique record identifier.
///
/// Numeric so records written by older tooling (plain millisecond
/// timestamps) keep loading. New ids come from the store's generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl ApplicationId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ApplicationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Status label of an application.
///
/// The label set is open: any string loads and round-trips unchanged. The
/// constants below are the labels the tracker offers by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationStatus(String);

impl ApplicationStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPLIED: &'static str = "applied";
    pub const INTERVIEWING: &'static str = "interviewing";
    pub const OFFERED: &'static str = "offered";
    pub const REJECTED: &'static str = "rejected";
    pub const ACCEPTED: &'static str = "accepted";
    pub const WITHDRAWN: &'static str = "withdrawn";

    /// Labels offered when none is given explicitly.
    pub const KNOWN: [&'static str; 7] = [
        Self::PENDING,
        Self::APPLIED,
        Self::INTERVIEWING,
        Self::OFFERED,
        Self::REJECTED,
        Self::ACCEPTED,
        Self::WITHDRAWN,
    ];

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the [`KNOWN`](Self::KNOWN) labels.
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }

    /// Display class derived from the label, e.g. `status-pending`.
    pub fn css_class(&self) -> String {
        format!("status-{}", self.0)
    }

    /// Label with its first character upper-cased, e.g. `Pending`.
    pub fn display_label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::new(Self::PENDING)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationStatus {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One tracked job application.
///
/// Records are never edited in place: they are created and deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub company_name: String,
    pub application_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_location: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl ApplicationRecord {
    /// Location for display and export; absent renders as empty.
    pub fn location(&self) -> &str {
        self.job_location.as_deref().unwrap_or("")
    }
}

/// Form input for a record that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub company_name: String,
    pub application_date: NaiveDate,
    pub job_location: Option<String>,
    pub status: ApplicationStatus,
}

impl NewApplication {
    pub fn new(company_name: impl Into<String>, application_date: NaiveDate) -> Self {
        Self {
            company_name: company_name.into(),
            application_date,
            job_location: None,
            status: ApplicationStatus::default(),
        }
    }

    /// Pre-fill from a fresh page signal (quick-add).
    pub fn from_signal(
        signal: &PageSignal,
        application_date: NaiveDate,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            company_name: signal.company_name.clone(),
            application_date,
            job_location: non_empty(&signal.job_location),
            status,
        }
    }

    /// Set the location; blank input clears it.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.job_location = non_empty(&location.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<ApplicationStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// Attach an id, producing the stored record.
    pub fn into_record(self, id: ApplicationId) -> ApplicationRecord {
        ApplicationRecord {
            id,
            company_name: self.company_name,
            application_date: self.application_date,
            job_location: self.job_location,
            status: self.status,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_display_helpers() {
        let status = ApplicationStatus::new("interviewing");
        assert_eq!(status.css_class(), "status-interviewing");
        assert_eq!(status.display_label(), "Interviewing");
        assert!(status.is_known());

        let custom = ApplicationStatus::new("ghosted");
        assert!(!custom.is_known());
        assert_eq!(custom.display_label(), "Ghosted");
        assert_eq!(ApplicationStatus::new("").display_label(), "");
    }

    #[test]
    fn test_record_loads_legacy_shape() {
        // Numeric millisecond id, empty location string, unknown status label
        let json = r#"{
            "id": 1704412800123,
            "companyName": "Acme",
            "applicationDate": "2024-01-05",
            "jobLocation": "",
            "status": "on-hold"
        }"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, ApplicationId(1_704_412_800_123));
        assert_eq!(record.application_date, date("2024-01-05"));
        assert_eq!(record.location(), "");
        assert_eq!(record.status.as_str(), "on-hold");
    }

    #[test]
    fn test_from_signal_prefills_company_and_location() {
        let signal = PageSignal::new("https://acme.com/jobs/1")
            .with_company("Acme")
            .with_title("Engineer")
            .with_location("  Berlin ");

        let new = NewApplication::from_signal(
            &signal,
            date("2024-02-01"),
            ApplicationStatus::new(ApplicationStatus::APPLIED),
        );

        assert_eq!(new.company_name, "Acme");
        assert_eq!(new.job_location.as_deref(), Some("Berlin"));
        assert_eq!(new.status.as_str(), "applied");
    }

    #[test]
    fn test_blank_location_is_absent() {
        let new = NewApplication::new("Acme", date("2024-02-01")).with_location("   ");
        assert_eq!(new.job_location, None);
    }
}
