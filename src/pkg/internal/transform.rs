//! Mapping between the storage shape (upper-snake enums, flat rows) and the
//! wire shape (hyphenated lowercase enums, nested `jobInformation`).

use std::{fmt, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::pkg::internal::adaptors::jobs::spec::{JobEntry, ResponsibilityEntry};
use crate::prelude::{Error, Result};

pub const TITLE_PLACEHOLDER: &str = "Job Title Not Available";
pub const LOCATION_PLACEHOLDER: &str = "Location Not Specified";
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available";
pub const NOT_SPECIFIED: &str = "Not Specified";

/// `full-time` -> `FULL_TIME`. Values outside the legal set pass through and
/// are left for the storage constraint to reject.
pub fn job_type_to_storage(external: &str) -> String {
    external.to_uppercase().replace('-', "_")
}

/// `FULL_TIME` -> `full-time`.
pub fn job_type_to_wire(internal: &str) -> String {
    internal.to_lowercase().replace('_', "-")
}

pub fn status_to_storage(external: &str) -> String {
    external.to_uppercase()
}

pub fn status_to_wire(internal: &str) -> String {
    internal.to_lowercase()
}

/// RFC 3339 with millisecond precision, `2025-10-08T10:44:17.000Z`.
pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub fn as_storage(&self) -> String {
        status_to_storage(self.as_wire())
    }

    pub fn invalid_message() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|s| s.as_wire()).collect();
        format!("Invalid status. Must be one of: {}", names.join(", "))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Parses the wire form only; `PENDING` is not accepted from clients.
impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_wire() == s)
            .ok_or_else(|| Error::validation(Self::invalid_message()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobInformation {
    pub title: String,
    pub description: String,
    pub salary: String,
    pub date_opened: String,
    pub job_type: String,
    pub work_experience: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireJob {
    pub requirements: Vec<String>,
    pub qualifications: Vec<String>,
    pub responsibilities: Vec<ResponsibilityEntry>,
    pub job_information: JobInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobCard {
    pub id: i32,
    pub title: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub time: String,
}

pub fn transform_job_for_response(
    job: &JobEntry,
    mut responsibilities: Vec<ResponsibilityEntry>,
) -> WireJob {
    responsibilities.sort_by_key(|r| r.sort_order);
    let date_opened = job.date_opened.as_ref().unwrap_or(&job.created_at);
    WireJob {
        requirements: job.requirements.0.clone(),
        qualifications: job.qualifications.0.clone(),
        responsibilities,
        job_information: JobInformation {
            title: job.title.clone(),
            description: job.description.clone(),
            salary: job.salary.clone().unwrap_or_default(),
            date_opened: timestamp(date_opened),
            job_type: job_type_to_wire(&job.job_type),
            work_experience: job.work_experience.clone(),
            city: job.city.clone(),
            state: job.state.clone(),
            country: job.country.clone(),
            zip_code: job.zip_code.clone().unwrap_or_default(),
        },
        id: Some(job.id),
        created_at: Some(timestamp(&job.created_at)),
        updated_at: Some(timestamp(&job.updated_at)),
        applications_count: job.applications_count,
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub fn transform_job_to_card(job: &JobEntry) -> JobCard {
    let location = [job.city.as_str(), job.state.as_str()]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let job_type = if job.job_type.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        job_type_to_wire(&job.job_type)
    };
    JobCard {
        id: job.id,
        title: or_placeholder(&job.title, TITLE_PLACEHOLDER),
        location: or_placeholder(&location, LOCATION_PLACEHOLDER),
        description: or_placeholder(&job.description, DESCRIPTION_PLACEHOLDER),
        job_type,
        time: or_placeholder(&job.work_experience, NOT_SPECIFIED),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sqlx::types::Json;

    use super::*;

    fn job_entry() -> JobEntry {
        let created = Utc.with_ymd_and_hms(2025, 10, 8, 10, 44, 17).unwrap();
        JobEntry {
            id: 7,
            title: "Engineer".into(),
            description: "Build things".into(),
            salary: None,
            date_opened: None,
            job_type: "FULL_TIME".into(),
            work_experience: "3+ years".into(),
            city: "Lagos".into(),
            state: "LA".into(),
            country: "Nigeria".into(),
            zip_code: None,
            requirements: Json(vec!["Rust".into()]),
            qualifications: Json(vec![]),
            created_by: 1,
            is_active: true,
            created_at: created,
            updated_at: created,
            applications_count: None,
        }
    }

    #[test]
    fn job_type_round_trips() {
        for wire in ["full-time", "part-time", "contract", "internship"] {
            assert_eq!(job_type_to_wire(&job_type_to_storage(wire)), wire);
        }
        assert_eq!(job_type_to_storage("full-time"), "FULL_TIME");
        assert_eq!(job_type_to_wire("PART_TIME"), "part-time");
    }

    #[test]
    fn multi_hyphen_job_type_round_trips() {
        let wire = "fixed-term-remote-contract";
        assert_eq!(job_type_to_storage(wire), "FIXED_TERM_REMOTE_CONTRACT");
        assert_eq!(job_type_to_wire(&job_type_to_storage(wire)), wire);
    }

    #[test]
    fn status_round_trips() {
        for status in ApplicationStatus::ALL {
            let wire = status.as_wire();
            assert_eq!(status_to_wire(&status_to_storage(wire)), wire);
            assert_eq!(wire.parse::<ApplicationStatus>().unwrap(), status);
        }
        assert_eq!(ApplicationStatus::Hired.as_storage(), "HIRED");
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        for bad in ["archived", "PENDING", "", " pending"] {
            let err = bad.parse::<ApplicationStatus>().unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid status. Must be one of: pending, reviewed, interview, rejected, hired"
            );
        }
    }

    #[test]
    fn job_response_nests_information() {
        let job = job_entry();
        let resp = ResponsibilityEntry {
            id: 1,
            title: "Design".into(),
            points: Json(vec!["a".into(), "b".into()]),
            job_id: 7,
            sort_order: 0,
        };
        let wire = transform_job_for_response(&job, vec![resp]);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["jobInformation"]["jobType"], "full-time");
        assert_eq!(json["jobInformation"]["salary"], "");
        assert_eq!(json["jobInformation"]["zipCode"], "");
        // falls back to createdAt
        assert_eq!(json["jobInformation"]["dateOpened"], "2025-10-08T10:44:17.000Z");
        assert_eq!(json["responsibilities"][0]["order"], 0);
        assert_eq!(json["responsibilities"][0]["points"][1], "b");
        assert!(json["responsibilities"][0].get("job_id").is_none());
        assert_eq!(json["requirements"][0], "Rust");
        assert_eq!(json["id"], 7);
        assert!(json.get("applicationsCount").is_none());
    }

    #[test]
    fn job_response_includes_count_when_known() {
        let mut job = job_entry();
        job.applications_count = Some(3);
        job.salary = Some("100k".into());
        let json = serde_json::to_value(transform_job_for_response(&job, vec![])).unwrap();
        assert_eq!(json["applicationsCount"], 3);
        assert_eq!(json["jobInformation"]["salary"], "100k");
        assert_eq!(json["responsibilities"], serde_json::json!([]));
    }

    #[test]
    fn responsibilities_come_out_in_order() {
        let job = job_entry();
        let make = |id, sort_order| ResponsibilityEntry {
            id,
            title: format!("r{id}"),
            points: Json(vec![]),
            job_id: 7,
            sort_order,
        };
        let wire = transform_job_for_response(&job, vec![make(2, 1), make(1, 0)]);
        let orders: Vec<i32> = wire.responsibilities.iter().map(|r| r.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn card_shape() {
        let card = transform_job_to_card(&job_entry());
        assert_eq!(
            card,
            JobCard {
                id: 7,
                title: "Engineer".into(),
                location: "Lagos, LA".into(),
                description: "Build things".into(),
                job_type: "full-time".into(),
                time: "3+ years".into(),
            }
        );
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "full-time");
    }

    #[test]
    fn card_placeholders_replace_empty_fields() {
        let mut job = job_entry();
        job.title = String::new();
        job.city = String::new();
        job.state = String::new();
        job.description = String::new();
        job.job_type = String::new();
        job.work_experience = String::new();
        let card = transform_job_to_card(&job);
        assert_eq!(card.title, TITLE_PLACEHOLDER);
        assert_eq!(card.location, LOCATION_PLACEHOLDER);
        assert_eq!(card.description, DESCRIPTION_PLACEHOLDER);
        assert_eq!(card.job_type, NOT_SPECIFIED);
        assert_eq!(card.time, NOT_SPECIFIED);

        job.state = "Ogun".into();
        assert_eq!(transform_job_to_card(&job).location, "Ogun");
    }
}
