use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

macro_rules! job_columns {
    () => {
        "jobs.id, jobs.title, jobs.description, jobs.salary, jobs.date_opened, jobs.job_type, \
         jobs.work_experience, jobs.city, jobs.state, jobs.country, jobs.zip_code, \
         jobs.requirements, jobs.qualifications, jobs.created_by, jobs.is_active, \
         jobs.created_at, jobs.updated_at"
    };
}

pub const JOB_COLUMNS: &str = job_columns!();

/// Job columns plus the number of applications each job has received.
pub const JOB_COLUMNS_WITH_COUNT: &str = concat!(
    job_columns!(),
    ", (SELECT COUNT(*) FROM job_applications \
     WHERE job_applications.job_id = jobs.id) AS applications_count"
);

#[derive(Debug, Clone, FromRow)]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub salary: Option<String>,
    pub date_opened: Option<DateTime<Utc>>,
    pub job_type: String,
    pub work_experience: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>,
    pub requirements: Json<Vec<String>>,
    pub qualifications: Json<Vec<String>>,
    pub created_by: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub applications_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ResponsibilityEntry {
    pub id: i32,
    pub title: String,
    pub points: Json<Vec<String>>,
    #[serde(skip)]
    pub job_id: i32,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Storage-shaped job row ready for insert; `job_type` is already canonicalised.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub salary: Option<String>,
    pub job_type: String,
    pub work_experience: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>,
    pub requirements: Vec<String>,
    pub qualifications: Vec<String>,
    pub created_by: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NewResponsibility {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}

/// Column changes for an update. `None` leaves the column untouched; for the
/// nullable columns the inner option is the new value.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub salary: Option<Option<String>>,
    pub job_type: Option<String>,
    pub work_experience: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<Option<String>>,
    pub requirements: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub created_by: Option<i32>,
}
