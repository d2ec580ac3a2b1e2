use chrono::{DateTime, Utc};
use sqlx::FromRow;

macro_rules! application_columns {
    () => {
        "job_applications.id, job_applications.job_id, job_applications.applicant_name, \
         job_applications.applicant_email, job_applications.resume_url, \
         job_applications.cover_letter, job_applications.status, \
         job_applications.created_at, job_applications.updated_at"
    };
}

pub const APPLICATION_COLUMNS: &str = application_columns!();

/// Application columns plus the summary of the job applied to.
pub const APPLICATION_COLUMNS_WITH_JOB: &str = concat!(
    application_columns!(),
    ", jobs.title AS job_title, jobs.job_type AS job_type"
);

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntry {
    pub id: i32,
    pub job_id: i32,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub job_title: Option<String>,
    #[sqlx(default)]
    pub job_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: i32,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}
