use sqlx::PgConnection;

use crate::pkg::internal::adaptors::applications::spec::{
    APPLICATION_COLUMNS, APPLICATION_COLUMNS_WITH_JOB, ApplicationEntry, NewApplication,
};
use crate::prelude::Result;

pub struct ApplicationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationMutator { pool }
    }

    /// New applications start out `PENDING`.
    pub async fn create(&mut self, application: NewApplication) -> Result<ApplicationEntry> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            INSERT INTO job_applications (job_id, applicant_name, applicant_email, resume_url, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(application.job_id)
        .bind(&application.applicant_name)
        .bind(&application.applicant_email)
        .bind(&application.resume_url)
        .bind(&application.cover_letter)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Sets the storage status and returns the row joined with its job.
    pub async fn set_status(&mut self, id: i32, status: &str) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            UPDATE job_applications
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            FROM jobs
            WHERE job_applications.id = $2 AND jobs.id = job_applications.job_id
            RETURNING {APPLICATION_COLUMNS_WITH_JOB}
            "#
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
