use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::{
    JOB_COLUMNS, JOB_COLUMNS_WITH_COUNT, JobEntry, ResponsibilityEntry,
};
use crate::pkg::internal::query::{ListQuery, Listing};
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    /// Detail read; soft-deleted jobs are still returned.
    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS_WITH_COUNT} FROM jobs WHERE jobs.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Locks the job row for the rest of the transaction.
    pub async fn lock_for_update(&mut self, id: i32) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE jobs.id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Returns `Some(is_active)` and holds a share lock so the job cannot be
    /// soft-deleted while an application is being written.
    pub async fn activity_for_share(&mut self, id: i32) -> Result<Option<bool>> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT is_active FROM jobs WHERE id = $1 FOR SHARE",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(active)
    }

    /// Returns the total matching rows and the requested page.
    pub async fn list<L: Listing>(&mut self, query: &ListQuery<L>) -> Result<(i64, Vec<JobEntry>)> {
        query.fetch::<JobEntry>(&mut *self.pool).await
    }

    pub async fn responsibilities(&mut self, job_id: i32) -> Result<Vec<ResponsibilityEntry>> {
        let rows = sqlx::query_as::<_, ResponsibilityEntry>(
            "SELECT id, title, points, job_id, sort_order FROM job_responsibilities
             WHERE job_id = $1 ORDER BY sort_order ASC",
        )
        .bind(job_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn responsibilities_for(
        &mut self,
        job_ids: &[i32],
    ) -> Result<Vec<ResponsibilityEntry>> {
        if job_ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, ResponsibilityEntry>(
            "SELECT id, title, points, job_id, sort_order FROM job_responsibilities
             WHERE job_id = ANY($1) ORDER BY job_id, sort_order ASC",
        )
        .bind(job_ids)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
