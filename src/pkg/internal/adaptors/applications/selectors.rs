use sqlx::PgConnection;

use crate::pkg::internal::adaptors::applications::spec::ApplicationEntry;
use crate::pkg::internal::query::{ListQuery, Listing};
use crate::prelude::Result;

pub struct ApplicationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn exists(&mut self, job_id: i32, applicant_email: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM job_applications WHERE job_id = $1 AND applicant_email = $2)",
        )
        .bind(job_id)
        .bind(applicant_email)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(found)
    }

    pub async fn list<L: Listing>(
        &mut self,
        query: &ListQuery<L>,
    ) -> Result<(i64, Vec<ApplicationEntry>)> {
        query.fetch::<ApplicationEntry>(&mut *self.pool).await
    }
}
