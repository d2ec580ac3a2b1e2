use sqlx::{PgConnection, Postgres, QueryBuilder, types::Json};

use crate::pkg::internal::adaptors::jobs::spec::{
    JOB_COLUMNS, JobChanges, JobEntry, NewJob, NewResponsibility, ResponsibilityEntry,
};
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: NewJob) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (title, description, salary, job_type, work_experience, city, state,
                              country, zip_code, requirements, qualifications, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.salary)
        .bind(&job.job_type)
        .bind(&job.work_experience)
        .bind(&job.city)
        .bind(&job.state)
        .bind(&job.country)
        .bind(&job.zip_code)
        .bind(Json(&job.requirements))
        .bind(Json(&job.qualifications))
        .bind(job.created_by)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i32, changes: JobChanges) -> Result<Option<JobEntry>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE jobs SET updated_at = CURRENT_TIMESTAMP");

        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = changes.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(salary) = changes.salary {
            qb.push(", salary = ").push_bind(salary);
        }
        if let Some(job_type) = changes.job_type {
            qb.push(", job_type = ").push_bind(job_type);
        }
        if let Some(work_experience) = changes.work_experience {
            qb.push(", work_experience = ").push_bind(work_experience);
        }
        if let Some(city) = changes.city {
            qb.push(", city = ").push_bind(city);
        }
        if let Some(state) = changes.state {
            qb.push(", state = ").push_bind(state);
        }
        if let Some(country) = changes.country {
            qb.push(", country = ").push_bind(country);
        }
        if let Some(zip_code) = changes.zip_code {
            qb.push(", zip_code = ").push_bind(zip_code);
        }
        if let Some(requirements) = changes.requirements {
            qb.push(", requirements = ").push_bind(Json(requirements));
        }
        if let Some(qualifications) = changes.qualifications {
            qb.push(", qualifications = ").push_bind(Json(qualifications));
        }
        if let Some(created_by) = changes.created_by {
            qb.push(", created_by = ").push_bind(created_by);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {JOB_COLUMNS}"));

        let row = qb
            .build_query_as::<JobEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    /// Soft delete. Returns false when no job has this id.
    pub async fn deactivate(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE jobs SET is_active = FALSE, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Writes `responsibilities` in order, numbering them from 0.
    pub async fn insert_responsibilities(
        &mut self,
        job_id: i32,
        responsibilities: Vec<NewResponsibility>,
    ) -> Result<Vec<ResponsibilityEntry>> {
        if responsibilities.is_empty() {
            return Ok(Vec::new());
        }
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO job_responsibilities (job_id, title, points, sort_order) ",
        );
        query_builder.push_values(
            responsibilities.into_iter().enumerate(),
            |mut b, (index, resp)| {
                b.push_bind(job_id)
                    .push_bind(resp.title)
                    .push_bind(Json(resp.points))
                    .push_bind(index as i32);
            },
        );
        query_builder.push(" RETURNING id, title, points, job_id, sort_order");
        let mut rows = query_builder
            .build_query_as::<ResponsibilityEntry>()
            .fetch_all(&mut *self.pool)
            .await?;
        rows.sort_by_key(|r| r.sort_order);
        Ok(rows)
    }

    /// Replaces the whole responsibility set of a job.
    pub async fn replace_responsibilities(
        &mut self,
        job_id: i32,
        responsibilities: Vec<NewResponsibility>,
    ) -> Result<Vec<ResponsibilityEntry>> {
        let removed = sqlx::query("DELETE FROM job_responsibilities WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *self.pool)
            .await?
            .rows_affected();
        tracing::debug!("removed {} responsibilities of job {}", removed, job_id);
        self.insert_responsibilities(job_id, responsibilities).await
    }
}
