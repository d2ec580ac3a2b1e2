use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::{JOB_COLUMNS_WITH_COUNT, JobChanges, NewJob, NewResponsibility},
            },
            fields::{empty_as_null, non_empty, presence},
            query::{Conditions, ListQuery, Listing, PageParams, Paginated, present},
            transform::{
                JobCard, WireJob, job_type_to_storage, transform_job_for_response,
                transform_job_to_card,
            },
        },
        server::state::GetTxn,
    },
    prelude::{Error, Result},
};

pub const MISSING_JOB_FIELDS: &str =
    "Missing required fields: title, description, jobType, workExperience, city, state, country";
pub const DEFAULT_CREATED_BY: i32 = 1;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    pub salary: Option<String>,
    #[validate(required, length(min = 1))]
    pub job_type: Option<String>,
    #[validate(required, length(min = 1))]
    pub work_experience: Option<String>,
    #[validate(required, length(min = 1))]
    pub city: Option<String>,
    #[validate(required, length(min = 1))]
    pub state: Option<String>,
    #[validate(required, length(min = 1))]
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub responsibilities: Option<Vec<NewResponsibility>>,
    pub requirements: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub created_by: Option<i32>,
}

impl CreateJobInput {
    /// Validates required fields and splits into the job row and its
    /// responsibilities.
    pub fn into_new_job(self) -> Result<(NewJob, Vec<NewResponsibility>)> {
        self.validate()
            .map_err(|_| Error::validation(MISSING_JOB_FIELDS))?;
        let job = NewJob {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            salary: empty_as_null(self.salary),
            job_type: job_type_to_storage(&self.job_type.unwrap_or_default()),
            work_experience: self.work_experience.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            zip_code: empty_as_null(self.zip_code),
            requirements: self.requirements.unwrap_or_default(),
            qualifications: self.qualifications.unwrap_or_default(),
            created_by: self.created_by.unwrap_or(DEFAULT_CREATED_BY),
        };
        Ok((job, self.responsibilities.unwrap_or_default()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchJobInput {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "presence")]
    pub salary: Option<Option<String>>,
    pub job_type: Option<String>,
    pub work_experience: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "presence")]
    pub zip_code: Option<Option<String>>,
    pub responsibilities: Option<Vec<NewResponsibility>>,
    pub requirements: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub created_by: Option<i32>,
}

impl PatchJobInput {
    /// Column changes plus the replacement responsibility set, if one was sent.
    pub fn into_changes(self) -> (JobChanges, Option<Vec<NewResponsibility>>) {
        let changes = JobChanges {
            title: non_empty(self.title),
            description: non_empty(self.description),
            salary: self.salary,
            job_type: non_empty(self.job_type).map(|t| job_type_to_storage(&t)),
            work_experience: non_empty(self.work_experience),
            city: non_empty(self.city),
            state: non_empty(self.state),
            country: non_empty(self.country),
            zip_code: self.zip_code,
            requirements: self.requirements,
            qualifications: self.qualifications,
            created_by: self.created_by,
        };
        (changes, self.responsibilities)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    #[serde(flatten)]
    pub page: PageParams,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub work_experience: Option<String>,
}

const LIST_SEARCH: &[&str] = &["jobs.title", "jobs.description", "jobs.city"];
const CARD_SEARCH: &[&str] = &["jobs.title", "jobs.description", "jobs.city", "jobs.state"];

/// Active jobs matching the optional filters.
#[derive(Debug, Clone)]
pub struct JobFilter {
    pub search: Option<String>,
    pub job_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub work_experience: Option<String>,
    pub search_columns: &'static [&'static str],
}

impl JobFilter {
    pub fn list(query: &JobsQuery) -> Self {
        Self::with_search(query, LIST_SEARCH)
    }

    pub fn cards(query: &JobsQuery) -> Self {
        Self::with_search(query, CARD_SEARCH)
    }

    fn with_search(query: &JobsQuery, search_columns: &'static [&'static str]) -> Self {
        let owned = |v: Option<&str>| v.map(str::to_string);
        JobFilter {
            search: owned(present(&query.search)),
            job_type: present(&query.kind)
                .or(present(&query.job_type))
                .map(job_type_to_storage),
            city: owned(present(&query.city).or(present(&query.location))),
            state: owned(present(&query.state)),
            country: owned(present(&query.country)),
            work_experience: owned(present(&query.work_experience)),
            search_columns,
        }
    }
}

impl Listing for JobFilter {
    const FROM: &'static str = "jobs";
    const SELECT: &'static str = JOB_COLUMNS_WITH_COUNT;
    const KEY: &'static str = "jobs.id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("createdAt", "jobs.created_at"),
        ("updatedAt", "jobs.updated_at"),
        ("dateOpened", "jobs.date_opened"),
        ("id", "jobs.id"),
        ("title", "jobs.title"),
        ("jobType", "jobs.job_type"),
        ("workExperience", "jobs.work_experience"),
        ("city", "jobs.city"),
        ("state", "jobs.state"),
        ("country", "jobs.country"),
    ];

    fn push_conditions(&self, conditions: &mut Conditions<'_>) {
        conditions.is_true("jobs.is_active");
        if let Some(search) = &self.search {
            conditions.any_contains(self.search_columns, search);
        }
        if let Some(job_type) = &self.job_type {
            conditions.eq_text("jobs.job_type", job_type);
        }
        if let Some(city) = &self.city {
            conditions.contains("jobs.city", city);
        }
        if let Some(state) = &self.state {
            conditions.contains("jobs.state", state);
        }
        if let Some(country) = &self.country {
            conditions.contains("jobs.country", country);
        }
        if let Some(work_experience) = &self.work_experience {
            conditions.contains("jobs.work_experience", work_experience);
        }
    }
}

pub async fn create(pool: &PgPool, input: CreateJobInput) -> Result<WireJob> {
    let (new_job, responsibilities) = input.into_new_job()?;
    let mut tx = pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).create(new_job).await?;
    let responsibilities = JobMutator::new(&mut tx)
        .insert_responsibilities(job.id, responsibilities)
        .await?;
    tx.commit().await?;
    tracing::info!(
        "created job {} ({}) with {} responsibilities",
        job.id,
        &job.title,
        responsibilities.len()
    );
    Ok(transform_job_for_response(&job, responsibilities))
}

pub async fn update(pool: &PgPool, id: i32, patch: PatchJobInput) -> Result<WireJob> {
    let (changes, responsibilities) = patch.into_changes();
    let mut tx = pool.begin_txn().await?;
    if JobSelector::new(&mut tx).lock_for_update(id).await?.is_none() {
        return Err(Error::not_found("Job not found"));
    }
    JobMutator::new(&mut tx).update(id, changes).await?;
    if let Some(responsibilities) = responsibilities {
        JobMutator::new(&mut tx)
            .replace_responsibilities(id, responsibilities)
            .await?;
    }
    let job = JobSelector::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Job not found"))?;
    let responsibilities = JobSelector::new(&mut tx).responsibilities(id).await?;
    tx.commit().await?;
    tracing::info!("updated job {}", id);
    Ok(transform_job_for_response(&job, responsibilities))
}

/// Soft delete: the row and its applications stay.
pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !JobMutator::new(&mut conn).deactivate(id).await? {
        return Err(Error::not_found("Job not found"));
    }
    tracing::info!("deactivated job {}", id);
    Ok(())
}

pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<WireJob> {
    let mut conn = pool.acquire().await?;
    let job = JobSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Job not found"))?;
    let responsibilities = JobSelector::new(&mut conn).responsibilities(id).await?;
    Ok(transform_job_for_response(&job, responsibilities))
}

pub async fn list(pool: &PgPool, query: &JobsQuery) -> Result<Paginated<WireJob>> {
    let query = ListQuery::new(JobFilter::list(query), &query.page)?;
    let mut conn = pool.acquire().await?;
    let (total, jobs) = JobSelector::new(&mut conn).list(&query).await?;

    let ids: Vec<i32> = jobs.iter().map(|job| job.id).collect();
    let mut by_job: HashMap<i32, Vec<_>> = HashMap::new();
    for resp in JobSelector::new(&mut conn).responsibilities_for(&ids).await? {
        by_job.entry(resp.job_id).or_default().push(resp);
    }
    let rows = jobs
        .iter()
        .map(|job| transform_job_for_response(job, by_job.remove(&job.id).unwrap_or_default()))
        .collect();
    Ok(Paginated::new(rows, total, &query.page))
}

pub async fn cards(pool: &PgPool, query: &JobsQuery) -> Result<Paginated<JobCard>> {
    let query = ListQuery::new(JobFilter::cards(query), &query.page)?;
    let mut conn = pool.acquire().await?;
    let (total, jobs) = JobSelector::new(&mut conn).list(&query).await?;
    let rows = jobs.iter().map(transform_job_to_card).collect();
    Ok(Paginated::new(rows, total, &query.page))
}
