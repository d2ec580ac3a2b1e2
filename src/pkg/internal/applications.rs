use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::{
                applications::{
                    mutators::ApplicationMutator,
                    selectors::ApplicationSelector,
                    spec::{APPLICATION_COLUMNS_WITH_JOB, ApplicationEntry, NewApplication},
                },
                jobs::selectors::JobSelector,
            },
            fields::empty_as_null,
            query::{Conditions, ListQuery, Listing, PageParams, Paginated, present},
            transform::{ApplicationStatus, job_type_to_wire, status_to_storage, status_to_wire, timestamp},
        },
        server::state::GetTxn,
    },
    prelude::{Error, Result},
};

pub const MISSING_APPLICATION_FIELDS: &str = "Missing required fields: applicantName, applicantEmail";
pub const JOB_UNAVAILABLE: &str = "Job not found or no longer active";
pub const DUPLICATE_APPLICATION: &str = "You have already applied to this job";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    #[validate(required, length(min = 1))]
    pub applicant_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub applicant_email: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplyInput {
    pub fn into_new_application(self, job_id: i32) -> Result<NewApplication> {
        self.validate()
            .map_err(|_| Error::validation(MISSING_APPLICATION_FIELDS))?;
        Ok(NewApplication {
            job_id,
            applicant_name: self.applicant_name.unwrap_or_default(),
            applicant_email: self.applicant_email.unwrap_or_default(),
            resume_url: empty_as_null(self.resume_url),
            cover_letter: empty_as_null(self.cover_letter),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

impl StatusInput {
    pub fn parse(&self) -> Result<ApplicationStatus> {
        match self.status.as_deref() {
            None | Some("") => Err(Error::validation("Status is required")),
            Some(raw) => raw.parse(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsQuery {
    #[serde(flatten)]
    pub page: PageParams,
    pub job_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub job_id: Option<i32>,
    pub status: Option<String>,
}

impl ApplicationFilter {
    pub fn parse(query: &ApplicationsQuery) -> Result<Self> {
        let job_id = present(&query.job_id)
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| Error::validation("jobId must be an integer"))
            })
            .transpose()?;
        Ok(ApplicationFilter {
            job_id,
            status: present(&query.status).map(status_to_storage),
        })
    }
}

impl Listing for ApplicationFilter {
    const FROM: &'static str = "job_applications JOIN jobs ON jobs.id = job_applications.job_id";
    const SELECT: &'static str = APPLICATION_COLUMNS_WITH_JOB;
    const KEY: &'static str = "job_applications.id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("createdAt", "job_applications.created_at"),
        ("updatedAt", "job_applications.updated_at"),
        ("id", "job_applications.id"),
        ("jobId", "job_applications.job_id"),
        ("status", "job_applications.status"),
        ("applicantName", "job_applications.applicant_name"),
        ("applicantEmail", "job_applications.applicant_email"),
    ];

    fn push_conditions(&self, conditions: &mut Conditions<'_>) {
        if let Some(job_id) = self.job_id {
            conditions.eq_int("job_applications.job_id", job_id);
        }
        if let Some(status) = &self.status {
            conditions.eq_text("job_applications.status", status);
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireApplication {
    pub id: i32,
    pub job_id: i32,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobSummary>,
}

impl From<ApplicationEntry> for WireApplication {
    fn from(entry: ApplicationEntry) -> Self {
        let job = entry.job_title.map(|title| JobSummary {
            id: entry.job_id,
            title,
            job_type: job_type_to_wire(entry.job_type.as_deref().unwrap_or_default()),
        });
        WireApplication {
            id: entry.id,
            job_id: entry.job_id,
            applicant_name: entry.applicant_name,
            applicant_email: entry.applicant_email,
            resume_url: entry.resume_url,
            cover_letter: entry.cover_letter,
            status: status_to_wire(&entry.status),
            created_at: timestamp(&entry.created_at),
            updated_at: timestamp(&entry.updated_at),
            job,
        }
    }
}

fn is_unique_violation(err: &Error) -> bool {
    match err {
        Error::Database(e) => e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation()),
        _ => false,
    }
}

/// Records an application against an active job, at most once per email.
pub async fn apply(pool: &PgPool, job_id: i32, input: ApplyInput) -> Result<WireApplication> {
    let application = input.into_new_application(job_id)?;
    let mut tx = pool.begin_txn().await?;
    // the share lock keeps the job from being deactivated until commit
    if JobSelector::new(&mut tx).activity_for_share(job_id).await? != Some(true) {
        return Err(Error::not_found(JOB_UNAVAILABLE));
    }
    if ApplicationSelector::new(&mut tx)
        .exists(job_id, &application.applicant_email)
        .await?
    {
        return Err(Error::validation(DUPLICATE_APPLICATION));
    }
    let entry = match ApplicationMutator::new(&mut tx).create(application).await {
        Err(err) if is_unique_violation(&err) => {
            return Err(Error::validation(DUPLICATE_APPLICATION));
        }
        other => other?,
    };
    tx.commit().await?;
    tracing::info!("application {} received for job {}", entry.id, job_id);
    Ok(entry.into())
}

pub async fn update_status(pool: &PgPool, id: i32, input: StatusInput) -> Result<WireApplication> {
    let status = input.parse()?;
    let mut conn = pool.acquire().await?;
    let entry = ApplicationMutator::new(&mut conn)
        .set_status(id, &status.as_storage())
        .await?
        .ok_or_else(|| Error::not_found("Application not found"))?;
    tracing::info!("application {} moved to {}", id, status);
    Ok(entry.into())
}

pub async fn list(pool: &PgPool, query: &ApplicationsQuery) -> Result<Paginated<WireApplication>> {
    let query = ListQuery::new(ApplicationFilter::parse(query)?, &query.page)?;
    let mut conn = pool.acquire().await?;
    let (total, entries) = ApplicationSelector::new(&mut conn).list(&query).await?;
    let rows = entries.into_iter().map(WireApplication::from).collect();
    Ok(Paginated::new(rows, total, &query.page))
}
