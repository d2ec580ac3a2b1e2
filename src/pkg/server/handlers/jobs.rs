use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    pkg::{
        internal::{
            jobs::{self, CreateJobInput, JobsQuery, PatchJobInput},
            query::Paginated,
            transform::{JobCard, WireJob},
        },
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateJobInput>, Error>,
) -> Result<(StatusCode, Json<WireJob>)> {
    let job = jobs::create(&state.db_pool, input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<JobsQuery>, Error>,
) -> Result<Json<Paginated<WireJob>>> {
    Ok(Json(jobs::list(&state.db_pool, &query).await?))
}

pub async fn cards(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<JobsQuery>, Error>,
) -> Result<Json<Paginated<JobCard>>> {
    Ok(Json(jobs::cards(&state.db_pool, &query).await?))
}

pub async fn get(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<WireJob>> {
    Ok(Json(jobs::get_by_id(&state.db_pool, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
    WithRejection(Json(patch), _): WithRejection<Json<PatchJobInput>, Error>,
) -> Result<Json<WireJob>> {
    Ok(Json(jobs::update(&state.db_pool, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<Value>> {
    jobs::delete(&state.db_pool, id).await?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}
