use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{
    pkg::{
        internal::{
            applications::{self, ApplicationsQuery, ApplyInput, StatusInput, WireApplication},
            query::Paginated,
        },
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub async fn apply(
    State(state): State<AppState>,
    WithRejection(Path(job_id), _): WithRejection<Path<i32>, Error>,
    WithRejection(Json(input), _): WithRejection<Json<ApplyInput>, Error>,
) -> Result<(StatusCode, Json<WireApplication>)> {
    let application = applications::apply(&state.db_pool, job_id, input).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ApplicationsQuery>, Error>,
) -> Result<Json<Paginated<WireApplication>>> {
    Ok(Json(applications::list(&state.db_pool, &query).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
    WithRejection(Json(input), _): WithRejection<Json<StatusInput>, Error>,
) -> Result<Json<WireApplication>> {
    Ok(Json(applications::update_status(&state.db_pool, id, input).await?))
}
