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
            news::{self, CreateNewsInput, NewsQuery, PatchNewsInput, WireNews},
            query::Paginated,
        },
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateNewsInput>, Error>,
) -> Result<(StatusCode, Json<WireNews>)> {
    Ok((StatusCode::CREATED, Json(news::create(&state.db_pool, input).await?)))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<NewsQuery>, Error>,
) -> Result<Json<Paginated<WireNews>>> {
    Ok(Json(news::list(&state.db_pool, &query).await?))
}

pub async fn get(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<WireNews>> {
    Ok(Json(news::get_by_id(&state.db_pool, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
    WithRejection(Json(patch), _): WithRejection<Json<PatchNewsInput>, Error>,
) -> Result<Json<WireNews>> {
    Ok(Json(news::update(&state.db_pool, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<Value>> {
    news::delete(&state.db_pool, id).await?;
    Ok(Json(json!({ "message": "News deleted successfully" })))
}
