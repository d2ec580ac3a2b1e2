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
            portfolio::{self, CreatePortfolioInput, PatchPortfolioInput, PortfolioQuery, WirePortfolio},
            query::Paginated,
        },
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreatePortfolioInput>, Error>,
) -> Result<(StatusCode, Json<WirePortfolio>)> {
    Ok((StatusCode::CREATED, Json(portfolio::create(&state.db_pool, input).await?)))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PortfolioQuery>, Error>,
) -> Result<Json<Paginated<WirePortfolio>>> {
    Ok(Json(portfolio::list(&state.db_pool, &query).await?))
}

pub async fn get(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<WirePortfolio>> {
    Ok(Json(portfolio::get_by_id(&state.db_pool, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
    WithRejection(Json(patch), _): WithRejection<Json<PatchPortfolioInput>, Error>,
) -> Result<Json<WirePortfolio>> {
    Ok(Json(portfolio::update(&state.db_pool, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, Error>,
) -> Result<Json<Value>> {
    portfolio::delete(&state.db_pool, id).await?;
    Ok(Json(json!({ "message": "Portfolio item deleted successfully" })))
}
