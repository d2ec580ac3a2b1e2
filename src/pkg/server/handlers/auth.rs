use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;

use crate::{
    pkg::{
        internal::auth::{self, LoginInput, LoginResponse},
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, Error>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(auth::login(&state, input).await?))
}
