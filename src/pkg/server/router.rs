use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{applications, auth, jobs, news, portfolio, probes};
use super::middlewares::logging::log_requests;
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(probes::root))
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .route("/auth/login", post(auth::login))
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/cards", get(jobs::cards))
        .route("/jobs/applications", get(applications::list))
        .route(
            "/jobs/applications/{id}/status",
            put(applications::update_status),
        )
        .route(
            "/jobs/{id}",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route("/jobs/{id}/apply", post(applications::apply))
        .route("/news", get(news::list).post(news::create))
        .route(
            "/news/{id}",
            get(news::get).put(news::update).delete(news::delete),
        )
        .route("/portfolio", get(portfolio::list).post(portfolio::create))
        .route(
            "/portfolio/{id}",
            get(portfolio::get)
                .put(portfolio::update)
                .delete(portfolio::delete),
        )
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
