use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

const SLOW_REQUEST: Duration = Duration::from_millis(500);

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    if elapsed > SLOW_REQUEST {
        tracing::warn!("slow request: {} {} took {:?}", method, path, elapsed);
    }
    tracing::info!(
        "{} {} -> {} in {}ms",
        method,
        path,
        response.status().as_u16(),
        elapsed.as_millis()
    );
    response
}
