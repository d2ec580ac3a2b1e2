use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// SQLSTATE codes raised by values the client sent.
const CHECK_VIOLATION: &str = "23514";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Message for database errors caused by bad input, `None` for everything else.
fn client_message(code: Option<&str>, constraint: Option<&str>) -> Option<String> {
    match code? {
        // CHECK constraints guard the enum-like columns
        CHECK_VIOLATION => Some(format!(
            "Invalid value for {}",
            constraint.unwrap_or("a constrained field")
        )),
        STRING_DATA_RIGHT_TRUNCATION => Some("Value too long for a text field".to_string()),
        _ => None,
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let code = db_err.code();
            if let Some(msg) = client_message(code.as_deref(), db_err.constraint()) {
                return Error::Validation(msg);
            }
        }
        Error::Database(err)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("request failed: {}", &self);
            "Internal server error".to_string()
        } else {
            tracing::warn!("request rejected ({}): {}", status.as_u16(), &self);
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let err = Error::validation("Status is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Status is required");
        assert_eq!(Error::not_found("Job not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Unauthorized("Invalid email or password".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn bad_input_rejected_by_postgres_is_a_client_error() {
        assert_eq!(
            client_message(Some("23514"), Some("jobs_job_type_check")).as_deref(),
            Some("Invalid value for jobs_job_type_check")
        );
        assert_eq!(
            client_message(Some("22001"), None).as_deref(),
            Some("Value too long for a text field")
        );
        assert_eq!(client_message(Some("23503"), Some("jobs_created_by_fkey")), None);
        assert_eq!(client_message(None, None), None);
    }

    #[test]
    fn infrastructure_errors_are_500() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
