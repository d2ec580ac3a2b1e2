use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::users::{mutators::UserMutator, selectors::UserSelector, spec::UserEntry},
            transform::timestamp,
        },
        server::state::AppState,
    },
    prelude::{Error, Result},
};

pub const MISSING_CREDENTIALS: &str = "Missing required fields: email, password";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<&UserEntry> for WireUser {
    fn from(user: &UserEntry) -> Self {
        WireUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role.to_lowercase(),
            created_at: timestamp(&user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: WireUser,
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> Error {
    Error::Unauthorized(INVALID_CREDENTIALS.to_string())
}

pub fn issue_token(user: &UserEntry, secret: &str, ttl_hours: i64) -> Result<String> {
    let iat = Utc::now();
    let claims = Claims {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
        iat: iat.timestamp(),
        exp: (iat + Duration::hours(ttl_hours)).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Unknown, inactive and wrong-password logins all fail with the same 401.
pub async fn login(state: &AppState, input: LoginInput) -> Result<LoginResponse> {
    input
        .validate()
        .map_err(|_| Error::validation(MISSING_CREDENTIALS))?;
    let email = normalize_email(&input.email.unwrap_or_default());
    let password = input.password.unwrap_or_default();

    let mut conn = state.db_pool.acquire().await?;
    let user = match UserSelector::new(&mut conn).by_email(&email).await? {
        Some(user) if user.is_active => user,
        _ => {
            tracing::warn!("login refused for {}", &email);
            return Err(invalid_credentials());
        }
    };

    let hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    match verified {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("wrong password for {}", &email);
            return Err(invalid_credentials());
        }
        Err(err) => {
            tracing::error!("stored hash for user {} is unusable: {}", user.id, err);
            return Err(invalid_credentials());
        }
    }

    let token = issue_token(&user, &state.jwt_secret, state.token_ttl_hours)?;
    tracing::info!("user {} logged in", user.id);
    Ok(LoginResponse {
        message: "Login successful",
        token,
        user: WireUser::from(&user),
    })
}

/// Creates the user with a bcrypt-hashed password unless the email exists.
/// Returns whether a row was written.
pub async fn seed_user(pool: &PgPool, email: &str, password: &str, role: &str) -> Result<bool> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::validation(MISSING_CREDENTIALS));
    }
    let email = normalize_email(email);
    let password = password.to_string();
    let hash =
        tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST)).await??;

    let mut conn = pool.acquire().await?;
    let created = UserMutator::new(&mut conn)
        .create_if_missing(&email, &hash, &role.to_uppercase())
        .await?;
    match &created {
        Some(user) => tracing::info!("created {} user {} ({})", &user.role, user.id, &user.email),
        None => tracing::info!("user {} already exists, leaving it untouched", &email),
    }
    Ok(created.is_some())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use jsonwebtoken::{DecodingKey, Validation, decode};
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::server::state::test_pool;

    fn user() -> UserEntry {
        UserEntry {
            id: 1,
            email: "admin@example.com".into(),
            password: String::new(),
            role: "SUPER_ADMIN".into(),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 10, 8, 10, 44, 17).unwrap(),
        }
    }

    #[test]
    fn token_carries_user_claims() {
        let token = issue_token(&user(), "secret", 24).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.user_id, 1);
        assert_eq!(data.claims.email, "admin@example.com");
        assert_eq!(data.claims.exp - data.claims.iat, 24 * 3600);

        let wrong = decode::<Claims>(&token, &DecodingKey::from_secret(b"other"), &Validation::default());
        assert!(wrong.is_err());
    }

    #[test]
    fn emails_are_normalized_the_same_way_everywhere() {
        assert_eq!(normalize_email(" Admin@Example.com "), "admin@example.com");
        assert_eq!(normalize_email("admin@example.com"), "admin@example.com");
        assert_eq!(normalize_email("\tADMIN@EXAMPLE.COM\n"), "admin@example.com");
    }

    #[test]
    fn wire_user_lowercases_role() {
        let wire = WireUser::from(&user());
        assert_eq!(wire.role, "super_admin");
        assert_eq!(wire.created_at, "2025-10-08T10:44:17.000Z");
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("password").is_none());
    }

    #[traced_test]
    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn test_login() -> Result<()> {
        let pool = test_pool().await?;
        seed_user(&pool, "Login.Test@example.com", "hunter22", "admin").await?;
        assert!(!seed_user(&pool, "login.test@example.com", "other", "admin").await?);

        let state = AppState::with_pool(pool, "secret");
        let ok = login(
            &state,
            LoginInput {
                email: Some("LOGIN.TEST@example.com".into()),
                password: Some("hunter22".into()),
            },
        )
        .await?;
        assert_eq!(ok.user.email, "login.test@example.com");
        assert_eq!(ok.user.role, "admin");

        let padded = login(
            &state,
            LoginInput {
                email: Some(" Login.Test@example.com ".into()),
                password: Some("hunter22".into()),
            },
        )
        .await?;
        assert_eq!(padded.user.id, ok.user.id);

        // scenario D
        let wrong = login(
            &state,
            LoginInput {
                email: Some("login.test@example.com".into()),
                password: Some("nope".into()),
            },
        )
        .await
        .unwrap_err();
        let unknown = login(
            &state,
            LoginInput {
                email: Some("nobody@example.com".into()),
                password: Some("hunter22".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS);
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.status(), axum::http::StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
