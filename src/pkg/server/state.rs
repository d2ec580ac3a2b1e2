use std::{sync::Arc, time::Duration};

use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::{conf::Settings, prelude::Result};

pub fn db_pool(conf: &Settings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(conf.database_pool_max_connections)
        .acquire_timeout(Duration::from_secs(conf.database_acquire_timeout_secs))
        .connect_lazy(&conf.database_url)?;
    Ok(pool)
}

#[async_trait::async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait::async_trait]
impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub jwt_secret: Arc<str>,
    pub token_ttl_hours: i64,
}

impl AppState {
    pub fn new(conf: &Settings) -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool(conf)?),
            jwt_secret: Arc::from(conf.jwt_secret.as_str()),
            token_ttl_hours: conf.token_ttl_hours,
        })
    }

    /// Wraps an existing pool; used by tests that never reach the database.
    #[cfg(test)]
    pub fn with_pool(pool: PgPool, jwt_secret: &str) -> AppState {
        AppState {
            db_pool: Arc::new(pool),
            jwt_secret: Arc::from(jwt_secret),
            token_ttl_hours: 24,
        }
    }
}

/// Migrated pool at `DATABASE_URL` with the default job owner (user 1) in place.
#[cfg(test)]
pub async fn test_pool() -> Result<PgPool> {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    sqlx::query(
        "INSERT INTO users (id, email, password) VALUES (1, 'owner@example.com', 'x')
         ON CONFLICT DO NOTHING",
    )
    .execute(&pool)
    .await?;
    // the explicit id bypasses the sequence; move it past every existing row
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('users', 'id'), (SELECT MAX(id) FROM users))",
    )
    .execute(&pool)
    .await?;
    Ok(pool)
}
