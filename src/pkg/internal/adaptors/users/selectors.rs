use sqlx::PgConnection;

use crate::pkg::internal::adaptors::users::spec::UserEntry;
use crate::prelude::Result;

pub struct UserSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserSelector { pool }
    }

    /// `email` must already be lowercased.
    pub async fn by_email(&mut self, email: &str) -> Result<Option<UserEntry>> {
        let user = sqlx::query_as::<_, UserEntry>(
            "SELECT id, email, password, role, is_active, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(user)
    }
}
