use sqlx::PgConnection;

use crate::pkg::internal::adaptors::users::spec::UserEntry;
use crate::prelude::Result;

pub struct UserMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserMutator { pool }
    }

    /// Inserts the user unless the email is taken; returns the new row only.
    pub async fn create_if_missing(
        &mut self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<Option<UserEntry>> {
        let user = sqlx::query_as::<_, UserEntry>(
            r#"
            INSERT INTO users (email, password, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password, role, is_active, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(user)
    }
}
