use sqlx::PgConnection;

use crate::pkg::internal::adaptors::news::spec::{NEWS_COLUMNS, NewsEntry};
use crate::pkg::internal::query::{ListQuery, Listing};
use crate::prelude::Result;

pub struct NewsSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> NewsSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        NewsSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<NewsEntry>> {
        let row = sqlx::query_as::<_, NewsEntry>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE news.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list<L: Listing>(&mut self, query: &ListQuery<L>) -> Result<(i64, Vec<NewsEntry>)> {
        query.fetch::<NewsEntry>(&mut *self.pool).await
    }
}
