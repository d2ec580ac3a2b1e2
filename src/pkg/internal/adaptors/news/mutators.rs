use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::pkg::internal::adaptors::news::spec::{NEWS_COLUMNS, NewNews, NewsChanges, NewsEntry};
use crate::prelude::Result;

pub struct NewsMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> NewsMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        NewsMutator { pool }
    }

    pub async fn create(&mut self, news: NewNews) -> Result<NewsEntry> {
        let row = sqlx::query_as::<_, NewsEntry>(&format!(
            r#"
            INSERT INTO news (title, category, image, content, published_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NEWS_COLUMNS}
            "#
        ))
        .bind(&news.title)
        .bind(&news.category)
        .bind(&news.image)
        .bind(&news.content)
        .bind(news.published_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i32, changes: NewsChanges) -> Result<Option<NewsEntry>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE news SET updated_at = CURRENT_TIMESTAMP");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(category) = changes.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(image) = changes.image {
            qb.push(", image = ").push_bind(image);
        }
        if let Some(content) = changes.content {
            qb.push(", content = ").push_bind(content);
        }
        if let Some(published_at) = changes.published_at {
            qb.push(", published_at = ").push_bind(published_at);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {NEWS_COLUMNS}"));

        let row = qb
            .build_query_as::<NewsEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    /// Hard delete. Returns false when nothing matched.
    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
