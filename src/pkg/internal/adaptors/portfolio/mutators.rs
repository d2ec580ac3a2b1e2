use sqlx::{PgConnection, Postgres, QueryBuilder, types::Json};

use crate::pkg::internal::adaptors::portfolio::spec::{
    NewPortfolio, PORTFOLIO_COLUMNS, PortfolioChanges, PortfolioEntry,
};
use crate::prelude::Result;

pub struct PortfolioMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PortfolioMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PortfolioMutator { pool }
    }

    pub async fn create(&mut self, item: NewPortfolio) -> Result<PortfolioEntry> {
        let row = sqlx::query_as::<_, PortfolioEntry>(&format!(
            r#"
            INSERT INTO portfolio (title, client, category, description, image, technologies, project_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PORTFOLIO_COLUMNS}
            "#
        ))
        .bind(&item.title)
        .bind(&item.client)
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.image)
        .bind(Json(&item.technologies))
        .bind(&item.project_url)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: i32,
        changes: PortfolioChanges,
    ) -> Result<Option<PortfolioEntry>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE portfolio SET updated_at = CURRENT_TIMESTAMP");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(client) = changes.client {
            qb.push(", client = ").push_bind(client);
        }
        if let Some(category) = changes.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(description) = changes.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(image) = changes.image {
            qb.push(", image = ").push_bind(image);
        }
        if let Some(technologies) = changes.technologies {
            qb.push(", technologies = ").push_bind(Json(technologies));
        }
        if let Some(project_url) = changes.project_url {
            qb.push(", project_url = ").push_bind(project_url);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {PORTFOLIO_COLUMNS}"));

        let row = qb
            .build_query_as::<PortfolioEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM portfolio WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
