use sqlx::PgConnection;

use crate::pkg::internal::adaptors::portfolio::spec::{PORTFOLIO_COLUMNS, PortfolioEntry};
use crate::pkg::internal::query::{ListQuery, Listing};
use crate::prelude::Result;

pub struct PortfolioSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PortfolioSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PortfolioSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<PortfolioEntry>> {
        let row = sqlx::query_as::<_, PortfolioEntry>(&format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolio WHERE portfolio.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list<L: Listing>(
        &mut self,
        query: &ListQuery<L>,
    ) -> Result<(i64, Vec<PortfolioEntry>)> {
        query.fetch::<PortfolioEntry>(&mut *self.pool).await
    }
}
