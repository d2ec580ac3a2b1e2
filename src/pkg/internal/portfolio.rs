use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    pkg::internal::{
        adaptors::portfolio::{
            mutators::PortfolioMutator,
            selectors::PortfolioSelector,
            spec::{NewPortfolio, PORTFOLIO_COLUMNS, PortfolioChanges, PortfolioEntry},
        },
        fields::{empty_as_null, non_empty, presence},
        query::{Conditions, ListQuery, Listing, PageParams, Paginated, present},
        transform::timestamp,
    },
    prelude::{Error, Result},
};

pub const MISSING_PORTFOLIO_FIELDS: &str =
    "Missing required fields: title, client, category, description, image";
const NOT_FOUND: &str = "Portfolio item not found";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolioInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub client: Option<String>,
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub image: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub project_url: Option<String>,
}

impl CreatePortfolioInput {
    pub fn into_new_portfolio(self) -> Result<NewPortfolio> {
        self.validate()
            .map_err(|_| Error::validation(MISSING_PORTFOLIO_FIELDS))?;
        Ok(NewPortfolio {
            title: self.title.unwrap_or_default(),
            client: self.client.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            technologies: self.technologies.unwrap_or_default(),
            project_url: empty_as_null(self.project_url),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPortfolioInput {
    pub title: Option<String>,
    pub client: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "presence")]
    pub technologies: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "presence")]
    pub project_url: Option<Option<String>>,
}

impl PatchPortfolioInput {
    /// An explicit `technologies: null` empties the list.
    pub fn into_changes(self) -> PortfolioChanges {
        PortfolioChanges {
            title: non_empty(self.title),
            client: non_empty(self.client),
            category: non_empty(self.category),
            description: non_empty(self.description),
            image: non_empty(self.image),
            technologies: self.technologies.map(Option::unwrap_or_default),
            project_url: self.project_url,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PortfolioQuery {
    #[serde(flatten)]
    pub page: PageParams,
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl From<&PortfolioQuery> for PortfolioFilter {
    fn from(query: &PortfolioQuery) -> Self {
        PortfolioFilter {
            search: present(&query.search).map(str::to_string),
            category: present(&query.category).map(str::to_string),
        }
    }
}

impl Listing for PortfolioFilter {
    const FROM: &'static str = "portfolio";
    const SELECT: &'static str = PORTFOLIO_COLUMNS;
    const KEY: &'static str = "portfolio.id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("createdAt", "portfolio.created_at"),
        ("updatedAt", "portfolio.updated_at"),
        ("id", "portfolio.id"),
        ("title", "portfolio.title"),
        ("client", "portfolio.client"),
        ("category", "portfolio.category"),
    ];

    fn push_conditions(&self, conditions: &mut Conditions<'_>) {
        if let Some(search) = &self.search {
            conditions.any_contains(
                &[
                    "portfolio.title",
                    "portfolio.description",
                    "portfolio.client",
                    "portfolio.category",
                ],
                search,
            );
        }
        if let Some(category) = &self.category {
            conditions.contains("portfolio.category", category);
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WirePortfolio {
    pub id: i32,
    pub title: String,
    pub client: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub project_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PortfolioEntry> for WirePortfolio {
    fn from(entry: PortfolioEntry) -> Self {
        WirePortfolio {
            id: entry.id,
            title: entry.title,
            client: entry.client,
            category: entry.category,
            description: entry.description,
            image: entry.image,
            technologies: entry.technologies.0,
            project_url: entry.project_url,
            created_at: timestamp(&entry.created_at),
            updated_at: timestamp(&entry.updated_at),
        }
    }
}

pub async fn create(pool: &PgPool, input: CreatePortfolioInput) -> Result<WirePortfolio> {
    let item = input.into_new_portfolio()?;
    let mut conn = pool.acquire().await?;
    let entry = PortfolioMutator::new(&mut conn).create(item).await?;
    tracing::info!("created portfolio item {} for {}", entry.id, &entry.client);
    Ok(entry.into())
}

pub async fn update(pool: &PgPool, id: i32, patch: PatchPortfolioInput) -> Result<WirePortfolio> {
    let mut conn = pool.acquire().await?;
    let entry = PortfolioMutator::new(&mut conn)
        .update(id, patch.into_changes())
        .await?
        .ok_or_else(|| Error::not_found(NOT_FOUND))?;
    tracing::info!("updated portfolio item {}", id);
    Ok(entry.into())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !PortfolioMutator::new(&mut conn).delete(id).await? {
        return Err(Error::not_found(NOT_FOUND));
    }
    tracing::info!("deleted portfolio item {}", id);
    Ok(())
}

pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<WirePortfolio> {
    let mut conn = pool.acquire().await?;
    PortfolioSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .map(WirePortfolio::from)
        .ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn list(pool: &PgPool, query: &PortfolioQuery) -> Result<Paginated<WirePortfolio>> {
    let query = ListQuery::new(PortfolioFilter::from(query), &query.page)?;
    let mut conn = pool.acquire().await?;
    let (total, entries) = PortfolioSelector::new(&mut conn).list(&query).await?;
    let rows = entries.into_iter().map(WirePortfolio::from).collect();
    Ok(Paginated::new(rows, total, &query.page))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::server::state::test_pool;

    fn full() -> serde_json::Value {
        json!({
            "title": "Storefront",
            "client": "Acme",
            "category": "web",
            "description": "Rebuilt checkout",
            "image": "acme.png"
        })
    }

    #[test]
    fn create_requires_all_five_fields() {
        for field in ["title", "client", "category", "description", "image"] {
            let mut body = full();
            body.as_object_mut().unwrap().remove(field);
            let input: CreatePortfolioInput = serde_json::from_value(body).unwrap();
            assert_eq!(
                input.into_new_portfolio().unwrap_err().to_string(),
                MISSING_PORTFOLIO_FIELDS
            );
        }
        let input: CreatePortfolioInput = serde_json::from_value(full()).unwrap();
        let item = input.into_new_portfolio().unwrap();
        assert!(item.technologies.is_empty());
        assert_eq!(item.project_url, None);
    }

    #[test]
    fn patch_semantics() {
        let patch: PatchPortfolioInput = serde_json::from_value(json!({
            "client": "",
            "technologies": null,
            "projectUrl": "https://acme.test"
        }))
        .unwrap();
        assert_eq!(
            patch.into_changes(),
            PortfolioChanges {
                technologies: Some(vec![]),
                project_url: Some(Some("https://acme.test".into())),
                ..Default::default()
            }
        );
        assert_eq!(PatchPortfolioInput::default().into_changes(), PortfolioChanges::default());
    }

    #[test]
    fn search_spans_four_columns() {
        let query = PortfolioQuery {
            search: Some("acme".into()),
            ..Default::default()
        };
        let list = ListQuery::new(PortfolioFilter::from(&query), &query.page).unwrap();
        assert_eq!(
            list.count_query().sql(),
            "SELECT COUNT(*) FROM portfolio WHERE (portfolio.title ILIKE $1 \
             OR portfolio.description ILIKE $2 OR portfolio.client ILIKE $3 \
             OR portfolio.category ILIKE $4)"
        );
    }

    #[traced_test]
    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn test_portfolio_crud() -> Result<()> {
        let pool = test_pool().await?;

        let mut body = full();
        body["technologies"] = json!(["rust", "postgres"]);
        let created = create(&pool, serde_json::from_value(body).unwrap()).await?;
        assert_eq!(created.technologies, vec!["rust", "postgres"]);

        let patch: PatchPortfolioInput =
            serde_json::from_value(json!({ "title": "Checkout", "technologies": [] })).unwrap();
        let updated = update(&pool, created.id, patch).await?;
        assert_eq!(updated.title, "Checkout");
        assert!(updated.technologies.is_empty());
        assert_eq!(get_by_id(&pool, created.id).await?, updated);

        delete(&pool, created.id).await?;
        assert!(matches!(get_by_id(&pool, created.id).await, Err(Error::NotFound(_))));
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn test_overlong_client_is_a_validation_error() -> Result<()> {
        let pool = test_pool().await?;
        let mut body = full();
        body["client"] = json!("c".repeat(300));
        let err = create(&pool, serde_json::from_value(body).unwrap()).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Value too long for a text field");
        Ok(())
    }
}
