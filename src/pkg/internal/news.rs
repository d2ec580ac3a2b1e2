use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    pkg::internal::{
        adaptors::news::{
            mutators::NewsMutator,
            selectors::NewsSelector,
            spec::{NEWS_COLUMNS, NewNews, NewsChanges, NewsEntry},
        },
        fields::{empty_as_null, non_empty, parse_timestamp, presence},
        query::{Conditions, ListQuery, Listing, PageParams, Paginated, present},
        transform::timestamp,
    },
    prelude::{Error, Result},
};

pub const MISSING_NEWS_FIELDS: &str = "Missing required fields: title, category, image";
const NOT_FOUND: &str = "News not found";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsInput {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    #[validate(required, length(min = 1))]
    pub image: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
}

impl CreateNewsInput {
    pub fn into_new_news(self) -> Result<NewNews> {
        self.validate()
            .map_err(|_| Error::validation(MISSING_NEWS_FIELDS))?;
        Ok(NewNews {
            title: self.title.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            content: empty_as_null(self.content),
            published_at: published_at(self.published_at)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNewsInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "presence")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "presence")]
    pub published_at: Option<Option<String>>,
}

impl PatchNewsInput {
    pub fn into_changes(self) -> Result<NewsChanges> {
        Ok(NewsChanges {
            title: non_empty(self.title),
            category: non_empty(self.category),
            image: non_empty(self.image),
            content: self.content,
            published_at: self.published_at.map(published_at).transpose()?,
        })
    }
}

/// Blank clears the date; anything else must be RFC 3339.
fn published_at(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    non_empty(raw)
        .map(|raw| parse_timestamp("publishedAt", &raw))
        .transpose()
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewsQuery {
    #[serde(flatten)]
    pub page: PageParams,
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl From<&NewsQuery> for NewsFilter {
    fn from(query: &NewsQuery) -> Self {
        NewsFilter {
            search: present(&query.search).map(str::to_string),
            category: present(&query.category).map(str::to_string),
        }
    }
}

impl Listing for NewsFilter {
    const FROM: &'static str = "news";
    const SELECT: &'static str = NEWS_COLUMNS;
    const KEY: &'static str = "news.id";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("createdAt", "news.created_at"),
        ("updatedAt", "news.updated_at"),
        ("publishedAt", "news.published_at"),
        ("id", "news.id"),
        ("title", "news.title"),
        ("category", "news.category"),
    ];

    fn push_conditions(&self, conditions: &mut Conditions<'_>) {
        if let Some(search) = &self.search {
            conditions.any_contains(&["news.title", "news.content", "news.category"], search);
        }
        if let Some(category) = &self.category {
            conditions.contains("news.category", category);
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireNews {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub image: String,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NewsEntry> for WireNews {
    fn from(entry: NewsEntry) -> Self {
        WireNews {
            id: entry.id,
            title: entry.title,
            category: entry.category,
            image: entry.image,
            content: entry.content,
            published_at: entry.published_at.as_ref().map(timestamp),
            created_at: timestamp(&entry.created_at),
            updated_at: timestamp(&entry.updated_at),
        }
    }
}

pub async fn create(pool: &PgPool, input: CreateNewsInput) -> Result<WireNews> {
    let news = input.into_new_news()?;
    let mut conn = pool.acquire().await?;
    let entry = NewsMutator::new(&mut conn).create(news).await?;
    tracing::info!("created news {} ({})", entry.id, &entry.title);
    Ok(entry.into())
}

pub async fn update(pool: &PgPool, id: i32, patch: PatchNewsInput) -> Result<WireNews> {
    let changes = patch.into_changes()?;
    let mut conn = pool.acquire().await?;
    let entry = NewsMutator::new(&mut conn)
        .update(id, changes)
        .await?
        .ok_or_else(|| Error::not_found(NOT_FOUND))?;
    tracing::info!("updated news {}", id);
    Ok(entry.into())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !NewsMutator::new(&mut conn).delete(id).await? {
        return Err(Error::not_found(NOT_FOUND));
    }
    tracing::info!("deleted news {}", id);
    Ok(())
}

pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<WireNews> {
    let mut conn = pool.acquire().await?;
    NewsSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .map(WireNews::from)
        .ok_or_else(|| Error::not_found(NOT_FOUND))
}

pub async fn list(pool: &PgPool, query: &NewsQuery) -> Result<Paginated<WireNews>> {
    let query = ListQuery::new(NewsFilter::from(query), &query.page)?;
    let mut conn = pool.acquire().await?;
    let (total, entries) = NewsSelector::new(&mut conn).list(&query).await?;
    let rows = entries.into_iter().map(WireNews::from).collect();
    Ok(Paginated::new(rows, total, &query.page))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::server::state::test_pool;

    #[test]
    fn create_requires_title_category_image() {
        let input: CreateNewsInput =
            serde_json::from_value(json!({ "title": "Launch", "category": "", "image": "a.png" }))
                .unwrap();
        assert_eq!(input.into_new_news().unwrap_err().to_string(), MISSING_NEWS_FIELDS);

        let input: CreateNewsInput = serde_json::from_value(json!({
            "title": "Launch",
            "category": "company",
            "image": "a.png",
            "publishedAt": "2025-10-01T12:00:00Z"
        }))
        .unwrap();
        let news = input.into_new_news().unwrap();
        assert_eq!(news.content, None);
        assert_eq!(news.published_at.map(|at| timestamp(&at)).as_deref(), Some("2025-10-01T12:00:00.000Z"));
    }

    #[test]
    fn bad_published_at_is_rejected() {
        let input: CreateNewsInput = serde_json::from_value(json!({
            "title": "Launch",
            "category": "company",
            "image": "a.png",
            "publishedAt": "last week"
        }))
        .unwrap();
        assert!(matches!(input.into_new_news(), Err(Error::Validation(_))));

        let patch: PatchNewsInput =
            serde_json::from_value(json!({ "publishedAt": "10/01/2025" })).unwrap();
        assert!(patch.into_changes().is_err());
    }

    #[test]
    fn patch_semantics() {
        let patch: PatchNewsInput =
            serde_json::from_value(json!({ "title": "", "content": null, "publishedAt": null }))
                .unwrap();
        let changes = patch.into_changes().unwrap();
        assert_eq!(
            changes,
            NewsChanges {
                content: Some(None),
                published_at: Some(None),
                ..Default::default()
            }
        );

        let untouched = PatchNewsInput::default().into_changes().unwrap();
        assert_eq!(untouched, NewsChanges::default());
    }

    #[test]
    fn search_spans_title_content_category() {
        let query: NewsQuery =
            serde_json::from_value(json!({ "search": "50%", "category": "events" })).unwrap();
        let list = ListQuery::new(NewsFilter::from(&query), &query.page).unwrap();
        assert_eq!(
            list.count_query().sql(),
            "SELECT COUNT(*) FROM news WHERE (news.title ILIKE $1 OR news.content ILIKE $2 \
             OR news.category ILIKE $3) AND news.category ILIKE $4"
        );
    }

    #[traced_test]
    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn test_news_crud() -> Result<()> {
        let pool = test_pool().await?;

        let input: CreateNewsInput = serde_json::from_value(json!({
            "title": "Office opening",
            "category": "company",
            "image": "office.png",
            "content": "We moved"
        }))
        .unwrap();
        let created = create(&pool, input).await?;
        assert_eq!(created.published_at, None);

        let patch: PatchNewsInput = serde_json::from_value(json!({
            "publishedAt": "2025-10-01T12:00:00Z",
            "content": null
        }))
        .unwrap();
        let updated = update(&pool, created.id, patch).await?;
        assert_eq!(updated.title, "Office opening");
        assert_eq!(updated.content, None);
        assert_eq!(updated.published_at.as_deref(), Some("2025-10-01T12:00:00.000Z"));

        delete(&pool, created.id).await?;
        assert!(matches!(get_by_id(&pool, created.id).await, Err(Error::NotFound(_))));
        assert!(matches!(delete(&pool, created.id).await, Err(Error::NotFound(_))));
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    #[ignore = "needs a postgres database at DATABASE_URL"]
    async fn test_overlong_category_is_a_validation_error() -> Result<()> {
        let pool = test_pool().await?;
        let input: CreateNewsInput = serde_json::from_value(json!({
            "title": "Launch",
            "category": "c".repeat(300),
            "image": "a.png"
        }))
        .unwrap();
        let err = create(&pool, input).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        Ok(())
    }
}
