use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const NEWS_COLUMNS: &str = "news.id, news.title, news.category, news.image, news.content, \
     news.published_at, news.created_at, news.updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct NewsEntry {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub image: String,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub category: String,
    pub image: String,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub content: Option<Option<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}
