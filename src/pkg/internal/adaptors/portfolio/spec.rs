use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};

pub const PORTFOLIO_COLUMNS: &str = "portfolio.id, portfolio.title, portfolio.client, \
     portfolio.category, portfolio.description, portfolio.image, portfolio.technologies, \
     portfolio.project_url, portfolio.created_at, portfolio.updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct PortfolioEntry {
    pub id: i32,
    pub title: String,
    pub client: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub technologies: Json<Vec<String>>,
    pub project_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub title: String,
    pub client: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub project_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioChanges {
    pub title: Option<String>,
    pub client: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub project_url: Option<Option<String>>,
}
