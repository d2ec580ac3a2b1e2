//! List-endpoint plumbing: pagination and sort parsing, per-entity filters
//! rendered into parameterised SQL, and the paginated response envelope.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder, postgres::PgRow};

use crate::prelude::{Error, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_ORDER_BY: &str = "createdAt";

/// Raw pagination/sort parameters as they arrive on the query string.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_number: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub limit: i64,
}

impl Page {
    pub fn parse(page_number: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let number = positive("pageNumber", page_number, DEFAULT_PAGE)?;
        let limit = positive("limit", limit, DEFAULT_LIMIT)?.min(MAX_LIMIT);
        // keeps offset() from overflowing
        (number - 1)
            .checked_mul(limit)
            .ok_or_else(|| Error::validation("pageNumber is out of range"))?;
        Ok(Page { number, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.limit
    }
}

fn positive(name: &str, raw: Option<&str>, default: i64) -> Result<i64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| Error::validation(format!("{name} must be a positive integer"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            _ => Err(Error::validation("order must be ASC or DESC")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

impl Sort {
    /// Resolves a wire column name against the listing's allow-list.
    pub fn parse<L: Listing>(order_by: Option<&str>, order: Option<&str>) -> Result<Self> {
        let direction = match order.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => Direction::default(),
        };
        let name = order_by
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ORDER_BY);
        let column = L::SORTABLE
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                let allowed: Vec<&str> = L::SORTABLE.iter().map(|(wire, _)| *wire).collect();
                Error::validation(format!(
                    "Invalid orderBy: {}. Must be one of: {}",
                    name,
                    allowed.join(", ")
                ))
            })?;
        Ok(Sort { column, direction })
    }
}

/// Appends `WHERE`/`AND`-joined predicates to a query, binding every value.
pub struct Conditions<'q> {
    qb: &'q mut QueryBuilder<'static, Postgres>,
    first: bool,
}

impl<'q> Conditions<'q> {
    pub fn new(qb: &'q mut QueryBuilder<'static, Postgres>) -> Self {
        Conditions { qb, first: true }
    }

    fn next(&mut self) -> &mut QueryBuilder<'static, Postgres> {
        self.qb.push(if self.first { " WHERE " } else { " AND " });
        self.first = false;
        &mut *self.qb
    }

    pub fn is_true(&mut self, column: &str) {
        self.next().push(column).push(" = TRUE");
    }

    pub fn eq_text(&mut self, column: &str, value: &str) {
        self.next()
            .push(column)
            .push(" = ")
            .push_bind(value.to_string());
    }

    pub fn eq_int(&mut self, column: &str, value: i32) {
        self.next().push(column).push(" = ").push_bind(value);
    }

    /// Case-insensitive substring match.
    pub fn contains(&mut self, column: &str, needle: &str) {
        self.next()
            .push(column)
            .push(" ILIKE ")
            .push_bind(like_pattern(needle));
    }

    /// Case-insensitive substring match ORed across `columns`.
    pub fn any_contains(&mut self, columns: &[&str], needle: &str) {
        if columns.is_empty() {
            return;
        }
        let pattern = like_pattern(needle);
        let qb = self.next();
        qb.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
    }
}

/// `%needle%` with LIKE metacharacters escaped so the term matches literally.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Treats absent and blank query parameters alike.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A typed filter over one entity's table.
pub trait Listing {
    /// Table (and joins) the rows come from.
    const FROM: &'static str;
    /// Column list of the page query.
    const SELECT: &'static str;
    /// Unique column used to break ties so pages are stable.
    const KEY: &'static str;
    /// Wire name to SQL column.
    const SORTABLE: &'static [(&'static str, &'static str)];

    fn push_conditions(&self, conditions: &mut Conditions<'_>);
}

#[derive(Debug, Clone)]
pub struct ListQuery<L> {
    pub listing: L,
    pub page: Page,
    pub sort: Sort,
}

impl<L: Listing> ListQuery<L> {
    pub fn new(listing: L, params: &PageParams) -> Result<Self> {
        let page = Page::parse(params.page_number.as_deref(), params.limit.as_deref())?;
        let sort = Sort::parse::<L>(params.order_by.as_deref(), params.order.as_deref())?;
        Ok(ListQuery { listing, page, sort })
    }

    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", L::FROM));
        self.listing.push_conditions(&mut Conditions::new(&mut qb));
        qb
    }

    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", L::SELECT, L::FROM));
        self.listing.push_conditions(&mut Conditions::new(&mut qb));
        let dir = self.sort.direction.as_sql();
        qb.push(format!(" ORDER BY {} {dir}, {} {dir}", self.sort.column, L::KEY));
        qb.push(" LIMIT ")
            .push_bind(self.page.limit)
            .push(" OFFSET ")
            .push_bind(self.page.offset());
        qb
    }

    /// Runs the count and the page fetch against the same conditions.
    pub async fn fetch<T>(&self, conn: &mut PgConnection) -> Result<(i64, Vec<T>)>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let total = self
            .count_query()
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;
        let rows = self
            .page_query()
            .build_query_as::<T>()
            .fetch_all(&mut *conn)
            .await?;
        tracing::debug!(
            "fetched {} of {} rows from {} (page {}, limit {})",
            rows.len(),
            total,
            L::FROM,
            self.page.number,
            self.page.limit
        );
        Ok((total, rows))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(rows: Vec<T>, total_count: i64, page: &Page) -> Self {
        Paginated {
            count: total_count,
            rows,
            pagination: Pagination {
                current_page: page.number,
                total_pages: total_pages(total_count, page.limit),
                limit: page.limit,
                total_count,
            },
        }
    }
}

pub fn total_pages(total_count: i64, limit: i64) -> i64 {
    if total_count <= 0 || limit <= 0 {
        return 0;
    }
    (total_count + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widgets {
        search: Option<String>,
        color: Option<String>,
    }

    impl Listing for Widgets {
        const FROM: &'static str = "widgets";
        const SELECT: &'static str = "id, name";
        const KEY: &'static str = "widgets.id";
        const SORTABLE: &'static [(&'static str, &'static str)] = &[
            ("createdAt", "widgets.created_at"),
            ("name", "widgets.name"),
        ];

        fn push_conditions(&self, conditions: &mut Conditions<'_>) {
            conditions.is_true("widgets.visible");
            if let Some(search) = present(&self.search) {
                conditions.any_contains(&["widgets.name", "widgets.notes"], search);
            }
            if let Some(color) = present(&self.color) {
                conditions.eq_text("widgets.color", color);
            }
        }
    }

    fn params(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page_number: page.map(String::from),
            limit: limit.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn page_defaults_and_offset() {
        let page = Page::parse(None, None).unwrap();
        assert_eq!(page, Page { number: 1, limit: 10 });
        assert_eq!(page.offset(), 0);

        let page = Page::parse(Some("3"), Some("25")).unwrap();
        assert_eq!(page.offset(), 50);

        assert_eq!(Page::parse(Some(""), Some(" ")).unwrap(), Page { number: 1, limit: 10 });
    }

    #[test]
    fn page_rejects_non_positive_and_garbage() {
        for (page, limit) in [
            (Some("0"), None),
            (Some("-2"), None),
            (Some("abc"), None),
            (None, Some("0")),
            (None, Some("ten")),
            (Some("1.5"), None),
        ] {
            let err = Page::parse(page, limit).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{page:?} {limit:?}");
        }
        assert!(Page::parse(Some(&i64::MAX.to_string()), Some("50")).is_err());
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(Page::parse(None, Some("5000")).unwrap().limit, MAX_LIMIT);
    }

    #[test]
    fn sort_uses_allow_list() {
        let sort = Sort::parse::<Widgets>(None, None).unwrap();
        assert_eq!(sort.column, "widgets.created_at");
        assert_eq!(sort.direction, Direction::Desc);

        let sort = Sort::parse::<Widgets>(Some("name"), Some("asc")).unwrap();
        assert_eq!(sort, Sort { column: "widgets.name", direction: Direction::Asc });

        let err = Sort::parse::<Widgets>(Some("name; DROP TABLE widgets"), None).unwrap_err();
        assert!(err.to_string().starts_with("Invalid orderBy"));
        assert!(Sort::parse::<Widgets>(None, Some("sideways")).is_err());
    }

    #[test]
    fn conditions_render_with_bound_parameters() {
        let listing = Widgets {
            search: Some("bolt".into()),
            color: Some("red".into()),
        };
        let query = ListQuery::new(listing, &params(Some("2"), Some("5"))).unwrap();

        assert_eq!(
            query.count_query().sql(),
            "SELECT COUNT(*) FROM widgets WHERE widgets.visible = TRUE \
             AND (widgets.name ILIKE $1 OR widgets.notes ILIKE $2) AND widgets.color = $3"
        );
        assert_eq!(
            query.page_query().sql(),
            "SELECT id, name FROM widgets WHERE widgets.visible = TRUE \
             AND (widgets.name ILIKE $1 OR widgets.notes ILIKE $2) AND widgets.color = $3 \
             ORDER BY widgets.created_at DESC, widgets.id DESC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn blank_filters_are_skipped() {
        let listing = Widgets {
            search: Some("   ".into()),
            color: None,
        };
        let query = ListQuery::new(listing, &PageParams::default()).unwrap();
        assert_eq!(
            query.count_query().sql(),
            "SELECT COUNT(*) FROM widgets WHERE widgets.visible = TRUE"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("dev"), "%dev%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn envelope_math() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(1, 100), 1);

        let page = Page::parse(Some("4"), Some("10")).unwrap();
        let env: Paginated<i32> = Paginated::new(vec![], 25, &page);
        assert_eq!(env.count, 25);
        assert!(env.rows.is_empty());
        assert_eq!(
            env.pagination,
            Pagination { current_page: 4, total_pages: 3, limit: 10, total_count: 25 }
        );

        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["pagination"]["currentPage"], 4);
        assert_eq!(json["pagination"]["totalCount"], 25);
    }
}
