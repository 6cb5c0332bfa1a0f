use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleFilter, Category, Search};

use super::schema::SCHEMA;
use super::store::Store;

const ARTICLE_SELECT: &str = r#"SELECT a.id, a.title, a.description, a.author, a.url, a.image_url,
                                      a.published_at, a.notes, a.is_saved, a.is_saved_from_search,
                                      a.country, a.country_code, a.popularity, a.created_at,
                                      c.id, c.name, c.notes, c.created_at, c.updated_at
                               FROM articles a
                               LEFT JOIN categories c ON a.category_id = c.id"#;

const ARTICLE_ORDER: &str = "ORDER BY a.published_at DESC NULLS LAST, a.created_at DESC";

/// SQLite-backed [`Store`]. All statements run on the connection's own thread.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Opens (or creates) the database at `db_path`. `":memory:"` gives a
    /// throwaway in-memory store.
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }
}

impl Store for Repository {
    // Article operations

    async fn find_article(&self, id: i64) -> Result<Option<Article>> {
        let article = self
            .conn
            .call(move |conn| {
                let sql = format!("{ARTICLE_SELECT} WHERE a.id = ?1");
                let article = conn
                    .query_row(&sql, params![id], article_from_row)
                    .optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }

    async fn find_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        let url = url.to_string();
        let article = self
            .conn
            .call(move |conn| {
                let sql = format!("{ARTICLE_SELECT} WHERE a.url = ?1");
                let article = conn
                    .query_row(&sql, params![url], article_from_row)
                    .optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }

    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let filter = filter.clone();
        let articles = self
            .conn
            .call(move |conn| {
                let articles = match filter {
                    ArticleFilter::All => {
                        let sql = format!("{ARTICLE_SELECT} {ARTICLE_ORDER}");
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt
                            .query_map([], article_from_row)?
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        rows
                    }
                    ArticleFilter::Category(name) => {
                        let sql = format!(
                            "{ARTICLE_SELECT} WHERE lower(c.name) = lower(?1) {ARTICLE_ORDER}"
                        );
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt
                            .query_map(params![name], article_from_row)?
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        rows
                    }
                    ArticleFilter::Saved => {
                        let sql = format!("{ARTICLE_SELECT} WHERE a.is_saved = 1 {ARTICLE_ORDER}");
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt
                            .query_map([], article_from_row)?
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        rows
                    }
                };
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    async fn insert_article(&self, article: &Article) -> Result<Option<i64>> {
        let article = article.clone();
        let id = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"INSERT INTO articles (title, description, author, url, image_url, published_at,
                                             category_id, notes, is_saved, is_saved_from_search,
                                             country, country_code, popularity, created_at)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                       ON CONFLICT(url) DO NOTHING"#,
                    params![
                        article.title,
                        article.description,
                        article.author,
                        article.url,
                        article.image_url,
                        article.published_at.map(format_datetime),
                        article.category.as_ref().map(|c| c.id),
                        article.notes,
                        article.is_saved,
                        article.is_saved_from_search,
                        article.country,
                        article.country_code,
                        article.popularity,
                        format_datetime(article.created_at()),
                    ],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                Ok(Some(conn.last_insert_rowid()))
            })
            .await?;
        Ok(id)
    }

    async fn update_article(&self, article: &Article) -> Result<()> {
        let Some(id) = article.id else {
            return Err(AppError::NotFound(format!(
                "article '{}' has not been stored",
                article.title
            )));
        };
        let category_id = article.category.as_ref().map(|c| c.id);
        let notes = article.notes.clone();
        let is_saved = article.is_saved;
        let is_saved_from_search = article.is_saved_from_search;

        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"UPDATE articles
                       SET category_id = ?1, notes = ?2, is_saved = ?3, is_saved_from_search = ?4
                       WHERE id = ?5"#,
                    params![category_id, notes, is_saved, is_saved_from_search, id],
                )?;
                Ok(changed)
            })
            .await?;

        if changed == 0 {
            return Err(AppError::NotFound(format!("article {id}")));
        }
        Ok(())
    }

    async fn delete_article(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    // Category operations

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let name = name.to_string();
        let category = self
            .conn
            .call(move |conn| {
                let category = conn
                    .query_row(
                        "SELECT id, name, notes, created_at, updated_at FROM categories WHERE name = ?1",
                        params![name],
                        |row| category_from_row(row, 0),
                    )
                    .optional()?;
                Ok(category)
            })
            .await?;
        Ok(category.flatten())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, notes, created_at, updated_at FROM categories ORDER BY name",
                )?;
                let categories = stmt
                    .query_map([], |row| category_from_row(row, 0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories.into_iter().flatten().collect())
    }

    async fn insert_category(&self, category: &Category) -> Result<bool> {
        let category = category.clone();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"INSERT INTO categories (id, name, notes, created_at, updated_at)
                       VALUES (?1, ?2, ?3, ?4, ?5)
                       ON CONFLICT(name) DO NOTHING"#,
                    params![
                        category.id,
                        category.name,
                        category.notes,
                        format_datetime(category.created_at),
                        format_datetime(category.updated_at),
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    // Search history

    async fn insert_search(&self, search: &Search) -> Result<bool> {
        let search = search.clone();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    r#"INSERT INTO searches (id, keyword, timestamp) VALUES (?1, ?2, ?3)
                       ON CONFLICT(keyword) DO NOTHING"#,
                    params![search.id, search.keyword, format_datetime(search.timestamp)],
                )?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }

    async fn list_searches(&self, limit: usize) -> Result<Vec<Search>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let searches = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, keyword, timestamp FROM searches ORDER BY timestamp DESC LIMIT ?1",
                )?;
                let searches = stmt
                    .query_map(params![limit], search_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(searches)
            })
            .await?;
        Ok(searches)
    }

    async fn delete_search(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM searches WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await?;
        Ok(changed > 0)
    }
}

/// Fixed-width RFC 3339 in UTC so stored timestamps sort lexically.
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    let mut article = Article::new(row.get::<_, String>(1)?);
    article.description = row.get(2)?;
    article.author = row.get(3)?;
    article.url = row.get(4)?;
    article.image_url = row.get(5)?;
    article.published_at = row
        .get::<_, Option<String>>(6)?
        .and_then(|s| parse_datetime(&s));
    article.notes = row.get(7)?;
    article.is_saved = row.get(8)?;
    article.is_saved_from_search = row.get(9)?;
    article.country = row.get(10)?;
    article.country_code = row.get(11)?;
    article.popularity = row.get(12)?;
    article.category = category_from_row(row, 14)?;

    let created_at = row
        .get::<_, String>(13)
        .ok()
        .and_then(|s| parse_datetime(&s))
        .unwrap_or_else(Utc::now);

    Ok(article.restored(row.get(0)?, created_at))
}

/// Reads a category starting at column `offset`; `None` when the (left
/// joined) id column is NULL.
fn category_from_row(row: &Row, offset: usize) -> rusqlite::Result<Option<Category>> {
    let Some(id) = row.get::<_, Option<Uuid>>(offset)? else {
        return Ok(None);
    };
    let timestamp = |idx: usize| {
        row.get::<_, String>(offset + idx)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now)
    };

    Ok(Some(Category {
        id,
        name: row.get(offset + 1)?,
        notes: row.get(offset + 2)?,
        created_at: timestamp(3),
        updated_at: timestamp(4),
    }))
}

fn search_from_row(row: &Row) -> rusqlite::Result<Search> {
    Ok(Search {
        id: row.get(0)?,
        keyword: row.get(1)?,
        timestamp: row
            .get::<_, String>(2)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}
