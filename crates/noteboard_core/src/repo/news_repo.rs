//! News repository contract and SQLite implementation.
//!
//! News rows are written by the ingestion path; core reads them.

use crate::model::news::{NewsId, NewsItem};
use crate::repo::{count_to_u64, parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const NEWS_SELECT_SQL: &str = "SELECT id, title, text, published_at FROM news";

pub trait NewsRepository {
    fn insert_news(&self, item: &NewsItem) -> RepoResult<NewsId>;
    fn get_news(&self, id: NewsId) -> RepoResult<Option<NewsItem>>;
    /// Most recent first (`published_at DESC, id ASC`), at most `limit` rows.
    fn list_recent_news(&self, limit: u32) -> RepoResult<Vec<NewsItem>>;
    fn count_news(&self) -> RepoResult<u64>;
}

pub struct SqliteNewsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNewsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NewsRepository for SqliteNewsRepository<'_> {
    fn insert_news(&self, item: &NewsItem) -> RepoResult<NewsId> {
        self.conn.execute(
            "INSERT INTO news (id, title, text, published_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                item.text.as_str(),
                item.published_at,
            ],
        )?;
        Ok(item.id)
    }

    fn get_news(&self, id: NewsId) -> RepoResult<Option<NewsItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NEWS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_news_row(row)?));
        }
        Ok(None)
    }

    fn list_recent_news(&self, limit: u32) -> RepoResult<Vec<NewsItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NEWS_SELECT_SQL} ORDER BY published_at DESC, id ASC LIMIT ?;"
        ))?;
        let mut rows = stmt.query(params_from_iter([Value::Integer(i64::from(limit))]))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_news_row(row)?);
        }
        Ok(items)
    }

    fn count_news(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news;", [], |row| row.get(0))?;
        count_to_u64(count, "news")
    }
}

fn parse_news_row(row: &Row<'_>) -> RepoResult<NewsItem> {
    let id_text: String = row.get("id")?;
    Ok(NewsItem {
        id: parse_uuid(&id_text, "news.id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        published_at: row.get("published_at")?,
    })
}
