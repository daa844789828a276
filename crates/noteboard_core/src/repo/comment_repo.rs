//! Comment repository contract and SQLite implementation.
//!
//! # Invariants
//! - `update_comment` rewrites text only; news and author are fixed.
//! - Thread listing is ordered by the stored `created_at`, never by rowid.

use crate::model::comment::{Comment, CommentId};
use crate::model::news::NewsId;
use crate::repo::{count_to_u64, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COMMENT_SELECT_SQL: &str = "SELECT id, news_id, author_id, text, created_at FROM comments";

pub trait CommentRepository {
    fn insert_comment(&self, comment: &Comment) -> RepoResult<CommentId>;
    fn update_comment(&self, comment: &Comment) -> RepoResult<()>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Comments of one news item, `created_at ASC, id ASC`.
    fn list_comments_for_news(&self, news_id: NewsId) -> RepoResult<Vec<Comment>>;
    fn count_comments(&self) -> RepoResult<u64>;
}

pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn insert_comment(&self, comment: &Comment) -> RepoResult<CommentId> {
        self.conn.execute(
            "INSERT INTO comments (id, news_id, author_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                comment.id.to_string(),
                comment.news_id.to_string(),
                comment.author.to_string(),
                comment.text.as_str(),
                comment.created_at,
            ],
        )?;
        Ok(comment.id)
    }

    fn update_comment(&self, comment: &Comment) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE comments SET text = ?2 WHERE id = ?1;",
            params![comment.id.to_string(), comment.text.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(comment.id));
        }
        Ok(())
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }
        Ok(None)
    }

    fn list_comments_for_news(&self, news_id: NewsId) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL} WHERE news_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([news_id.to_string()])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }

    fn count_comments(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments;", [], |row| row.get(0))?;
        count_to_u64(count, "comments")
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let id_text: String = row.get("id")?;
    let news_text: String = row.get("news_id")?;
    let author_text: String = row.get("author_id")?;
    Ok(Comment {
        id: parse_uuid(&id_text, "comments.id")?,
        news_id: parse_uuid(&news_text, "comments.news_id")?,
        author: parse_uuid(&author_text, "comments.author_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}
