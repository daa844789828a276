//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist owned notes and resolve them by id or slug.
//! - Keep slug uniqueness atomic with respect to concurrent writers.
//!
//! # Invariants
//! - `insert_note` / `update_note` check slug availability and write inside
//!   one IMMEDIATE transaction; nothing is written when the slug is taken.
//! - `update_note` never changes `owner_id`.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::{count_to_u64, is_unique_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT id, owner_id, slug, title, text FROM notes";

/// Storage contract for notes.
pub trait NoteRepository {
    /// Inserts `note` unless its slug is already used.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces slug/title/text of an existing note.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Notes of one owner in insertion order.
    fn list_notes_by_owner(&self, owner: UserId) -> RepoResult<Vec<Note>>;
    fn count_notes(&self) -> RepoResult<u64>;
}

pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn begin_write(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        let tx = self.begin_write()?;
        if slug_taken(&tx, &note.slug, None)? {
            return Err(RepoError::SlugTaken(note.slug.clone()));
        }

        tx.execute(
            "INSERT INTO notes (id, owner_id, slug, title, text)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.to_string(),
                note.owner.to_string(),
                note.slug.as_str(),
                note.title.as_str(),
                note.text.as_str(),
            ],
        )
        .map_err(|err| slug_write_error(err, &note.slug))?;

        tx.commit()?;
        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        let tx = self.begin_write()?;
        if slug_taken(&tx, &note.slug, Some(note.id))? {
            return Err(RepoError::SlugTaken(note.slug.clone()));
        }

        let changed = tx
            .execute(
                "UPDATE notes
                 SET slug = ?2, title = ?3, text = ?4
                 WHERE id = ?1;",
                params![
                    note.id.to_string(),
                    note.slug.as_str(),
                    note.title.as_str(),
                    note.text.as_str(),
                ],
            )
            .map_err(|err| slug_write_error(err, &note.slug))?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE slug = ?1;"))?;
        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes_by_owner(&self, owner: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE owner_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        count_to_u64(count, "notes")
    }
}

fn slug_taken(conn: &Connection, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM notes
            WHERE slug = ?1
              AND (?2 IS NULL OR id != ?2)
        );",
        params![slug, exclude.map(|id| id.to_string())],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn slug_write_error(err: rusqlite::Error, slug: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::SlugTaken(slug.to_string())
    } else {
        err.into()
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        owner: parse_uuid(&owner_text, "notes.owner_id")?,
        slug: row.get("slug")?,
        title: row.get("title")?,
        text: row.get("text")?,
    })
}
