//! Users known to storage.
//!
//! Rows are written by the identity collaborator; notes and comments
//! reference them through foreign keys.

use crate::model::user::{Identity, UserId};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait UserRepository {
    fn insert_user(&self, identity: &Identity) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<Identity>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, identity: &Identity) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (id, username) VALUES (?1, ?2);",
            params![identity.id.to_string(), identity.username.as_str()],
        )?;
        Ok(identity.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<Identity>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1;",
                [id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id_text, username)) => Ok(Some(Identity::with_id(
                parse_uuid(&id_text, "users.id")?,
                username,
            ))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SqliteUserRepository, UserRepository};
    use crate::db::open_db_in_memory;
    use crate::model::user::Identity;
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn inserted_user_is_read_back() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteUserRepository::new(&conn);
        let identity = Identity::new("Автор");

        let id = repo.insert_user(&identity).unwrap();

        assert_eq!(id, identity.id);
        assert_eq!(repo.get_user(id).unwrap(), Some(identity));
        assert_eq!(repo.get_user(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteUserRepository::new(&conn);
        repo.insert_user(&Identity::new("author")).unwrap();

        let err = repo.insert_user(&Identity::new("author")).unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
    }
}
