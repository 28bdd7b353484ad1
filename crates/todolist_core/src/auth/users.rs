//! SQLite-backed user credential directory.

use crate::auth::{Argon2Credentials, CredentialHasher};
use crate::db::is_unique_violation;
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};

/// Reads and registers rows of the `users` table.
pub struct SqliteUserDirectory<'conn> {
    conn: &'conn Connection,
    hasher: Box<dyn CredentialHasher + 'conn>,
}

impl<'conn> SqliteUserDirectory<'conn> {
    /// Creates a directory hashing new passwords with Argon2.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_hasher(conn, Argon2Credentials)
    }

    pub fn with_hasher(conn: &'conn Connection, hasher: impl CredentialHasher + 'conn) -> Self {
        Self {
            conn,
            hasher: Box::new(hasher),
        }
    }

    /// Registers a user. Returns `false` when the username is taken.
    pub fn create_user(&self, username: &str, password: &str) -> StoreResult<bool> {
        let password_hash = self.hasher.hash(password)?;
        match self.conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2);",
            params![username, password_hash],
        ) {
            Ok(changed) => {
                info!("event=user_create module=auth status=ok");
                Ok(changed > 0)
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("event=user_create module=auth status=rejected reason=username_taken");
                Ok(false)
            }
            Err(err) => Err(StoreError::from(err)),
        }
    }

    /// Returns the stored password hash for `username`, if the user exists.
    pub fn password_hash(&self, username: &str) -> StoreResult<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT password FROM users WHERE username = ?1;",
                [username],
                |row| row.get::<_, String>("password"),
            )
            .optional()?;
        Ok(hash)
    }

    pub fn user_exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self.password_hash(username)?.is_some())
    }
}
