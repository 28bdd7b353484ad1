//! SQLite storage bootstrap, schema migrations and driver error classification.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the todo-list stores.
//! - Apply schema migrations in deterministic order.
//! - Classify driver failures that callers turn into ordinary results.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Stores must not read/write application data before migrations succeed.

use crate::model::todo::title_key;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::ErrorCode;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Collation on `todolists.title`; must be registered before the schema is used.
pub const TITLE_COLLATION: &str = "TITLE_NOCASE";

/// Orders titles by their case-folded key, matching the session store.
pub(crate) fn compare_titles(left: &str, right: &str) -> Ordering {
    title_key(left).cmp(&title_key(right))
}

static UNIQUE_VIOLATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)unique constraint failed").expect("valid unique regex"));

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether this error is a `UNIQUE` constraint violation.
    ///
    /// The extended result code is checked first; the driver message is only
    /// inspected when SQLite reported a generic constraint failure.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlite(err) => is_unique_violation(err),
            Self::UnsupportedSchemaVersion { .. } => false,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            if failure.code != ErrorCode::ConstraintViolation {
                return false;
            }
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                return true;
            }
            message
                .as_deref()
                .is_some_and(|text| UNIQUE_VIOLATION_RE.is_match(text))
        }
        _ => false,
    }
}
