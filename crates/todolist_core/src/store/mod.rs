//! Store contract shared by the SQLite and session-backed implementations.
//!
//! # Responsibility
//! - Define the todo-list operation set both backends satisfy identically.
//! - Keep authentication as an optional capability of a backend.
//!
//! # Invariants
//! - Every operation is scoped to one user (or one session) only.
//! - Not-found is `Ok(None)` / `Ok(false)`, never an error.
//! - A title collision on create/rename is `Ok(false)`, never an error.
//! - Orderings come from `sort::partition_sorted` in both backends.

use crate::auth::CredentialError;
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod session_store;
mod sqlite_store;

pub use session_store::SessionTodoStore;
pub use sqlite_store::SqliteTodoStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures that propagate out of a store unchanged.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Credential(CredentialError),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// A user-scoped store was requested for a session without a user.
    Unauthenticated,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::Unauthenticated => write!(f, "no signed-in user for this session"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Unauthenticated => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CredentialError> for StoreError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

/// Todo-list persistence scoped to the current user.
///
/// Mutating operations return whether their target existed. Callers are
/// expected to treat `false` as an ordinary outcome.
pub trait TodoStore {
    /// All lists of the current user, not-done lists first, each group
    /// ordered by case-insensitive title.
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>>;

    /// One list with its todos.
    fn load_todo_list(&self, list_id: TodoListId) -> StoreResult<Option<TodoList>>;

    /// Todos of `list`, not-done first, each group ordered by
    /// case-insensitive title.
    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>>;

    fn load_todo(&self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>>;

    /// Flips the done flag. Returns whether the todo existed.
    fn toggle_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool>;

    fn delete_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool>;

    fn has_undone_todos(&self, list: &TodoList) -> bool {
        list.has_undone_todos()
    }

    /// Marks every todo of the list done. Returns whether the list existed,
    /// including when nothing was left to complete.
    fn complete_all_todos(&mut self, list_id: TodoListId) -> StoreResult<bool>;

    /// Appends a not-done todo with a fresh id. Returns whether the list
    /// existed.
    fn add_todo(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool>;

    /// Removes the list and all of its todos.
    fn delete_todo_list(&mut self, list_id: TodoListId) -> StoreResult<bool>;

    /// Whether the current user owns a list with exactly this title.
    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool>;

    /// Renames a list. Returns `false` when the list is missing or another
    /// list of the same user already uses the title (ignoring case).
    fn edit_todo_list_title(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool>;

    /// Creates an empty list with a fresh id. Returns `false` when the title
    /// collides (ignoring case) with an existing list.
    fn add_todo_list(&mut self, title: &str) -> StoreResult<bool>;

    /// Whether `error` reports a list-title uniqueness violation.
    fn is_unique_constraint_violation(&self, error: &StoreError) -> bool;
}

/// Optional capability: password authentication against a credential store.
pub trait Authenticator {
    /// Returns whether `username` exists and `password` matches its stored
    /// credential.
    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool>;
}

/// Emits one metadata-only log line for a mutating store operation.
pub(crate) fn log_mutation(backend: &str, event: &str, applied: bool, ids: &str) {
    if applied {
        info!("event={event} module=store backend={backend} status=ok {ids}");
    } else {
        debug!("event={event} module=store backend={backend} status=not_applied {ids}");
    }
}
