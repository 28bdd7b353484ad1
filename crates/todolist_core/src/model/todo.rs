//! Todo list and todo item records.
//!
//! # Invariants
//! - `TodoList::is_done()` is `false` for an empty list.
//! - Todo ids are unique within their parent list.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of a todo list, unique within its owner's collection.
pub type TodoListId = i64;

/// Identifier of a todo, unique within its parent list.
pub type TodoId = i64;

/// Longest accepted list/todo title, counted in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Single item inside a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
}

impl Todo {
    /// Creates a not-done todo.
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// Named, ordered collection of todos owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: TodoListId,
    pub title: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: TodoListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }

    /// Returns whether the list has at least one todo and all are done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.done)
    }

    /// Returns whether at least one todo is still open.
    pub fn has_undone_todos(&self) -> bool {
        self.todos.iter().any(|todo| !todo.done)
    }

    pub fn find_todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    pub fn find_todo_mut(&mut self, todo_id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }

    /// Number of todos marked done.
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.done).count()
    }
}

/// Case-folded form of a title, used for uniqueness and ordering.
///
/// Every store compares titles through this key, so "Äpfel" and "äpfel"
/// collide everywhere.
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Title validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleValidationError {
    Empty,
    TooLong { max: usize, actual: usize },
}

impl Display for TitleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "title must not be empty"),
            Self::TooLong { max, actual } => {
                write!(f, "title must be at most {max} characters, got {actual}")
            }
        }
    }
}

impl Error for TitleValidationError {}

/// Trims `title` and checks it against length rules.
///
/// Returns the trimmed title on success.
pub fn validate_title(title: &str) -> Result<&str, TitleValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TitleValidationError::Empty);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_TITLE_CHARS {
        return Err(TitleValidationError::TooLong {
            max: MAX_TITLE_CHARS,
            actual,
        });
    }
    Ok(trimmed)
}
