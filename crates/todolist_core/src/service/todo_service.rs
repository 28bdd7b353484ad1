//! Todo-list use-case service.
//!
//! # Responsibility
//! - Validate titles before they reach a store.
//! - Turn store `false` results into typed, caller-facing outcomes.
//!
//! # Invariants
//! - Service APIs never bypass the store contract.
//! - The service is backend-agnostic: any `TodoStore` works.

use crate::model::todo::{
    validate_title, TitleValidationError, Todo, TodoId, TodoList, TodoListId,
};
use crate::store::{StoreError, TodoStore};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from todo-list use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Title is blank or too long.
    InvalidTitle(TitleValidationError),
    /// Another list of the same user already uses this title.
    DuplicateTitle(String),
    ListNotFound(TodoListId),
    TodoNotFound {
        list_id: TodoListId,
        todo_id: TodoId,
    },
    /// Store-level failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(err) => write!(f, "{err}"),
            Self::DuplicateTitle(title) => write!(f, "the list title must be unique: `{title}`"),
            Self::ListNotFound(list_id) => write!(f, "todo list not found: {list_id}"),
            Self::TodoNotFound { list_id, todo_id } => {
                write!(f, "todo not found: {todo_id} in list {list_id}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TitleValidationError> for ServiceError {
    fn from(value: TitleValidationError) -> Self {
        Self::InvalidTitle(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Detail view of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListDetail {
    pub list: TodoList,
    /// Todos in display order.
    pub todos: Vec<Todo>,
    pub is_done: bool,
    pub has_undone: bool,
}

/// Use-case facade over a todo store.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists in display order.
    pub fn todo_lists(&self) -> ServiceResult<Vec<TodoList>> {
        Ok(self.store.sorted_todo_lists()?)
    }

    pub fn todo_list_detail(&self, list_id: TodoListId) -> ServiceResult<TodoListDetail> {
        let list = self
            .store
            .load_todo_list(list_id)?
            .ok_or(ServiceError::ListNotFound(list_id))?;
        let todos = self.store.sorted_todos(&list)?;
        let has_undone = self.store.has_undone_todos(&list);
        Ok(TodoListDetail {
            is_done: list.is_done(),
            has_undone,
            todos,
            list,
        })
    }

    /// Creates a list after validating and de-duplicating its title.
    pub fn create_todo_list(&mut self, title: &str) -> ServiceResult<()> {
        let title = validate_title(title)?;
        if self.store.exists_todo_list_title(title)? || !self.store.add_todo_list(title)? {
            return Err(ServiceError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    pub fn rename_todo_list(&mut self, list_id: TodoListId, title: &str) -> ServiceResult<()> {
        let title = validate_title(title)?;
        if self.store.edit_todo_list_title(list_id, title)? {
            return Ok(());
        }
        if self.store.load_todo_list(list_id)?.is_none() {
            return Err(ServiceError::ListNotFound(list_id));
        }
        Err(ServiceError::DuplicateTitle(title.to_string()))
    }

    pub fn delete_todo_list(&mut self, list_id: TodoListId) -> ServiceResult<()> {
        if !self.store.delete_todo_list(list_id)? {
            return Err(ServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    pub fn add_todo(&mut self, list_id: TodoListId, title: &str) -> ServiceResult<()> {
        let title = validate_title(title)?;
        if !self.store.add_todo(list_id, title)? {
            return Err(ServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    /// Flips one todo and returns its new state.
    pub fn toggle_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> ServiceResult<Todo> {
        if !self.store.toggle_todo(list_id, todo_id)? {
            return Err(ServiceError::TodoNotFound { list_id, todo_id });
        }
        self.store
            .load_todo(list_id, todo_id)?
            .ok_or(ServiceError::TodoNotFound { list_id, todo_id })
    }

    pub fn delete_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> ServiceResult<()> {
        if !self.store.delete_todo(list_id, todo_id)? {
            return Err(ServiceError::TodoNotFound { list_id, todo_id });
        }
        Ok(())
    }

    pub fn complete_all_todos(&mut self, list_id: TodoListId) -> ServiceResult<()> {
        if !self.store.complete_all_todos(list_id)? {
            return Err(ServiceError::ListNotFound(list_id));
        }
        Ok(())
    }
}
