//! Session-backed todo store.
//!
//! # Responsibility
//! - Serve the todo contract from the dataset attached to one session.
//! - Seed a fresh session from the default template on first use.
//!
//! # Invariants
//! - Reads return owned copies; callers never alias session state.
//! - Ids come from the session's monotonic counter and are never reused.
//! - Title collisions are detected before mutating, so this store never
//!   produces a uniqueness error.

use crate::model::todo::{title_key, Todo, TodoId, TodoList, TodoListId};
use crate::session::{Session, SessionData};
use crate::sort::partition_sorted;
use crate::store::{log_mutation, StoreError, StoreResult, TodoStore};

const BACKEND: &str = "session";

/// Todo store over the dataset owned by a [`Session`].
pub struct SessionTodoStore<'s> {
    data: &'s mut SessionData,
}

impl<'s> SessionTodoStore<'s> {
    /// Attaches to the session's dataset, seeding it when absent.
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            data: session.data_or_seed(),
        }
    }

    fn title_taken(&self, title: &str, except: Option<TodoListId>) -> bool {
        let wanted = title_key(title);
        self.data
            .lists
            .iter()
            .filter(|list| Some(list.id) != except)
            .any(|list| title_key(&list.title) == wanted)
    }
}

impl TodoStore for SessionTodoStore<'_> {
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        Ok(partition_sorted(self.data.lists.clone()))
    }

    fn load_todo_list(&self, list_id: TodoListId) -> StoreResult<Option<TodoList>> {
        Ok(self.data.find(list_id).cloned())
    }

    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>> {
        Ok(partition_sorted(list.todos.clone()))
    }

    fn load_todo(&self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self
            .data
            .find(list_id)
            .and_then(|list| list.find_todo(todo_id))
            .cloned())
    }

    fn toggle_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let todo = self
            .data
            .find_mut(list_id)
            .and_then(|list| list.find_todo_mut(todo_id));
        let toggled = match todo {
            Some(todo) => {
                todo.done = !todo.done;
                true
            }
            None => false,
        };
        log_mutation(
            BACKEND,
            "todo_toggle",
            toggled,
            &format!("list_id={list_id} todo_id={todo_id}"),
        );
        Ok(toggled)
    }

    fn delete_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let deleted = match self.data.find_mut(list_id) {
            Some(list) => match list.todos.iter().position(|todo| todo.id == todo_id) {
                Some(index) => {
                    list.todos.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        log_mutation(
            BACKEND,
            "todo_delete",
            deleted,
            &format!("list_id={list_id} todo_id={todo_id}"),
        );
        Ok(deleted)
    }

    fn complete_all_todos(&mut self, list_id: TodoListId) -> StoreResult<bool> {
        let Some(list) = self.data.find_mut(list_id) else {
            log_mutation(
                BACKEND,
                "todos_complete_all",
                false,
                &format!("list_id={list_id}"),
            );
            return Ok(false);
        };

        let mut changed = 0;
        for todo in list.todos.iter_mut().filter(|todo| !todo.done) {
            todo.done = true;
            changed += 1;
        }
        log_mutation(
            BACKEND,
            "todos_complete_all",
            true,
            &format!("list_id={list_id} changed={changed}"),
        );
        Ok(true)
    }

    fn add_todo(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool> {
        if self.data.find(list_id).is_none() {
            log_mutation(BACKEND, "todo_add", false, &format!("list_id={list_id}"));
            return Ok(false);
        }

        let todo_id = self.data.mint_id();
        if let Some(list) = self.data.find_mut(list_id) {
            list.todos.push(Todo::new(todo_id, title));
        }
        log_mutation(
            BACKEND,
            "todo_add",
            true,
            &format!("list_id={list_id} todo_id={todo_id}"),
        );
        Ok(true)
    }

    fn delete_todo_list(&mut self, list_id: TodoListId) -> StoreResult<bool> {
        let deleted = match self.data.position(list_id) {
            Some(index) => {
                self.data.lists.remove(index);
                true
            }
            None => false,
        };
        log_mutation(
            BACKEND,
            "todolist_delete",
            deleted,
            &format!("list_id={list_id}"),
        );
        Ok(deleted)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        Ok(self.data.lists.iter().any(|list| list.title == title))
    }

    fn edit_todo_list_title(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool> {
        if self.title_taken(title, Some(list_id)) {
            log_mutation(
                BACKEND,
                "todolist_rename",
                false,
                &format!("list_id={list_id} reason=duplicate_title"),
            );
            return Ok(false);
        }

        let renamed = match self.data.find_mut(list_id) {
            Some(list) => {
                list.title = title.to_string();
                true
            }
            None => false,
        };
        log_mutation(
            BACKEND,
            "todolist_rename",
            renamed,
            &format!("list_id={list_id}"),
        );
        Ok(renamed)
    }

    fn add_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        if self.title_taken(title, None) {
            log_mutation(
                BACKEND,
                "todolist_add",
                false,
                "reason=duplicate_title",
            );
            return Ok(false);
        }

        let list_id = self.data.mint_id();
        self.data.lists.push(TodoList::new(list_id, title));
        log_mutation(BACKEND, "todolist_add", true, &format!("list_id={list_id}"));
        Ok(true)
    }

    fn is_unique_constraint_violation(&self, _error: &StoreError) -> bool {
        false
    }
}
