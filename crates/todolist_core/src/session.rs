//! Per-browser session state handed to the stores.
//!
//! # Responsibility
//! - Carry the signed-in username for store scoping.
//! - Hold the in-memory store's dataset between requests.
//!
//! # Invariants
//! - The dataset slot is owned by exactly one session and is never shared.
//! - Serialisation round-trips the whole session so an external session
//!   store can persist it.

use crate::model::todo::{TodoList, TodoListId};
use crate::seed::seed_todo_lists;
use serde::{Deserialize, Serialize};

/// Mutable state persisted across requests for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in user, `None` until authentication succeeds.
    #[serde(default)]
    pub username: Option<String>,
    /// Dataset owned by the session-backed store.
    #[serde(default, rename = "todoLists")]
    pub todo_lists: Option<SessionData>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for an already authenticated user.
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            todo_lists: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Clears the username. The dataset stays attached to the session.
    pub fn sign_out(&mut self) {
        self.username = None;
    }

    /// Returns the dataset, seeding it from the default template if absent.
    pub fn data_or_seed(&mut self) -> &mut SessionData {
        self.todo_lists.get_or_insert_with(SessionData::seeded)
    }
}

/// Todo lists plus the id counter used to mint fresh ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub lists: Vec<TodoList>,
    /// Next id handed out for a list or a todo. Monotonic per session.
    pub next_id: i64,
}

impl SessionData {
    /// Builds a dataset from `lists`, placing the id counter above every
    /// list and todo id already present.
    pub fn from_lists(lists: Vec<TodoList>) -> Self {
        let highest = lists
            .iter()
            .flat_map(|list| std::iter::once(list.id).chain(list.todos.iter().map(|todo| todo.id)))
            .max()
            .unwrap_or(0);
        Self {
            lists,
            next_id: highest + 1,
        }
    }

    /// Fresh copy of the default seed data.
    pub fn seeded() -> Self {
        Self::from_lists(seed_todo_lists())
    }

    pub fn empty() -> Self {
        Self::from_lists(Vec::new())
    }

    pub(crate) fn mint_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn position(&self, list_id: TodoListId) -> Option<usize> {
        self.lists.iter().position(|list| list.id == list_id)
    }

    pub(crate) fn find(&self, list_id: TodoListId) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub(crate) fn find_mut(&mut self, list_id: TodoListId) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionData};
    use crate::model::todo::{Todo, TodoList};

    #[test]
    fn data_or_seed_seeds_once_and_keeps_mutations() {
        let mut session = Session::new();
        assert!(session.todo_lists.is_none());

        let seeded_len = session.data_or_seed().lists.len();
        assert!(seeded_len > 0);

        session.data_or_seed().lists.clear();
        assert!(session.data_or_seed().lists.is_empty());
    }

    #[test]
    fn id_counter_starts_above_existing_ids() {
        let mut list = TodoList::new(4, "Work");
        list.todos.push(Todo::new(9, "Ship"));
        let mut data = SessionData::from_lists(vec![list]);

        assert_eq!(data.mint_id(), 10);
        assert_eq!(data.mint_id(), 11);
        assert_eq!(SessionData::empty().next_id, 1);
    }

    #[test]
    fn sign_in_and_out_only_touch_username() {
        let mut session = Session::signed_in("admin");
        session.data_or_seed();
        session.sign_out();
        assert!(!session.is_signed_in());
        assert!(session.todo_lists.is_some());
        session.sign_in("developer");
        assert_eq!(session.username.as_deref(), Some("developer"));
    }
}
