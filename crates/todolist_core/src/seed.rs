//! Default data for new in-memory sessions.
//!
//! The template is built once and never mutated; each session receives its
//! own deep copy.

use crate::model::todo::{Todo, TodoList};
use once_cell::sync::Lazy;

static SEED_TODO_LISTS: Lazy<Vec<TodoList>> = Lazy::new(|| {
    vec![
        seed_list(
            1,
            "Work Todos",
            &[
                (2, "Get coffee", true),
                (3, "Chat with co-workers", true),
                (4, "Duck out of meeting", false),
            ],
        ),
        seed_list(
            5,
            "Home Todos",
            &[
                (6, "Feed the cats", true),
                (7, "Go to bed", true),
                (8, "Buy milk", true),
                (9, "Study for Launch School", true),
            ],
        ),
        seed_list(10, "Additional Todos", &[]),
        seed_list(
            11,
            "social todos",
            &[(12, "Go to Libby's birthday party", false)],
        ),
    ]
});

fn seed_list(id: i64, title: &str, todos: &[(i64, &str, bool)]) -> TodoList {
    TodoList {
        id,
        title: title.to_string(),
        todos: todos
            .iter()
            .map(|(todo_id, todo_title, done)| Todo {
                id: *todo_id,
                title: (*todo_title).to_string(),
                done: *done,
            })
            .collect(),
    }
}

/// Returns a fresh copy of the seed lists.
pub fn seed_todo_lists() -> Vec<TodoList> {
    SEED_TODO_LISTS.clone()
}

#[cfg(test)]
mod tests {
    use super::seed_todo_lists;
    use std::collections::HashSet;

    #[test]
    fn copies_are_independent() {
        let mut first = seed_todo_lists();
        first[0].title = "changed".to_string();
        first[0].todos.clear();

        let second = seed_todo_lists();
        assert_eq!(second[0].title, "Work Todos");
        assert_eq!(second[0].todos.len(), 3);
    }

    #[test]
    fn seed_ids_are_unique() {
        let lists = seed_todo_lists();
        let mut ids = HashSet::new();
        for list in &lists {
            assert!(ids.insert(list.id));
            for todo in &list.todos {
                assert!(ids.insert(todo.id));
            }
        }
    }
}
