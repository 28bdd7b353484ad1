//! Presentation ordering shared by every store.
//!
//! Items are split into not-done and done groups, each group is ordered by
//! case-insensitive title, and the not-done group comes first. Equal titles
//! keep their input order.

use crate::model::todo::{title_key, Todo, TodoList};

/// Anything that can be ordered for display by completion and title.
pub trait Completable {
    fn is_done(&self) -> bool;
    fn title(&self) -> &str;
}

impl Completable for Todo {
    fn is_done(&self) -> bool {
        self.done
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Completable for TodoList {
    fn is_done(&self) -> bool {
        TodoList::is_done(self)
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Returns `items` ordered as `[not-done by title, done by title]`.
pub fn partition_sorted<T: Completable>(items: Vec<T>) -> Vec<T> {
    let (mut undone, mut done): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| !item.is_done());
    sort_by_title(&mut undone);
    sort_by_title(&mut done);
    undone.append(&mut done);
    undone
}

// `sort_by_cached_key` is stable, so equal titles keep input order.
fn sort_by_title<T: Completable>(items: &mut [T]) {
    items.sort_by_cached_key(|item| title_key(item.title()));
}
