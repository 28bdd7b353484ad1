//! Domain model for todo lists and their items.
//!
//! # Responsibility
//! - Define the typed records every store produces and consumes.
//! - Own the list-level "done" predicate and title validation rules.
//!
//! # Invariants
//! - Ids are assigned by stores, never by callers.
//! - A list is done only when it has todos and all of them are done.

pub mod todo;
