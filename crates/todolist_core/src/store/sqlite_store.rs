//! SQLite-backed todo store.
//!
//! # Responsibility
//! - Run fixed, parameterized statements against `todolists`/`todos`.
//! - Assemble typed records from rows and order them for display.
//!
//! # Invariants
//! - Every statement filters on the store's `username`.
//! - Rows are read in id order and sorted in memory, so ordering matches the
//!   session store exactly.
//! - Unique violations on list titles become `Ok(false)`.

use crate::auth::{Argon2Credentials, CredentialVerifier, SqliteUserDirectory};
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::session::Session;
use crate::sort::partition_sorted;
use crate::store::{log_mutation, Authenticator, StoreError, StoreResult, TodoStore};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const BACKEND: &str = "sqlite";

const TODO_SELECT_SQL: &str = "SELECT id, title, done, todolist_id FROM todos";

/// Todo store over a migrated SQLite connection, scoped to one user.
pub struct SqliteTodoStore<'conn> {
    conn: &'conn Connection,
    username: String,
    verifier: Box<dyn CredentialVerifier + 'conn>,
}

impl<'conn> SqliteTodoStore<'conn> {
    /// Creates a store scoped to `username`.
    ///
    /// `conn` must come from [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`] so the schema is in place.
    pub fn new(conn: &'conn Connection, username: impl Into<String>) -> Self {
        Self {
            conn,
            username: username.into(),
            verifier: Box::new(Argon2Credentials),
        }
    }

    /// Creates a store scoped to the session's signed-in user.
    pub fn from_session(conn: &'conn Connection, session: &Session) -> StoreResult<Self> {
        let username = session
            .username
            .as_deref()
            .ok_or(StoreError::Unauthenticated)?;
        Ok(Self::new(conn, username))
    }

    /// Replaces the credential verifier used by [`Authenticator`].
    pub fn with_verifier(mut self, verifier: impl CredentialVerifier + 'conn) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn list_exists(&self, list_id: TodoListId) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM todolists WHERE id = ?1 AND username = ?2
            );",
            params![list_id, self.username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn todos_of_list(&self, list_id: TodoListId) -> StoreResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1 AND username = ?2
             ORDER BY id;"
        ))?;
        let mut rows = stmt.query(params![list_id, self.username])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    /// Runs a statement that may hit the `UNIQUE (username, title)` index.
    fn execute_title_write(
        &self,
        event: &str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Option<usize>> {
        match self.conn.execute(sql, params) {
            Ok(changed) => Ok(Some(changed)),
            Err(err) => {
                let err = StoreError::from(err);
                if self.is_unique_constraint_violation(&err) {
                    warn!(
                        "event={event} module=store backend={BACKEND} status=rejected reason=duplicate_title"
                    );
                    return Ok(None);
                }
                Err(err)
            }
        }
    }
}

impl TodoStore for SqliteTodoStore<'_> {
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        let mut list_stmt = self.conn.prepare(
            "SELECT id, title FROM todolists
             WHERE username = ?1
             ORDER BY id;",
        )?;
        let mut lists = Vec::new();
        let mut rows = list_stmt.query([self.username.as_str()])?;
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }

        let mut todo_stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE username = ?1
             ORDER BY id;"
        ))?;
        let mut todos_by_list: HashMap<TodoListId, Vec<Todo>> = HashMap::new();
        let mut rows = todo_stmt.query([self.username.as_str()])?;
        while let Some(row) = rows.next()? {
            let list_id: TodoListId = row.get("todolist_id")?;
            todos_by_list
                .entry(list_id)
                .or_default()
                .push(parse_todo_row(row)?);
        }

        for list in &mut lists {
            list.todos = todos_by_list.remove(&list.id).unwrap_or_default();
        }

        debug!(
            "event=todolists_load module=store backend={BACKEND} status=ok count={}",
            lists.len()
        );
        Ok(partition_sorted(lists))
    }

    fn load_todo_list(&self, list_id: TodoListId) -> StoreResult<Option<TodoList>> {
        let list = self
            .conn
            .query_row(
                "SELECT id, title FROM todolists WHERE id = ?1 AND username = ?2;",
                params![list_id, self.username],
                |row| Ok((row.get::<_, TodoListId>("id")?, row.get::<_, String>("title")?)),
            )
            .optional()?;

        let Some((id, title)) = list else {
            return Ok(None);
        };

        Ok(Some(TodoList {
            id,
            title,
            todos: self.todos_of_list(id)?,
        }))
    }

    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>> {
        Ok(partition_sorted(self.todos_of_list(list.id)?))
    }

    fn load_todo(&self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;"
        ))?;
        let mut rows = stmt.query(params![list_id, todo_id, self.username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn toggle_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos SET done = NOT done
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![list_id, todo_id, self.username],
        )?;
        let toggled = changed > 0;
        log_mutation(
            BACKEND,
            "todo_toggle",
            toggled,
            &format!("list_id={list_id} todo_id={todo_id}"),
        );
        Ok(toggled)
    }

    fn delete_todo(&mut self, list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todos
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![list_id, todo_id, self.username],
        )?;
        let deleted = changed > 0;
        log_mutation(
            BACKEND,
            "todo_delete",
            deleted,
            &format!("list_id={list_id} todo_id={todo_id}"),
        );
        Ok(deleted)
    }

    fn complete_all_todos(&mut self, list_id: TodoListId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos SET done = 1
             WHERE todolist_id = ?1 AND username = ?2 AND done = 0;",
            params![list_id, self.username],
        )?;
        let existed = changed > 0 || self.list_exists(list_id)?;
        log_mutation(
            BACKEND,
            "todos_complete_all",
            existed,
            &format!("list_id={list_id} changed={changed}"),
        );
        Ok(existed)
    }

    fn add_todo(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool> {
        // Inserting through a SELECT on the owner's list makes a missing or
        // foreign list insert nothing.
        let changed = self.conn.execute(
            "INSERT INTO todos (title, todolist_id, username)
             SELECT ?1, id, username FROM todolists
             WHERE id = ?2 AND username = ?3;",
            params![title, list_id, self.username],
        )?;
        let added = changed > 0;
        log_mutation(BACKEND, "todo_add", added, &format!("list_id={list_id}"));
        Ok(added)
    }

    fn delete_todo_list(&mut self, list_id: TodoListId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todolists WHERE id = ?1 AND username = ?2;",
            params![list_id, self.username],
        )?;
        let deleted = changed > 0;
        if deleted {
            // No-op when the foreign key cascade already removed them.
            self.conn.execute(
                "DELETE FROM todos WHERE todolist_id = ?1 AND username = ?2;",
                params![list_id, self.username],
            )?;
        }
        log_mutation(
            BACKEND,
            "todolist_delete",
            deleted,
            &format!("list_id={list_id}"),
        );
        Ok(deleted)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM todolists
                WHERE title = ?1 COLLATE BINARY AND username = ?2
            );",
            params![title, self.username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn edit_todo_list_title(&mut self, list_id: TodoListId, title: &str) -> StoreResult<bool> {
        let changed = self.execute_title_write(
            "todolist_rename",
            "UPDATE todolists SET title = ?1 WHERE id = ?2 AND username = ?3;",
            params![title, list_id, self.username],
        )?;
        let renamed = changed.is_some_and(|rows| rows > 0);
        log_mutation(
            BACKEND,
            "todolist_rename",
            renamed,
            &format!("list_id={list_id}"),
        );
        Ok(renamed)
    }

    fn add_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        let changed = self.execute_title_write(
            "todolist_add",
            "INSERT INTO todolists (title, username) VALUES (?1, ?2);",
            params![title, self.username],
        )?;
        let added = changed.is_some_and(|rows| rows > 0);
        if added {
            log_mutation(
                BACKEND,
                "todolist_add",
                true,
                &format!("list_id={}", self.conn.last_insert_rowid()),
            );
        }
        Ok(added)
    }

    fn is_unique_constraint_violation(&self, error: &StoreError) -> bool {
        match error {
            StoreError::Db(err) => err.is_unique_violation(),
            _ => false,
        }
    }
}

impl Authenticator for SqliteTodoStore<'_> {
    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        let Some(stored_hash) = SqliteUserDirectory::new(self.conn).password_hash(username)?
        else {
            debug!("event=authenticate module=store backend={BACKEND} status=unknown_user");
            return Ok(false);
        };
        let accepted = self.verifier.verify(password, &stored_hash)?;
        debug!(
            "event=authenticate module=store backend={BACKEND} status={}",
            if accepted { "ok" } else { "rejected" }
        );
        Ok(accepted)
    }
}

fn parse_list_row(row: &Row<'_>) -> StoreResult<TodoList> {
    Ok(TodoList::new(row.get("id")?, row.get::<_, String>("title")?))
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        done,
    })
}
