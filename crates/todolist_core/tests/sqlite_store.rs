use rusqlite::Connection;
use todolist_core::db::open_db_in_memory;
use todolist_core::{Session, SqliteTodoStore, StoreError, TodoList, TodoStore};

fn add_list(store: &mut SqliteTodoStore<'_>, title: &str) -> i64 {
    assert!(store.add_todo_list(title).unwrap());
    store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .map(|list| list.id)
        .unwrap()
}

fn todo_id(store: &SqliteTodoStore<'_>, list_id: i64, title: &str) -> i64 {
    let list = store.load_todo_list(list_id).unwrap().unwrap();
    list.todos
        .iter()
        .find(|todo| todo.title == title)
        .map(|todo| todo.id)
        .unwrap()
}

fn titles(lists: &[TodoList]) -> Vec<&str> {
    lists.iter().map(|list| list.title.as_str()).collect()
}

#[test]
fn add_list_then_load_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");

    let list_id = add_list(&mut store, "Groceries");
    assert!(store.add_todo(list_id, "Milk").unwrap());

    let loaded = store.load_todo_list(list_id).unwrap().unwrap();
    assert_eq!(loaded.title, "Groceries");
    assert_eq!(loaded.todos.len(), 1);
    assert_eq!(loaded.todos[0].title, "Milk");
    assert!(!loaded.todos[0].done);
}

#[test]
fn duplicate_title_is_rejected_without_error() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");

    assert!(store.add_todo_list("Groceries").unwrap());
    assert!(store.exists_todo_list_title("Groceries").unwrap());
    assert!(!store.add_todo_list("Groceries").unwrap());
    assert!(!store.add_todo_list("groceries").unwrap());
    assert_eq!(store.sorted_todo_lists().unwrap().len(), 1);
}

#[test]
fn exists_todo_list_title_matches_exact_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    store.add_todo_list("Groceries").unwrap();

    assert!(store.exists_todo_list_title("Groceries").unwrap());
    assert!(!store.exists_todo_list_title("groceries").unwrap());
    assert!(!store.exists_todo_list_title("Hardware").unwrap());
}

#[test]
fn rename_to_taken_title_returns_false_and_keeps_data() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let first = add_list(&mut store, "Work");
    add_list(&mut store, "Home");

    assert!(!store.edit_todo_list_title(first, "HOME").unwrap());
    assert_eq!(store.load_todo_list(first).unwrap().unwrap().title, "Work");

    assert!(store.edit_todo_list_title(first, "Office").unwrap());
    assert_eq!(store.load_todo_list(first).unwrap().unwrap().title, "Office");
    assert!(!store.edit_todo_list_title(9_999, "Elsewhere").unwrap());
}

#[test]
fn unique_violation_is_classified_from_driver_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::new(&conn, "admin");
    conn.execute(
        "INSERT INTO todolists (title, username) VALUES ('Work', 'admin');",
        [],
    )
    .unwrap();

    let raw = conn
        .execute(
            "INSERT INTO todolists (title, username) VALUES ('Work', 'admin');",
            [],
        )
        .unwrap_err();
    assert!(store.is_unique_constraint_violation(&StoreError::from(raw)));

    let other = conn.execute("INSERT INTO missing_table VALUES (1);", []).unwrap_err();
    assert!(!store.is_unique_constraint_violation(&StoreError::from(other)));
    assert!(!store.is_unique_constraint_violation(&StoreError::Unauthenticated));
}

#[test]
fn toggle_and_delete_report_whether_todo_existed() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let list_id = add_list(&mut store, "Chores");
    store.add_todo(list_id, "Sweep").unwrap();
    let sweep = todo_id(&store, list_id, "Sweep");

    assert!(store.toggle_todo(list_id, sweep).unwrap());
    assert!(store.load_todo(list_id, sweep).unwrap().unwrap().done);
    assert!(store.toggle_todo(list_id, sweep).unwrap());
    assert!(!store.load_todo(list_id, sweep).unwrap().unwrap().done);

    assert!(!store.toggle_todo(list_id, sweep + 100).unwrap());
    assert!(!store.toggle_todo(list_id + 100, sweep).unwrap());
    assert!(!store.load_todo(list_id, sweep).unwrap().unwrap().done);

    assert!(store.delete_todo(list_id, sweep).unwrap());
    assert!(!store.delete_todo(list_id, sweep).unwrap());
    assert!(store.load_todo(list_id, sweep).unwrap().is_none());
}

#[test]
fn complete_all_returns_true_for_existing_list_even_without_changes() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let list_id = add_list(&mut store, "Chores");
    store.add_todo(list_id, "Sweep").unwrap();
    store.add_todo(list_id, "Dust").unwrap();
    let dust = todo_id(&store, list_id, "Dust");
    store.toggle_todo(list_id, dust).unwrap();

    assert!(store.complete_all_todos(list_id).unwrap());
    let list = store.load_todo_list(list_id).unwrap().unwrap();
    assert!(list.todos.iter().all(|todo| todo.done));
    assert!(list.is_done());

    assert!(store.complete_all_todos(list_id).unwrap());

    let empty = add_list(&mut store, "Empty");
    assert!(store.complete_all_todos(empty).unwrap());
    assert!(!store.complete_all_todos(9_999).unwrap());
}

#[test]
fn add_todo_to_missing_list_returns_false() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");

    assert!(!store.add_todo(42, "Orphan").unwrap());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn delete_list_removes_its_todos() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let list_id = add_list(&mut store, "Trip");
    store.add_todo(list_id, "Pack").unwrap();
    store.add_todo(list_id, "Book hotel").unwrap();

    assert!(store.delete_todo_list(list_id).unwrap());
    assert!(store.load_todo_list(list_id).unwrap().is_none());
    assert!(!store.delete_todo_list(list_id).unwrap());

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM todos WHERE todolist_id = ?1;",
            [list_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn lists_are_partitioned_by_done_and_sorted_by_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let zulu = add_list(&mut store, "zulu");
    add_list(&mut store, "Alpha");
    let bravo = add_list(&mut store, "bravo");
    let charlie = add_list(&mut store, "Charlie");

    store.add_todo(bravo, "only").unwrap();
    store.complete_all_todos(bravo).unwrap();
    store.add_todo(zulu, "open").unwrap();
    store.add_todo(charlie, "finished").unwrap();
    store.complete_all_todos(charlie).unwrap();

    let sorted = store.sorted_todo_lists().unwrap();
    assert_eq!(titles(&sorted), vec!["Alpha", "zulu", "bravo", "Charlie"]);
    assert_eq!(sorted[1].todos.len(), 1);
}

#[test]
fn sorted_todos_orders_by_done_then_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoStore::new(&conn, "admin");
    let list_id = add_list(&mut store, "Groceries");
    store.add_todo(list_id, "Milk").unwrap();
    store.add_todo(list_id, "apples").unwrap();
    store.add_todo(list_id, "Bread").unwrap();
    let bread = todo_id(&store, list_id, "Bread");
    store.toggle_todo(list_id, bread).unwrap();

    let list = store.load_todo_list(list_id).unwrap().unwrap();
    let sorted: Vec<String> = store
        .sorted_todos(&list)
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect();
    assert_eq!(sorted, vec!["apples", "Milk", "Bread"]);
    assert!(store.has_undone_todos(&list));
}

#[test]
fn users_cannot_see_or_touch_each_others_data() {
    let conn = open_db_in_memory().unwrap();
    let mut alice = SqliteTodoStore::new(&conn, "alice");
    let list_id = add_list(&mut alice, "Secret");
    alice.add_todo(list_id, "Hide").unwrap();
    let hide = todo_id(&alice, list_id, "Hide");

    let mut bob = SqliteTodoStore::new(&conn, "bob");
    assert!(bob.sorted_todo_lists().unwrap().is_empty());
    assert!(bob.load_todo_list(list_id).unwrap().is_none());
    assert!(bob.load_todo(list_id, hide).unwrap().is_none());
    assert!(!bob.toggle_todo(list_id, hide).unwrap());
    assert!(!bob.delete_todo(list_id, hide).unwrap());
    assert!(!bob.add_todo(list_id, "Intrude").unwrap());
    assert!(!bob.complete_all_todos(list_id).unwrap());
    assert!(!bob.edit_todo_list_title(list_id, "Mine").unwrap());
    assert!(!bob.delete_todo_list(list_id).unwrap());
    assert!(!bob.exists_todo_list_title("Secret").unwrap());

    assert!(bob.add_todo_list("Secret").unwrap());

    let list = alice.load_todo_list(list_id).unwrap().unwrap();
    assert_eq!(list.title, "Secret");
    assert_eq!(list.todos.len(), 1);
    assert!(!list.todos[0].done);
}

#[test]
fn from_session_requires_signed_in_user() {
    let conn = open_db_in_memory().unwrap();

    let err = SqliteTodoStore::from_session(&conn, &Session::new())
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Unauthenticated));

    let store = SqliteTodoStore::from_session(&conn, &Session::signed_in("admin")).unwrap();
    assert_eq!(store.username(), "admin");
}

#[test]
fn invalid_done_value_is_reported_as_invalid_data() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todolists (id INTEGER PRIMARY KEY, title TEXT, username TEXT);
         CREATE TABLE todos (id INTEGER PRIMARY KEY, title TEXT, done INTEGER,
                             todolist_id INTEGER, username TEXT);
         INSERT INTO todolists (id, title, username) VALUES (1, 'Broken', 'admin');
         INSERT INTO todos (id, title, done, todolist_id, username)
             VALUES (1, 'Bad', 7, 1, 'admin');",
    )
    .unwrap();
    let store = SqliteTodoStore::new(&conn, "admin");

    let err = store.load_todo_list(1).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
