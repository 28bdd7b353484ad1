use todolist_core::db::open_db_in_memory;
use todolist_core::{
    ServiceError, Session, SessionData, SessionTodoStore, SqliteTodoStore, TitleValidationError,
    TodoService, TodoStore,
};

fn list_id<S: TodoStore>(service: &TodoService<S>, title: &str) -> i64 {
    service
        .todo_lists()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .map(|list| list.id)
        .unwrap()
}

#[test]
fn create_todo_list_validates_and_trims_title() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(SqliteTodoStore::new(&conn, "admin"));

    service.create_todo_list("  Groceries  ").unwrap();
    assert!(service.store().exists_todo_list_title("Groceries").unwrap());

    let err = service.create_todo_list("   ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTitle(TitleValidationError::Empty)
    ));

    let err = service.create_todo_list(&"x".repeat(101)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTitle(TitleValidationError::TooLong { .. })
    ));
}

#[test]
fn create_todo_list_reports_duplicates_on_both_backends() {
    let conn = open_db_in_memory().unwrap();
    let mut sqlite = TodoService::new(SqliteTodoStore::new(&conn, "admin"));
    sqlite.create_todo_list("Groceries").unwrap();
    assert!(matches!(
        sqlite.create_todo_list("Groceries").unwrap_err(),
        ServiceError::DuplicateTitle(_)
    ));
    assert!(matches!(
        sqlite.create_todo_list("groceries").unwrap_err(),
        ServiceError::DuplicateTitle(_)
    ));

    let mut session = Session::signed_in("admin");
    let mut memory = TodoService::new(SessionTodoStore::new(&mut session));
    assert!(matches!(
        memory.create_todo_list("work todos").unwrap_err(),
        ServiceError::DuplicateTitle(_)
    ));
}

#[test]
fn rename_distinguishes_missing_list_from_taken_title() {
    let mut session = Session {
        username: Some("admin".to_string()),
        todo_lists: Some(SessionData::empty()),
    };
    let mut service = TodoService::new(SessionTodoStore::new(&mut session));
    service.create_todo_list("Work").unwrap();
    service.create_todo_list("Home").unwrap();
    let work = list_id(&service, "Work");

    assert!(matches!(
        service.rename_todo_list(work, "Home").unwrap_err(),
        ServiceError::DuplicateTitle(_)
    ));
    assert!(matches!(
        service.rename_todo_list(4_242, "Elsewhere").unwrap_err(),
        ServiceError::ListNotFound(4_242)
    ));
    service.rename_todo_list(work, " Office ").unwrap();
    assert_eq!(service.todo_list_detail(work).unwrap().list.title, "Office");
}

#[test]
fn detail_reports_sorted_todos_and_completion() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(SqliteTodoStore::new(&conn, "admin"));
    service.create_todo_list("Groceries").unwrap();
    let groceries = list_id(&service, "Groceries");
    service.add_todo(groceries, "Milk").unwrap();
    service.add_todo(groceries, "apples").unwrap();

    let detail = service.todo_list_detail(groceries).unwrap();
    let titles: Vec<&str> = detail.todos.iter().map(|todo| todo.title.as_str()).collect();
    assert_eq!(titles, vec!["apples", "Milk"]);
    assert!(detail.has_undone);
    assert!(!detail.is_done);

    service.complete_all_todos(groceries).unwrap();
    let detail = service.todo_list_detail(groceries).unwrap();
    assert!(detail.is_done);
    assert!(!detail.has_undone);
}

#[test]
fn toggle_returns_new_state_and_missing_targets_are_errors() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(SqliteTodoStore::new(&conn, "admin"));
    service.create_todo_list("Chores").unwrap();
    let chores = list_id(&service, "Chores");
    service.add_todo(chores, "Sweep").unwrap();
    let sweep = service.todo_list_detail(chores).unwrap().todos[0].id;

    assert!(service.toggle_todo(chores, sweep).unwrap().done);
    assert!(!service.toggle_todo(chores, sweep).unwrap().done);

    assert!(matches!(
        service.toggle_todo(chores, sweep + 50).unwrap_err(),
        ServiceError::TodoNotFound { .. }
    ));
    assert!(matches!(
        service.add_todo(chores + 50, "Nowhere").unwrap_err(),
        ServiceError::ListNotFound(_)
    ));
    assert!(matches!(
        service.add_todo(chores, "").unwrap_err(),
        ServiceError::InvalidTitle(_)
    ));

    service.delete_todo(chores, sweep).unwrap();
    assert!(matches!(
        service.delete_todo(chores, sweep).unwrap_err(),
        ServiceError::TodoNotFound { .. }
    ));

    service.delete_todo_list(chores).unwrap();
    assert!(matches!(
        service.todo_list_detail(chores).unwrap_err(),
        ServiceError::ListNotFound(_)
    ));
    assert!(matches!(
        service.complete_all_todos(chores).unwrap_err(),
        ServiceError::ListNotFound(_)
    ));
}

#[test]
fn service_error_messages_are_readable() {
    let err = ServiceError::DuplicateTitle("Work".to_string());
    assert_eq!(err.to_string(), "the list title must be unique: `Work`");

    let err = ServiceError::TodoNotFound {
        list_id: 3,
        todo_id: 9,
    };
    assert_eq!(err.to_string(), "todo not found: 9 in list 3");
}
