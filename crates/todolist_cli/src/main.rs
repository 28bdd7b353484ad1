//! `todolist` command-line front end.
//!
//! # Responsibility
//! - Load config, boot logging and open the configured store.
//! - Map each subcommand to one `TodoService` use-case and print plain text.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use todolist_core::db::open_db;
use todolist_core::{
    init_logging_from_config, Authenticator, CoreConfig, Session, SessionTodoStore,
    SqliteTodoStore, SqliteUserDirectory, StoreBackend, Todo, TodoList, TodoListId, TodoService,
    TodoStore,
};

#[derive(Parser, Debug)]
#[command(name = "todolist", version, about = "Manage per-user todo lists")]
struct Cli {
    /// TOML config file; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overrides `database_path` from config
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Acting user for list commands
    #[arg(long, short = 'u', global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account
    Register { username: String, password: String },
    /// Check a username/password pair
    Login { username: String, password: String },
    /// Show all lists, open lists first
    Lists,
    /// Show one list with its todos
    Show { list_id: TodoListId },
    /// Create a list
    AddList { title: String },
    /// Rename a list
    RenameList { list_id: TodoListId, title: String },
    /// Delete a list and its todos
    DeleteList { list_id: TodoListId },
    /// Append a todo to a list
    AddTodo { list_id: TodoListId, title: String },
    /// Flip one todo between done and open
    Toggle { list_id: TodoListId, todo_id: i64 },
    /// Remove one todo
    DeleteTodo { list_id: TodoListId, todo_id: i64 },
    /// Mark every todo of a list done
    CompleteAll { list_id: TodoListId },
    /// Print the seeded in-memory dataset a new session starts with
    DemoSession,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging_from_config(&config).context("failed to start logging")?;
    info!(
        "event=cli_start module=cli status=ok backend={:?}",
        config.backend
    );

    if matches!(cli.command, Commands::DemoSession) || config.backend == StoreBackend::Session {
        return run_session(cli.user, cli.command);
    }

    let path = config
        .database_path
        .as_ref()
        .context("no database path configured")?;
    let conn =
        open_db(path).with_context(|| format!("failed to open database {}", path.display()))?;

    match cli.command {
        Commands::Register { username, password } => {
            let users = SqliteUserDirectory::new(&conn);
            if users.create_user(&username, &password)? {
                println!("registered {username}");
            } else {
                bail!("user `{username}` already exists");
            }
        }
        Commands::Login { username, password } => {
            let store = SqliteTodoStore::new(&conn, username.as_str());
            if store.authenticate(&username, &password)? {
                println!("signed in as {username}");
            } else {
                bail!("invalid credentials");
            }
        }
        command => {
            let user = require_user(cli.user)?;
            let users = SqliteUserDirectory::new(&conn);
            if !users.user_exists(&user)? {
                bail!("unknown user `{user}`; run `todolist register` first");
            }
            let mut service = TodoService::new(SqliteTodoStore::new(&conn, user));
            run_command(&mut service, command)?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CoreConfig::default(),
    };
    if let Some(database) = cli.database.as_ref() {
        config.database_path = Some(database.clone());
        config.validate()?;
    }
    Ok(config)
}

fn require_user(user: Option<String>) -> Result<String> {
    match user {
        Some(user) if !user.trim().is_empty() => Ok(user),
        _ => bail!("this command needs --user <name>"),
    }
}

/// Runs one command against a throwaway seeded session.
fn run_session(user: Option<String>, command: Commands) -> Result<()> {
    let mut session = Session::signed_in(user.unwrap_or_else(|| "demo".to_string()));
    let mut service = TodoService::new(SessionTodoStore::new(&mut session));
    match command {
        Commands::DemoSession => print_lists(&service.todo_lists()?),
        Commands::Register { .. } | Commands::Login { .. } => {
            bail!("accounts need the sqlite backend")
        }
        command => run_command(&mut service, command)?,
    }
    Ok(())
}

fn run_command<S: TodoStore>(service: &mut TodoService<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Lists => print_lists(&service.todo_lists()?),
        Commands::Show { list_id } => {
            let detail = service.todo_list_detail(list_id)?;
            let state = if detail.is_done { "done" } else { "open" };
            println!("[{}] {} ({state})", detail.list.id, detail.list.title);
            if detail.todos.is_empty() {
                println!("  (no todos)");
            }
            for todo in &detail.todos {
                print_todo(todo);
            }
        }
        Commands::AddList { title } => {
            service.create_todo_list(&title)?;
            println!("list created");
        }
        Commands::RenameList { list_id, title } => {
            service.rename_todo_list(list_id, &title)?;
            println!("list {list_id} renamed");
        }
        Commands::DeleteList { list_id } => {
            service.delete_todo_list(list_id)?;
            println!("list {list_id} deleted");
        }
        Commands::AddTodo { list_id, title } => {
            service.add_todo(list_id, &title)?;
            println!("todo added to list {list_id}");
        }
        Commands::Toggle { list_id, todo_id } => {
            let todo = service.toggle_todo(list_id, todo_id)?;
            print_todo(&todo);
        }
        Commands::DeleteTodo { list_id, todo_id } => {
            service.delete_todo(list_id, todo_id)?;
            println!("todo {todo_id} deleted");
        }
        Commands::CompleteAll { list_id } => {
            service.complete_all_todos(list_id)?;
            println!("all todos in list {list_id} marked done");
        }
        Commands::Register { .. } | Commands::Login { .. } | Commands::DemoSession => {
            bail!("command is not a list operation")
        }
    }
    Ok(())
}

fn print_lists(lists: &[TodoList]) {
    if lists.is_empty() {
        println!("(no lists)");
    }
    for list in lists {
        let mark = if list.is_done() { 'x' } else { ' ' };
        println!(
            "[{mark}] {:>4}  {}  {}/{}",
            list.id,
            list.title,
            list.done_count(),
            list.todos.len()
        );
    }
}

fn print_todo(todo: &Todo) {
    let mark = if todo.done { 'x' } else { ' ' };
    println!("  [{mark}] {:>4}  {}", todo.id, todo.title);
}
