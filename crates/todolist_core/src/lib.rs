//! Data-access core for the todo-list application.
//!
//! Two interchangeable stores implement [`TodoStore`]: [`SqliteTodoStore`]
//! persists per-user data in SQLite, [`SessionTodoStore`] keeps a seeded
//! dataset inside one [`Session`].

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod session;
pub mod sort;
pub mod store;

pub use auth::{
    Argon2Credentials, CredentialError, CredentialHasher, CredentialVerifier, SqliteUserDirectory,
};
pub use config::{ConfigError, CoreConfig, StoreBackend};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::todo::{
    title_key, validate_title, TitleValidationError, Todo, TodoId, TodoList, TodoListId,
    MAX_TITLE_CHARS,
};
pub use service::todo_service::{ServiceError, ServiceResult, TodoListDetail, TodoService};
pub use session::{Session, SessionData};
pub use sort::{partition_sorted, Completable};
pub use store::{
    Authenticator, SessionTodoStore, SqliteTodoStore, StoreError, StoreResult, TodoStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
