//! Todo item CRUD service.
//!
//! # Overview
//! An axum router over a SQLite table of todo items. `store` is the storage
//! gateway, `handlers` translates HTTP verbs into single-row store calls and
//! maps the outcome to a status code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ConfigError, StoreError};
pub use models::{NewTodoItem, TodoItem, TodoItemView};
pub use store::{TodoContext, TodoStore};

/// Base path of the todo item resource.
pub const TODO_ITEMS_PATH: &str = "/api/todoitems";

pub fn app(store: TodoStore) -> Router {
    Router::new()
        .route(
            TODO_ITEMS_PATH,
            get(handlers::list_todo_items).post(handlers::create_todo_item),
        )
        .route(
            &format!("{TODO_ITEMS_PATH}/{{id}}"),
            get(handlers::get_todo_item)
                .put(handlers::update_todo_item)
                .delete(handlers::delete_todo_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
