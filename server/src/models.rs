//! Persisted record and API boundary shapes.
//!
//! # Design
//! `TodoItem` maps one row of the `TodoItems` table. `TodoItemView` is what
//! list/create/update exchange with callers; it is built fresh from a
//! `TodoItem` and never stored. Field names go over the wire in camelCase,
//! and PascalCase spellings are accepted on input.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A todo item as stored in the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct TodoItem {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "IsComplete")]
    pub is_complete: bool,
}

/// Projection of a `TodoItem` used at the HTTP boundary.
///
/// On create the `id` is ignored; on update it must match the route id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemView {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "IsComplete")]
    pub is_complete: bool,
}

impl From<&TodoItem> for TodoItemView {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            is_complete: item.is_complete,
        }
    }
}

/// Insert payload for the store. The id is assigned on commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodoItem {
    pub name: Option<String>,
    pub is_complete: bool,
}

impl From<TodoItemView> for NewTodoItem {
    fn from(view: TodoItemView) -> Self {
        Self {
            name: view.name,
            is_complete: view.is_complete,
        }
    }
}
