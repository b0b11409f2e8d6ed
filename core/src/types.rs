//! Client-side DTOs for the todo item API.
//!
//! # Design
//! These mirror the server's JSON shape (camelCase `id`, `name`,
//! `isComplete`) but are defined independently of the server crate. The
//! integration test against a live server catches schema drift.

use serde::{Deserialize, Serialize};

/// A todo item as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

/// Request payload for creating a todo item. The server assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoItem {
    pub name: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

/// Result of a successful create: the stored item and the `Location` the
/// server reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub item: TodoItem,
    pub location: Option<String>,
}
