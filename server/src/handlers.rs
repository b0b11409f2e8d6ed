//! HTTP handlers for `/api/todoitems`.
//!
//! Each handler logs on entry, on success, and on every failure branch. Not
//! found and id mismatches are warnings; storage failures are errors.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use crate::error::{ApiError, StoreError};
use crate::models::{NewTodoItem, TodoItem, TodoItemView};
use crate::store::TodoContext;
use crate::TODO_ITEMS_PATH;

pub async fn list_todo_items(ctx: TodoContext) -> Result<Json<Vec<TodoItemView>>, ApiError> {
    debug!("list todo items");
    let items = ctx.list_all().await.inspect_err(|e| {
        error!(error = %e, "failed to list todo items");
    })?;
    debug!(count = items.len(), "listed todo items");
    Ok(Json(items.iter().map(TodoItemView::from).collect()))
}

pub async fn get_todo_item(
    Path(id): Path<i64>,
    ctx: TodoContext,
) -> Result<Json<TodoItem>, ApiError> {
    debug!(id, "get todo item");
    match ctx.find_by_id(id).await {
        Ok(Some(item)) => {
            debug!(id, "found todo item");
            Ok(Json(item))
        }
        Ok(None) => {
            warn!(id, "todo item not found");
            Err(ApiError::NotFound { id })
        }
        Err(e) => {
            error!(id, error = %e, "failed to load todo item");
            Err(e.into())
        }
    }
}

pub async fn create_todo_item(
    mut ctx: TodoContext,
    Json(input): Json<TodoItemView>,
) -> Result<Response, ApiError> {
    debug!("create todo item");
    let name = input.name.clone();
    let is_complete = input.is_complete;

    let ticket = ctx.add(NewTodoItem::from(input));
    let committed = ctx.commit().await.inspect_err(|e| {
        error!(name = ?name, is_complete, error = %e, "failed to create todo item");
    })?;
    let item = committed.inserted(ticket).ok_or_else(|| {
        error!(name = ?name, is_complete, "commit did not report the inserted row");
        ApiError::Store(StoreError::Persistence {
            operation: "INSERT TodoItems",
            source: sqlx::Error::RowNotFound,
        })
    })?;

    debug!(id = item.id, "created todo item");
    let location = format!("{TODO_ITEMS_PATH}/{}", item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TodoItemView::from(item)),
    )
        .into_response())
}

pub async fn update_todo_item(
    Path(id): Path<i64>,
    mut ctx: TodoContext,
    Json(input): Json<TodoItemView>,
) -> Result<StatusCode, ApiError> {
    debug!(id, "update todo item");

    if id != input.id {
        warn!(id, body_id = input.id, "route id does not match body id");
        return Err(ApiError::IdMismatch {
            route_id: id,
            body_id: input.id,
        });
    }

    let found = ctx.find_by_id(id).await.inspect_err(|e| {
        error!(id, error = %e, "failed to load todo item for update");
    })?;
    let Some(mut item) = found else {
        warn!(id, "todo item to update not found");
        return Err(ApiError::NotFound { id });
    };

    item.name = input.name;
    item.is_complete = input.is_complete;
    ctx.update(item);

    match ctx.commit().await {
        Ok(_) => {
            debug!(id, "updated todo item");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::ConcurrencyConflict { .. }) => resolve_update_conflict(&ctx, id).await,
        Err(e) => {
            error!(id, error = %e, "failed to update todo item");
            Err(e.into())
        }
    }
}

/// Decide what a conflicting update means: the row is gone (404) or it was
/// changed underneath us (409).
async fn resolve_update_conflict(ctx: &TodoContext, id: i64) -> Result<StatusCode, ApiError> {
    let exists = todo_item_exists(ctx, id).await?;
    if exists {
        error!(id, "todo item changed concurrently during update");
        Err(ApiError::Conflict { id })
    } else {
        warn!(id, "todo item deleted concurrently during update");
        Err(ApiError::NotFound { id })
    }
}

async fn todo_item_exists(ctx: &TodoContext, id: i64) -> Result<bool, StoreError> {
    debug!(id, "check todo item exists");
    ctx.exists(id).await.inspect_err(|e| {
        error!(id, error = %e, "failed to check todo item existence");
    })
}

pub async fn delete_todo_item(
    Path(id): Path<i64>,
    mut ctx: TodoContext,
) -> Result<Json<TodoItem>, ApiError> {
    debug!(id, "delete todo item");

    let found = ctx.find_by_id(id).await.inspect_err(|e| {
        error!(id, error = %e, "failed to load todo item for delete");
    })?;
    let Some(item) = found else {
        warn!(id, "todo item to delete not found");
        return Err(ApiError::NotFound { id });
    };

    ctx.remove(&item);
    match ctx.commit().await {
        Ok(_) => {
            debug!(id, "deleted todo item");
            Ok(Json(item))
        }
        Err(StoreError::ConcurrencyConflict { .. }) => {
            warn!(id, "todo item already deleted");
            Err(ApiError::NotFound { id })
        }
        Err(e) => {
            error!(id, error = %e, "failed to delete todo item");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TodoStore;

    async fn seeded_store() -> (TodoStore, i64) {
        let store = TodoStore::in_memory().await.unwrap();
        let mut ctx = store.context();
        let ticket = ctx.add(NewTodoItem {
            name: Some("seed".to_string()),
            is_complete: false,
        });
        let id = ctx.commit().await.unwrap().inserted(ticket).unwrap().id;
        (store, id)
    }

    #[tokio::test]
    async fn conflict_on_vanished_row_is_not_found() {
        let (store, id) = seeded_store().await;
        let mut ctx = store.context();
        let item = ctx.find_by_id(id).await.unwrap().unwrap();
        ctx.remove(&item);
        ctx.commit().await.unwrap();

        let err = resolve_update_conflict(&store.context(), id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { id: missing } if missing == id));
    }

    #[tokio::test]
    async fn conflict_on_present_row_is_conflict() {
        let (store, id) = seeded_store().await;
        let err = resolve_update_conflict(&store.context(), id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn failed_existence_check_propagates() {
        let (store, id) = seeded_store().await;
        store.close().await;
        let err = resolve_update_conflict(&store.context(), id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
