//! SQLite-backed storage gateway for todo items.
//!
//! # Design
//! `TodoStore` wraps the connection pool and is the router state. Each
//! request gets its own `TodoContext`, a small unit of work: reads go
//! straight to the pool, while `add`/`update`/`remove` only queue changes
//! that `commit` applies inside one transaction. A queued update or delete
//! that matches zero rows means the record vanished after it was read; the
//! commit stops with `ConcurrencyConflict` and the transaction rolls back
//! when it is dropped.

use std::convert::Infallible;
use std::str::FromStr;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{NewTodoItem, TodoItem};

const SCHEMA: &str = include_str!("../migrations/001_create_todo_items.sql");

/// Shared handle to the todo item table.
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Open (creating if missing) the database named by `config.database_url`.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(StoreError::persistence("parse DATABASE_URL"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::persistence("connect"))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Private in-memory database, used by tests.
    ///
    /// Every SQLite connection gets its own in-memory database, so the pool
    /// is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::persistence("parse in-memory options"))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::persistence("connect"))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(StoreError::persistence("CREATE TABLE TodoItems"))?;
        Ok(())
    }

    /// Start a new unit of work.
    pub fn context(&self) -> TodoContext {
        TodoContext {
            pool: self.pool.clone(),
            pending: Vec::new(),
            inserts: 0,
        }
    }

    /// Close every pooled connection. Later operations fail with
    /// `StoreError::Persistence`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug)]
enum Change {
    Insert(NewTodoItem),
    Update(TodoItem),
    Delete(i64),
}

/// Ticket for a queued insert, redeemed against the `Committed` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending(usize);

/// Outcome of a successful commit.
#[derive(Debug, Default)]
pub struct Committed {
    inserted: Vec<TodoItem>,
}

impl Committed {
    /// The stored item, with its assigned id, for a queued insert.
    pub fn inserted(&self, pending: Pending) -> Option<&TodoItem> {
        self.inserted.get(pending.0)
    }
}

/// Per-request unit of work over the todo item table.
#[derive(Debug)]
pub struct TodoContext {
    pool: SqlitePool,
    pending: Vec<Change>,
    inserts: usize,
}

impl TodoContext {
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        sqlx::query_as::<_, TodoItem>("SELECT Id, Name, IsComplete FROM TodoItems WHERE Id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::persistence("SELECT TodoItems"))
    }

    /// All items ordered by id.
    pub async fn list_all(&self) -> Result<Vec<TodoItem>, StoreError> {
        sqlx::query_as::<_, TodoItem>("SELECT Id, Name, IsComplete FROM TodoItems ORDER BY Id")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::persistence("SELECT TodoItems"))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM TodoItems WHERE Id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::persistence("SELECT COUNT TodoItems"))?;
        Ok(count > 0)
    }

    pub fn add(&mut self, item: NewTodoItem) -> Pending {
        let ticket = Pending(self.inserts);
        self.inserts += 1;
        self.pending.push(Change::Insert(item));
        ticket
    }

    /// Queue an overwrite of `name` and `is_complete` for an existing row.
    pub fn update(&mut self, item: TodoItem) {
        self.pending.push(Change::Update(item));
    }

    pub fn remove(&mut self, item: &TodoItem) {
        self.pending.push(Change::Delete(item.id));
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every queued change in a single transaction.
    ///
    /// The queue is drained whether or not the commit succeeds.
    pub async fn commit(&mut self) -> Result<Committed, StoreError> {
        let pending = std::mem::take(&mut self.pending);
        self.inserts = 0;
        if pending.is_empty() {
            return Ok(Committed::default());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::persistence("BEGIN"))?;
        let mut inserted = Vec::new();

        for change in pending {
            match change {
                Change::Insert(item) => {
                    let result =
                        sqlx::query("INSERT INTO TodoItems (Name, IsComplete) VALUES (?, ?)")
                            .bind(&item.name)
                            .bind(item.is_complete)
                            .execute(&mut *tx)
                            .await
                            .map_err(StoreError::persistence("INSERT TodoItems"))?;
                    inserted.push(TodoItem {
                        id: result.last_insert_rowid(),
                        name: item.name,
                        is_complete: item.is_complete,
                    });
                }
                Change::Update(item) => {
                    let result =
                        sqlx::query("UPDATE TodoItems SET Name = ?, IsComplete = ? WHERE Id = ?")
                            .bind(&item.name)
                            .bind(item.is_complete)
                            .bind(item.id)
                            .execute(&mut *tx)
                            .await
                            .map_err(StoreError::persistence("UPDATE TodoItems"))?;
                    if result.rows_affected() == 0 {
                        return Err(StoreError::ConcurrencyConflict { id: item.id });
                    }
                }
                Change::Delete(id) => {
                    let result = sqlx::query("DELETE FROM TodoItems WHERE Id = ?")
                        .bind(id)
                        .execute(&mut *tx)
                        .await
                        .map_err(StoreError::persistence("DELETE TodoItems"))?;
                    if result.rows_affected() == 0 {
                        return Err(StoreError::ConcurrencyConflict { id });
                    }
                }
            }
        }

        tx.commit()
            .await
            .map_err(StoreError::persistence("COMMIT"))?;
        Ok(Committed { inserted })
    }
}

impl<S> FromRequestParts<S> for TodoContext
where
    TodoStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(TodoStore::from_ref(state).context())
    }
}
