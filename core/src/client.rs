//! Stateless HTTP request builder and response parser for the todo item API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Update answers 204 with no body; delete
//! answers 200 with the removed item.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Created, NewTodoItem, TodoItem};

const RESOURCE: &str = "/api/todoitems";

/// Synchronous, stateless client for the todo item API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection(&self) -> String {
        format!("{}{RESOURCE}", self.base_url)
    }

    fn member(&self, id: i64) -> String {
        format!("{}{RESOURCE}/{id}", self.base_url)
    }

    pub fn build_list_todo_items(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_todo_item(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.member(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo_item(&self, input: &NewTodoItem) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection(),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    /// The route id is taken from `item.id`, so the two always agree.
    pub fn build_update_todo_item(&self, item: &TodoItem) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.member(item.id),
            headers: json_headers(),
            body: Some(to_json(item)?),
        })
    }

    pub fn build_delete_todo_item(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.member(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todo_items(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_todo_item(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_todo_item(&self, response: HttpResponse) -> Result<Created, ApiError> {
        check_status(&response, 201)?;
        let location = response.header("location").map(str::to_string);
        let item = from_json(&response.body)?;
        Ok(Created { item, location })
    }

    pub fn parse_update_todo_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_delete_todo_item(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the matching `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let body = response.body.clone();
    Err(match response.status {
        404 => ApiError::NotFound,
        400 => ApiError::BadRequest { body },
        409 => ApiError::Conflict { body },
        status => ApiError::HttpError { status, body },
    })
}
