//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the endpoint configuration and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` executes the round-trip in between, keeping
//! this module deterministic and free of I/O.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteTodo, ErrorBody, Todo, TodoListResponse, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    config: ApiConfig,
}

impl TodoClient {
    /// Client with the default paths against `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ApiConfig::new(base_url))
    }

    pub fn with_config(mut config: ApiConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &self.config.list_path, None)
    }

    pub fn build_create_todo(&self, title: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&CreateTodo {
            title: title.to_string(),
        })?;
        Ok(self.request(HttpMethod::Post, &self.config.create_path, Some(body)))
    }

    pub fn build_update_todo(
        &self,
        id: &str,
        title: Option<&str>,
        completed: bool,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&UpdateTodo {
            id: id.to_string(),
            title: title.map(str::to_string),
            completed,
        })?;
        Ok(self.request(HttpMethod::Put, &self.config.update_path, Some(body)))
    }

    pub fn build_delete_todo(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&DeleteTodo { id: id.to_string() })?;
        Ok(self.request(HttpMethod::Delete, &self.config.delete_path, Some(body)))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        serde_json::from_str::<TodoListResponse>(&response.body)
            .map(TodoListResponse::into_todos)
            .map_err(|_| ApiError::DecodingFailed)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode_todo(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode_todo(&response.body)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}/{}", self.config.base_url, path.trim_start_matches('/')),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

fn decode_todo(body: &str) -> Result<Todo, ApiError> {
    serde_json::from_str(body).map_err(|_| ApiError::DecodingFailed)
}

/// Map a response status onto success or the appropriate `ApiError`.
///
/// Error bodies are read best-effort: anything that is not `{message}` falls
/// back to a status-derived message rather than a decoding error.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if !(100..=599).contains(&response.status) {
        return Err(ApiError::InvalidResponse);
    }
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("Request failed with status {}.", response.status));
    Err(ApiError::ServerMessage(message))
}
