//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Ids are opaque server-assigned strings. The client never parses them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum title length, in characters, after trimming.
pub const MAX_TITLE_LEN: usize = 120;

/// A single todo item returned by the API.
///
/// Identity is the `id`; two values with the same id describe the same entity,
/// possibly at different points in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Request payload for `POST /add-todo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Request payload for `PUT /update-todo`. `title` is omitted from the JSON
/// when only the completion flag changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub completed: bool,
}

/// Request payload for `DELETE /delete-todo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodo {
    pub id: String,
}

/// The two list shapes servers are known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TodoListResponse {
    Bare(Vec<Todo>),
    Wrapped { todos: Vec<Todo> },
}

impl TodoListResponse {
    pub fn into_todos(self) -> Vec<Todo> {
        match self {
            TodoListResponse::Bare(todos) | TodoListResponse::Wrapped { todos } => todos,
        }
    }
}

/// Error body some servers attach to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Trim `title` and check it against the title rules, returning the trimmed
/// value.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    Ok(trimmed.to_string())
}
