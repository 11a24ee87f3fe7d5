use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 120;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub id: String,
    pub title: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct DeleteTodo {
    pub id: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    /// `wrapped` returns `{"todos": [...]}` instead of a bare array.
    pub shape: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Todos in insertion order, so lists come back in a stable order.
pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    app_with_todos(Vec::new())
}

/// Router whose store starts out holding `todos`.
pub fn app_with_todos(todos: Vec<Todo>) -> Router {
    let db: Db = Arc::new(RwLock::new(todos));
    Router::new()
        .route("/todos", get(list_todos))
        .route("/add-todo", post(create_todo))
        .route("/update-todo", put(update_todo))
        .route("/delete-todo", delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Todo not found")
}

fn check_title(title: &str) -> Result<String, Response> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(error(StatusCode::BAD_REQUEST, "Title is too long"));
    }
    Ok(trimmed.to_string())
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Response {
    let todos: Vec<Todo> = db.read().await.clone();
    match params.shape.as_deref() {
        Some("wrapped") => Json(serde_json::json!({ "todos": todos })).into_response(),
        _ => Json(todos).into_response(),
    }
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> Response {
    let title = match check_title(&input.title) {
        Ok(title) => title,
        Err(response) => return response,
    };
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title,
        completed: false,
    };
    tracing::debug!(id = %todo.id, "created todo");
    db.write().await.push(todo.clone());
    (StatusCode::CREATED, Json(todo)).into_response()
}

async fn update_todo(State(db): State<Db>, Json(input): Json<UpdateTodo>) -> Response {
    let title = match input.title.as_deref().map(check_title).transpose() {
        Ok(title) => title,
        Err(response) => return response,
    };
    let mut todos = db.write().await;
    let Some(todo) = todos.iter_mut().find(|t| t.id == input.id) else {
        return not_found();
    };
    if let Some(title) = title {
        todo.title = title;
    }
    todo.completed = input.completed;
    Json(todo.clone()).into_response()
}

async fn delete_todo(State(db): State<Db>, Json(input): Json<DeleteTodo>) -> Response {
    let mut todos = db.write().await;
    match todos.iter().position(|t| t.id == input.id) {
        Some(index) => {
            let todo = todos.remove(index);
            Json(serde_json::json!({ "id": todo.id })).into_response()
        }
        None => not_found(),
    }
}
