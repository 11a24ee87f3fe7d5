//! Client core for the todo service: API gateway plus state manager.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). A `Transport`
//! executes the round-trip; `HttpTodoService` ties the two together behind the
//! `TodoService` trait. `TodoStore` sits on top: it keeps the in-memory
//! collection, applies optimistic mutations with rollback, and publishes
//! `TodoState` snapshots to subscribers.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `ApiConfig`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable from JSON vectors.
//! - `TodoStore` is generic over `TodoService`, so presentation layers and
//!   tests can swap the network out entirely.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{HttpTodoService, TodoService};
pub use state::{EditorMode, Filter, TodoState};
pub use store::TodoStore;
pub use transport::{ReqwestTransport, Transport};
pub use types::{validate_title, CreateTodo, DeleteTodo, Todo, UpdateTodo, MAX_TITLE_LEN};
