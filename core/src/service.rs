//! The four logical operations of the todo API.
//!
//! `TodoService` is the seam the state manager depends on. `HttpTodoService`
//! implements it by pairing the stateless `TodoClient` with a `Transport`.
//! Calls are single-shot; retry policy belongs to the caller.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::client::TodoClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::Todo;

#[async_trait]
pub trait TodoService: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    async fn create(&self, title: &str) -> Result<Todo, ApiError>;

    /// `title` is `None` when only the completion flag changes.
    async fn update(&self, id: &str, title: Option<&str>, completed: bool)
        -> Result<Todo, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// `TodoService` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTodoService<T = ReqwestTransport> {
    client: TodoClient,
    transport: T,
}

impl HttpTodoService<ReqwestTransport> {
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn from_config(config: ApiConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(TodoClient::with_config(config), transport))
    }
}

impl<T: Transport> HttpTodoService<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> TodoService for HttpTodoService<T> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos()).await?;
        let todos = self.client.parse_list_todos(response)?;
        debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    #[instrument(skip(self))]
    async fn create(&self, title: &str) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(title)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: &str,
        title: Option<&str>,
        completed: bool,
    ) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, title, completed)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_todo(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Replays one canned outcome and records the request it was given.
    struct CannedTransport {
        outcome: Mutex<Option<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn responding(status: u16, body: &str) -> Self {
            Self::with(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }))
        }

        fn with(outcome: Result<HttpResponse, ApiError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("transport called more than once")
        }
    }

    fn service(transport: CannedTransport) -> HttpTodoService<CannedTransport> {
        HttpTodoService::new(TodoClient::new("http://localhost:8787"), transport)
    }

    #[tokio::test]
    async fn list_decodes_wrapped_shape() {
        let svc = service(CannedTransport::responding(
            200,
            r#"{"todos":[{"id":"1","title":"a","completed":false}]}"#,
        ));
        let todos = svc.list().await.unwrap();
        assert_eq!(todos[0].id, "1");
        let seen = svc.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn transport_failure_propagates_unchanged() {
        let svc = service(CannedTransport::with(Err(ApiError::network("dns lookup failed"))));
        let err = svc.delete("1").await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
    }

    #[tokio::test]
    async fn update_sends_toggle_body() {
        let svc = service(CannedTransport::responding(
            200,
            r#"{"id":"1","title":"a","completed":true}"#,
        ));
        let todo = svc.update("1", None, true).await.unwrap();
        assert!(todo.completed);
        let seen = svc.transport.seen.lock().unwrap();
        let body: serde_json::Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"id": "1", "completed": true}));
    }

    #[tokio::test]
    async fn create_surfaces_server_message() {
        let svc = service(CannedTransport::responding(400, r#"{"message":"Title is required"}"#));
        let err = svc.create("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }
}
