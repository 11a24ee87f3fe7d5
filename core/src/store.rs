//! Client-side todo state manager.
//!
//! # Design
//! `TodoStore` owns the authoritative in-memory collection and publishes it
//! through a `tokio::sync::watch` channel: `subscribe()` hands out receivers
//! that wake on every change, `snapshot()` clones the current state.
//!
//! Every operation takes `&self`, so mutations on different ids can be in
//! flight at the same time on one task (e.g. under `join!`). State is only
//! touched inside `send_modify` closures, never across an `.await`.
//!
//! Mutations are optimistic. The affected entity (and its position) is
//! captured before the local change; if the request fails the snapshot is
//! restored by value and the error is recorded. No refetch happens.

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::service::TodoService;
use crate::state::{EditorMode, Filter, TodoState};
use crate::types::{validate_title, Todo};

pub struct TodoStore<S> {
    service: S,
    state: watch::Sender<TodoState>,
}

impl<S: TodoService> TodoStore<S> {
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(TodoState::default());
        Self { service, state }
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.state.borrow().is_busy(id)
    }

    pub fn todo(&self, id: &str) -> Option<Todo> {
        self.state.borrow().todo(id).cloned()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetch the collection. Skipped when a load already succeeded, unless
    /// `force` is set.
    ///
    /// Mutations that overlap the fetch win over the fetched list: busy
    /// todos keep their local state and todos created or deleted meanwhile
    /// stay that way.
    pub async fn load(&self, force: bool) {
        let mut known: HashSet<String> = HashSet::new();
        let proceed = self.state.send_if_modified(|s| {
            if s.loaded && !force {
                return false;
            }
            known = s.todos.iter().map(|t| t.id.clone()).collect();
            s.loading = true;
            s.error = None;
            true
        });
        if !proceed {
            debug!("todos already loaded, skipping fetch");
            return;
        }

        let result = self.service.list().await;
        self.state.send_modify(|s| {
            match result {
                Ok(todos) => {
                    info!(count = todos.len(), "loaded todos");
                    for id in s.apply_fetched(todos, &known) {
                        warn!(%id, "duplicate id in list response");
                    }
                    s.loaded = true;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load todos");
                    s.error = Some(e.to_string());
                }
            }
            s.loading = false;
        });
    }

    /// Manual retry: a forced reload.
    pub async fn retry(&self) {
        self.load(true).await;
    }

    /// Create a todo from free text. Blank input is ignored; an over-long
    /// title is reported without touching the network. Returns true once the
    /// server-assigned todo is in the collection.
    pub async fn quick_add(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let title = match validate_title(text) {
            Ok(title) => title,
            Err(e) => {
                self.report(e.to_string());
                return false;
            }
        };

        let proceed = self.state.send_if_modified(|s| {
            if s.submitting {
                return false;
            }
            s.submitting = true;
            s.error = None;
            true
        });
        if !proceed {
            debug!("quick add already submitting");
            return false;
        }

        let result = self.service.create(&title).await;
        let created = result.is_ok();
        self.state.send_modify(|s| {
            match result {
                Ok(todo) => {
                    debug!(id = %todo.id, "created todo");
                    s.upsert(todo);
                    s.quick_add_text.clear();
                }
                Err(e) => {
                    warn!(error = %e, "quick add failed");
                    s.error = Some(e.to_string());
                }
            }
            s.submitting = false;
        });
        created
    }

    /// `quick_add` using the stored quick-add text.
    pub async fn submit_quick_add(&self) -> bool {
        let text = self.state.borrow().quick_add_text.clone();
        self.quick_add(&text).await
    }

    /// Flip `completed` optimistically, then confirm with the server.
    /// No-op (false) if the todo is busy or gone.
    pub async fn toggle(&self, todo: &Todo) -> bool {
        let id = todo.id.as_str();
        let mut original = None;
        self.state.send_if_modified(|s| {
            if s.is_busy(id) {
                return false;
            }
            let Some(index) = s.position(id) else {
                return false;
            };
            original = Some(s.todos[index].clone());
            s.busy.insert(id.to_string());
            s.error = None;
            s.todos[index].completed = !s.todos[index].completed;
            true
        });
        let Some(original) = original else {
            debug!(id, "toggle ignored");
            return false;
        };

        let result = self.service.update(id, None, !original.completed).await;
        self.settle(id, result, original)
    }

    /// Remove optimistically, then confirm with the server. On failure the
    /// todo goes back where it was.
    pub async fn delete(&self, todo: &Todo) -> bool {
        let id = todo.id.as_str();
        let mut removed = None;
        self.state.send_if_modified(|s| {
            if s.is_busy(id) {
                return false;
            }
            let Some(index) = s.position(id) else {
                return false;
            };
            removed = Some((index, s.todos.remove(index)));
            s.busy.insert(id.to_string());
            s.error = None;
            true
        });
        let Some((index, removed)) = removed else {
            debug!(id, "delete ignored");
            return false;
        };

        let result = self.service.delete(id).await;
        let deleted = result.is_ok();
        self.state.send_modify(|s| {
            match result {
                Ok(()) => s.todos.retain(|t| t.id != id),
                Err(e) => {
                    warn!(id, error = %e, "delete failed, restoring todo");
                    if s.position(id).is_none() {
                        let index = index.min(s.todos.len());
                        s.todos.insert(index, removed);
                    }
                    s.error = Some(e.to_string());
                }
            }
            s.busy.remove(id);
        });
        deleted
    }

    /// Create (`id` is `None`) or edit a todo from the editor. Returns false
    /// when validation fails, the todo is gone or busy, or the request fails;
    /// the error slot says why.
    pub async fn save(&self, id: Option<&str>, title: &str, completed: bool) -> bool {
        let title = match validate_title(title) {
            Ok(title) => title,
            Err(e) => {
                self.report(e.to_string());
                return false;
            }
        };

        match id {
            Some(id) => self.save_edit(id, title, completed).await,
            None => self.save_create(title).await,
        }
    }

    async fn save_edit(&self, id: &str, title: String, completed: bool) -> bool {
        let mut original = None;
        self.state.send_if_modified(|s| {
            if s.is_busy(id) {
                return false;
            }
            let Some(index) = s.position(id) else {
                return false;
            };
            original = Some(s.todos[index].clone());
            s.busy.insert(id.to_string());
            s.error = None;
            s.todos[index] = Todo {
                id: id.to_string(),
                title: title.clone(),
                completed,
            };
            true
        });
        let Some(original) = original else {
            debug!(id, "edit ignored");
            return false;
        };

        let result = self.service.update(id, Some(&title), completed).await;
        self.settle(id, result, original)
    }

    async fn save_create(&self, title: String) -> bool {
        self.state.send_if_modified(|s| s.error.take().is_some());

        let result = self.service.create(&title).await;
        let created = result.is_ok();
        self.state.send_modify(|s| match result {
            Ok(todo) => {
                debug!(id = %todo.id, "created todo");
                s.upsert(todo);
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                s.error = Some(e.to_string());
            }
        });
        created
    }

    /// Reconcile with the server's copy, or roll back to `original`.
    fn settle(&self, id: &str, result: Result<Todo, ApiError>, original: Todo) -> bool {
        let confirmed = result.is_ok();
        self.state.send_modify(|s| {
            match result {
                Ok(updated) if updated.id == id => {
                    s.replace(updated);
                }
                Ok(updated) => {
                    warn!(id, returned = %updated.id, "server returned a different id, keeping local copy");
                }
                Err(e) => {
                    warn!(id, error = %e, "update failed, rolling back");
                    s.replace(original);
                    s.error = Some(e.to_string());
                }
            }
            s.busy.remove(id);
        });
        confirmed
    }

    pub fn open_create(&self) {
        self.state.send_modify(|s| s.editor = Some(EditorMode::Create));
    }

    pub fn open_edit(&self, todo: &Todo) {
        self.state.send_modify(|s| {
            s.editor = Some(EditorMode::Edit { todo: todo.clone() });
        });
    }

    pub fn close_editor(&self) {
        self.state.send_if_modified(|s| s.editor.take().is_some());
    }

    /// `save` in the open editor's mode; closes the editor on success.
    pub async fn save_editor(&self, title: &str, completed: bool) -> bool {
        let Some(mode) = self.state.borrow().editor.clone() else {
            return false;
        };
        let saved = self.save(mode.todo_id(), title, completed).await;
        if saved {
            self.close_editor();
        }
        saved
    }

    pub fn set_filter(&self, filter: Filter) {
        self.state.send_if_modified(|s| {
            let changed = s.filter != filter;
            s.filter = filter;
            changed
        });
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            let changed = s.search_text != text;
            s.search_text = text;
            changed
        });
    }

    pub fn set_quick_add_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            let changed = s.quick_add_text != text;
            s.quick_add_text = text;
            changed
        });
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn report(&self, message: String) {
        debug!(%message, "validation failed");
        self.state.send_modify(|s| s.error = Some(message));
    }
}
