//! Observable snapshot of the todo list and the views derived from it.
//!
//! # Design
//! `TodoState` is plain cloneable data. The collection is kept in arrival
//! order and never stored sorted; every view recomputes the canonical order
//! (pending before completed, then case-insensitive title). `sort_by` is
//! stable, so todos with equal keys keep their arrival order.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Todo;

/// Which slice of the collection the list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    /// Every filter, in display order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Pending, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

/// What the editor sheet is doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorMode {
    Create,
    Edit { todo: Todo },
}

impl EditorMode {
    pub fn title(&self) -> &'static str {
        match self {
            EditorMode::Create => "New Todo",
            EditorMode::Edit { .. } => "Edit Todo",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            EditorMode::Create => "Create",
            EditorMode::Edit { .. } => "Save Changes",
        }
    }

    /// Id of the todo being edited, `None` when creating.
    pub fn todo_id(&self) -> Option<&str> {
        match self {
            EditorMode::Create => None,
            EditorMode::Edit { todo } => Some(todo.id.as_str()),
        }
    }
}

/// Everything a presentation layer needs to render the todo screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Arrival order. At most one entry per id.
    pub todos: Vec<Todo>,
    /// Ids with a mutation in flight.
    pub busy: HashSet<String>,
    pub loading: bool,
    /// A quick-add create is in flight.
    pub submitting: bool,
    /// An initial load has completed successfully.
    pub loaded: bool,
    pub error: Option<String>,
    pub filter: Filter,
    pub search_text: String,
    pub quick_add_text: String,
    /// `Some` while the editor is open.
    pub editor: Option<EditorMode>,
}

impl TodoState {
    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.contains(id)
    }

    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// The whole collection in canonical order.
    pub fn ordered_todos(&self) -> Vec<Todo> {
        sorted(self.todos.iter())
    }

    pub fn completed_todos(&self) -> Vec<Todo> {
        sorted(self.todos.iter().filter(|t| t.completed))
    }

    /// Todos matching the active filter and search text, in canonical order.
    pub fn visible_todos(&self) -> Vec<Todo> {
        let query = self.search_text.trim().to_lowercase();
        sorted(
            self.todos
                .iter()
                .filter(|t| self.filter.matches(t))
                .filter(|t| query.is_empty() || t.title.to_lowercase().contains(&query)),
        )
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    /// Overwrite the entry with `todo.id`. Returns false if there is none.
    pub(crate) fn replace(&mut self, todo: Todo) -> bool {
        match self.position(&todo.id) {
            Some(index) => {
                self.todos[index] = todo;
                true
            }
            None => false,
        }
    }

    /// Add `todo`, or overwrite the entry that already has its id.
    pub(crate) fn upsert(&mut self, todo: Todo) {
        if let Some(index) = self.position(&todo.id) {
            self.todos[index] = todo;
        } else {
            self.todos.push(todo);
        }
    }

    /// Replace the collection with a fetched list without undoing local work
    /// that overlapped the fetch. `known` holds the ids present when the fetch
    /// started.
    ///
    /// - A busy id keeps its local copy, or stays absent while its delete is
    ///   in flight.
    /// - A known id that is gone locally was deleted during the fetch and is
    ///   not restored.
    /// - A local todo that is not known arrived during the fetch and is kept.
    ///
    /// Returns the ids that appeared more than once in `fetched`.
    pub(crate) fn apply_fetched(
        &mut self,
        fetched: Vec<Todo>,
        known: &HashSet<String>,
    ) -> Vec<String> {
        let local = std::mem::take(&mut self.todos);
        let mut duplicates = Vec::new();
        for todo in fetched {
            if self.position(&todo.id).is_some() {
                duplicates.push(todo.id.clone());
            }
            let busy = self.is_busy(&todo.id);
            match local.iter().find(|t| t.id == todo.id) {
                Some(mine) if busy => self.upsert(mine.clone()),
                Some(_) => self.upsert(todo),
                None if busy || known.contains(&todo.id) => {}
                None => self.upsert(todo),
            }
        }
        for todo in local {
            let keep = self.is_busy(&todo.id) || !known.contains(&todo.id);
            if keep && self.position(&todo.id).is_none() {
                self.todos.push(todo);
            }
        }
        duplicates
    }
}

/// Canonical order: pending first, then case-insensitive title.
pub fn canonical_cmp(a: &Todo, b: &Todo) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

fn sorted<'a>(todos: impl Iterator<Item = &'a Todo>) -> Vec<Todo> {
    let mut out: Vec<Todo> = todos.cloned().collect();
    out.sort_by(canonical_cmp);
    out
}
