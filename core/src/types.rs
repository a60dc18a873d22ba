//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently.
//! Wire field names (`todo`, `userId`) are mapped onto Rust names with serde
//! renames. Integration tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// Identifier of a todo. Assigned by whoever creates the record.
pub type TodoId = i64;

/// Owner tag used when the caller does not supply one.
pub const DEFAULT_USER_ID: i64 = 1;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    #[serde(rename = "todo")]
    pub text: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Response envelope of `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    #[serde(rename = "todo")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default = "default_user_id")]
    pub user_id: i64,
}

impl CreateTodo {
    /// Incomplete todo owned by the default user.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            user_id: DEFAULT_USER_ID,
        }
    }
}

fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

/// Request payload for updating an existing todo. The id travels in the
/// body; only the other fields present in the JSON are applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub id: TodoId,
    #[serde(rename = "todo", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl UpdateTodo {
    pub fn completed(id: TodoId, completed: bool) -> Self {
        Self {
            id,
            text: None,
            completed: Some(completed),
            user_id: None,
        }
    }

    pub fn text(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: Some(text.into()),
            completed: None,
            user_id: None,
        }
    }
}

/// Response body of `DELETE /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body the server sends alongside 4xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Field-wise change merged into a stored record. `None` keeps the
/// existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub user_id: Option<i64>,
}

impl TodoPatch {
    pub fn apply(self, todo: &mut Todo) {
        if let Some(text) = self.text {
            todo.text = text;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(user_id) = self.user_id {
            todo.user_id = user_id;
        }
    }
}

impl From<Todo> for TodoPatch {
    fn from(todo: Todo) -> Self {
        Self {
            text: Some(todo.text),
            completed: Some(todo.completed),
            user_id: Some(todo.user_id),
        }
    }
}
