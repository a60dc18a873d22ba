//! Error types for the todo client and synchronization layer.
//!
//! # Design
//! `ApiError` describes what went wrong while parsing one HTTP exchange.
//! `RemoteError` is what a `RemoteTodoService` reports: either the server
//! does not know the id, or the call failed for any other reason. The
//! synchronization layer turns both, plus `ValidationError`, into a
//! `SyncError` tagged with the `Operation` that produced it.

use std::fmt;

use thiserror::Error;

use crate::types::TodoId;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The request never produced a response.
#[derive(Debug, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Failure reported by a remote todo service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("todo not found")]
    NotFound,

    #[error("{0}")]
    Transport(String),
}

impl From<ApiError> for RemoteError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => RemoteError::NotFound,
            other => RemoteError::Transport(other.to_string()),
        }
    }
}

impl From<TransportError> for RemoteError {
    fn from(err: TransportError) -> Self {
        RemoteError::Transport(err.0)
    }
}

/// Input rejected before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("todo title is required")]
    Empty,

    #[error("todo title must be at most {max} characters (got {len})")]
    TooLong { len: usize, max: usize },

    #[error("reorder must be a permutation of the current todo ids")]
    NotAPermutation,

    #[error("todo {0} is not in the list")]
    UnknownTodo(TodoId),

    #[error("no todo id is left above {0}")]
    IdsExhausted(TodoId),
}

/// The user-facing operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Add,
    Toggle,
    Edit,
    Delete,
    Reorder,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Add => "add",
            Operation::Toggle => "toggle",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
            Operation::Reorder => "reorder",
        };
        f.write_str(name)
    }
}

/// Error surfaced by `TodoSync` to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("{operation}: {source}")]
    Validation {
        operation: Operation,
        #[source]
        source: ValidationError,
    },

    #[error("{operation}: todo {id} not found on the server")]
    NotFound { operation: Operation, id: TodoId },

    #[error("{operation} failed: {message}")]
    Transport { operation: Operation, message: String },
}

impl SyncError {
    pub fn operation(&self) -> Operation {
        match self {
            SyncError::Validation { operation, .. }
            | SyncError::NotFound { operation, .. }
            | SyncError::Transport { operation, .. } => *operation,
        }
    }

    pub(crate) fn from_remote(operation: Operation, id: Option<TodoId>, err: RemoteError) -> Self {
        match (err, id) {
            (RemoteError::NotFound, Some(id)) => SyncError::NotFound { operation, id },
            (RemoteError::NotFound, None) => SyncError::Transport {
                operation,
                message: "not found".to_string(),
            },
            (RemoteError::Transport(message), _) => SyncError::Transport { operation, message },
        }
    }
}

/// A client configuration that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
