//! Client core for the todo service.
//!
//! # Overview
//! Two layers. The lower one builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO), so
//! every wire detail is deterministic and testable. The upper one,
//! `TodoSync`, keeps an ordered local `TodoStore` in step with a
//! `RemoteTodoService`: intents are validated, sent, and applied to the
//! store only once the remote confirms them.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - The remote is injected. `HttpRemote` pairs `TodoClient` with a
//!   `Transport`; `InMemoryRemote` simulates the server. `SyncConfig`
//!   picks one.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod ids;
pub mod remote;
pub mod store;
pub mod sync;
pub mod types;
pub mod validate;

pub use client::TodoClient;
pub use config::{RemoteConfig, SyncConfig};
pub use error::{
    ApiError, ConfigError, Operation, RemoteError, SyncError, TransportError, ValidationError,
};
pub use filter::{StatusFilter, TodoQuery};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remote::{HttpRemote, InMemoryRemote, RemoteTodoService, ReqwestTransport, Transport};
pub use store::TodoStore;
pub use sync::{OpKey, OpStatus, PendingDelete, TodoSync};
pub use types::{CreateTodo, Todo, TodoId, TodoPatch, UpdateTodo};
