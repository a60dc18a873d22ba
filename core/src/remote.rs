//! The remote todo service seen by the synchronization layer.
//!
//! # Design
//! `RemoteTodoService` is the only thing `TodoSync` knows about the server.
//! `HttpRemote` implements it by pairing the stateless `TodoClient` with a
//! `Transport` that performs the round-trip; `ReqwestTransport` is the
//! network-backed transport. `InMemoryRemote` is a simulated stand-in with
//! the same observable behavior as the real API, for local use and tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::client::TodoClient;
use crate::error::{RemoteError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::ids::IdGenerator;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo, DEFAULT_USER_ID};

/// List, create, update and delete over todo records.
#[async_trait]
pub trait RemoteTodoService: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, RemoteError>;

    async fn create(&self, input: &CreateTodo) -> Result<Todo, RemoteError>;

    async fn update(&self, input: &UpdateTodo) -> Result<Todo, RemoteError>;

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError>;
}

#[async_trait]
impl<R: RemoteTodoService + ?Sized> RemoteTodoService for Box<R> {
    async fn list(&self) -> Result<Vec<Todo>, RemoteError> {
        (**self).list().await
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, RemoteError> {
        (**self).create(input).await
    }

    async fn update(&self, input: &UpdateTodo) -> Result<Todo, RemoteError> {
        (**self).update(input).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<R: RemoteTodoService + ?Sized> RemoteTodoService for Arc<R> {
    async fn list(&self) -> Result<Vec<Todo>, RemoteError> {
        (**self).list().await
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, RemoteError> {
        (**self).create(input).await
    }

    async fn update(&self, input: &UpdateTodo) -> Result<Todo, RemoteError> {
        (**self).update(input).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        (**self).delete(id).await
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Executes one `HttpRequest`. Non-2xx statuses are responses, not errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Remote service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> HttpRemote<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// Restore the server's seed records.
    pub async fn reset(&self) -> Result<(), RemoteError> {
        let response = self.transport.execute(self.client.build_reset()).await?;
        Ok(self.client.parse_reset(response)?)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError> {
        debug!(method = request.method.as_str(), path = %request.path, "remote call");
        Ok(self.transport.execute(request).await?)
    }
}

impl HttpRemote<ReqwestTransport> {
    pub fn connect(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self::new(TodoClient::new(base_url), ReqwestTransport::new()?))
    }
}

#[async_trait]
impl<T: Transport> RemoteTodoService for HttpRemote<T> {
    async fn list(&self) -> Result<Vec<Todo>, RemoteError> {
        let response = self.send(self.client.build_list_todos()).await?;
        Ok(self.client.parse_list_todos(response)?)
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, RemoteError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.send(request).await?;
        Ok(self.client.parse_create_todo(response)?)
    }

    async fn update(&self, input: &UpdateTodo) -> Result<Todo, RemoteError> {
        let request = self.client.build_update_todo(input)?;
        let response = self.send(request).await?;
        Ok(self.client.parse_update_todo(response)?)
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        let response = self.send(self.client.build_delete_todo(id)).await?;
        Ok(self.client.parse_delete_todo(response)?)
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// The three records the API starts with and returns to on reset.
pub fn seed_todos() -> Vec<Todo> {
    [
        (1, "Learn React", false),
        (2, "Build a todo app", true),
        (3, "Write tests", false),
    ]
    .into_iter()
    .map(|(id, text, completed)| Todo {
        id,
        text: text.to_string(),
        completed,
        user_id: DEFAULT_USER_ID,
    })
    .collect()
}

#[derive(Debug, Default)]
struct Records {
    todos: Vec<Todo>,
    ids: IdGenerator,
}

/// Simulated remote that behaves like the HTTP API, held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    records: Mutex<Records>,
}

impl InMemoryRemote {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self::with_todos(seed_todos())
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            records: Mutex::new(Records {
                todos,
                ids: IdGenerator::new(),
            }),
        }
    }

    /// Copy of the server-side list, in server order.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    pub fn reset(&self) {
        self.lock().todos = seed_todos();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RemoteTodoService for InMemoryRemote {
    async fn list(&self) -> Result<Vec<Todo>, RemoteError> {
        Ok(self.snapshot())
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, RemoteError> {
        let mut records = self.lock();
        let floor = records.todos.iter().map(|t| t.id).max().unwrap_or(0);
        let id = records
            .ids
            .next_above(floor)
            .ok_or_else(|| RemoteError::Transport(format!("no todo id is left above {floor}")))?;
        let todo = Todo {
            id,
            text: input.text.clone(),
            completed: input.completed,
            user_id: input.user_id,
        };
        records.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, input: &UpdateTodo) -> Result<Todo, RemoteError> {
        let mut records = self.lock();
        let todo = records
            .todos
            .iter_mut()
            .find(|t| t.id == input.id)
            .ok_or(RemoteError::NotFound)?;
        if let Some(text) = &input.text {
            todo.text = text.clone();
        }
        if let Some(completed) = input.completed {
            todo.completed = completed;
        }
        if let Some(user_id) = input.user_id {
            todo.user_id = user_id;
        }
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        let mut records = self.lock();
        if id == crate::client::RESET_ID {
            records.todos = seed_todos();
            return Ok(());
        }
        let index = records
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(RemoteError::NotFound)?;
        records.todos.remove(index);
        Ok(())
    }
}
