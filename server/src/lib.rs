use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub mod config;
pub mod repo;

pub use repo::{seed_todos, TodoRepo, DEFAULT_USER_ID};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    #[serde(rename = "todo")]
    pub text: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(rename = "todo")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default = "default_user_id")]
    pub user_id: i64,
}

fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub id: i64,
    #[serde(rename = "todo")]
    pub text: Option<String>,
    pub completed: Option<bool>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub id: Option<i64>,
}

pub type Db = Arc<RwLock<TodoRepo>>;

/// Errors a handler can answer with.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    IdsExhausted,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "Todo not found".to_string(),
                }),
            )
                .into_response(),
            AppError::IdsExhausted => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "No todo id left".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Router over the seeded repository.
pub fn app() -> Router {
    app_with(TodoRepo::seeded())
}

pub fn app_with(repo: TodoRepo) -> Router {
    let db: Db = Arc::new(RwLock::new(repo));
    Router::new()
        .route(
            "/todos",
            get(list_todos)
                .post(create_todo)
                .put(update_todo)
                .delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, TodoRepo::seeded()).await
}

pub async fn serve(listener: TcpListener, repo: TodoRepo) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(repo)).await
}

async fn list_todos(State(db): State<Db>) -> Json<TodoList> {
    let repo = db.read().await;
    Json(TodoList {
        todos: repo.list().to_vec(),
    })
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = db
        .write()
        .await
        .create(input.text, input.completed, input.user_id)
        .ok_or(AppError::IdsExhausted)?;
    debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, AppError> {
    let id = input.id;
    let todo = db.write().await.update(input).ok_or(AppError::NotFound)?;
    debug!(id, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

async fn delete_todo(
    State(db): State<Db>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = params.id.unwrap_or(0);
    let mut repo = db.write().await;

    // id 0 (or no id at all) restores the seed records.
    if id == 0 {
        repo.reset();
        info!("todos reset to seed records");
        return Ok(Json(DeleteAck {
            success: true,
            message: Some("Todos reset".to_string()),
        }));
    }

    repo.remove(id).ok_or(AppError::NotFound)?;
    debug!(id, "deleted todo");
    Ok(Json(DeleteAck {
        success: true,
        message: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_wire_names() {
        let todo = Todo {
            id: 7,
            text: "Test".to_string(),
            completed: false,
            user_id: 1,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["todo"], "Test");
        assert_eq!(json["completed"], false);
        assert_eq!(json["userId"], 1);
        assert!(json.get("text").is_none());
    }

    #[test]
    fn create_todo_defaults_completed_and_user() {
        let input: CreateTodo = serde_json::from_str(r#"{"todo":"No extras"}"#).unwrap();
        assert_eq!(input.text, "No extras");
        assert!(!input.completed);
        assert_eq!(input.user_id, 1);
    }

    #[test]
    fn create_todo_accepts_explicit_fields() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"todo":"Done","completed":true,"userId":4}"#).unwrap();
        assert!(input.completed);
        assert_eq!(input.user_id, 4);
    }

    #[test]
    fn create_todo_rejects_missing_text() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_requires_only_id() {
        let input: UpdateTodo = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(input.id, 3);
        assert!(input.text.is_none());
        assert!(input.completed.is_none());
        assert!(input.user_id.is_none());
    }

    #[test]
    fn update_todo_rejects_missing_id() {
        let result: Result<UpdateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn delete_ack_omits_absent_message() {
        let json = serde_json::to_string(&DeleteAck {
            success: true,
            message: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
