//! Todo CRUD endpoints
//!
//! All routes require a resolved identity and every store operation is
//! scoped to that identity. An id that is not well-formed 24-hex, or that
//! belongs to another user, answers 404 — the cases are indistinguishable
//! on purpose.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{NewTodo, RecordId, TodoRecord};
use crate::error::AppError;

/// Create todos router
///
/// Routes:
/// - POST / - Create a todo
/// - GET / - List own todos
/// - GET /:id - Get a todo
/// - PUT /:id - Update a todo
/// - DELETE /:id - Delete a todo
pub fn todos_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_todo).get(list_todos))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
}

/// Response carrying just a record id
#[derive(Debug, Serialize)]
struct TodoId {
    id: String,
}

/// POST /v1/todos
async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<NewTodo>,
) -> Result<Json<TodoId>, AppError> {
    let now = Utc::now();
    let record = TodoRecord {
        id: RecordId::new().0,
        title: payload.title,
        completed: payload.completed,
        user: user.0,
        created_date: now,
        updated_date: now,
    };

    state.db.insert_todo(&record).await?;

    Ok(Json(TodoId { id: record.id }))
}

/// GET /v1/todos
async fn list_todos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TodoRecord>>, AppError> {
    let todos = state.db.list_todos(user.as_str()).await?;

    Ok(Json(todos))
}

/// GET /v1/todos/:id
async fn get_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<TodoRecord>, AppError> {
    if !RecordId::is_well_formed(&id) {
        return Err(AppError::NotFound);
    }

    let todo = state
        .db
        .get_todo(user.as_str(), &id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(todo))
}

/// PUT /v1/todos/:id
async fn update_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<NewTodo>,
) -> Result<Json<TodoId>, AppError> {
    if !RecordId::is_well_formed(&id) {
        return Err(AppError::NotFound);
    }

    let matched = state
        .db
        .update_todo(
            user.as_str(),
            &id,
            &payload.title,
            payload.completed,
            Utc::now(),
        )
        .await?;

    if !matched {
        return Err(AppError::NotFound);
    }

    Ok(Json(TodoId { id }))
}

/// DELETE /v1/todos/:id
async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    if !RecordId::is_well_formed(&id) {
        return Err(AppError::NotFound);
    }

    let deleted = state.db.delete_todo(user.as_str(), &id).await?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(true))
}
