//! SQLite database operations
//!
//! All database access goes through this module. Holds both the todo
//! collection and the bearer-token cache. Every todo statement carries the
//! owning user in its WHERE clause, so cross-user access is structurally
//! impossible rather than checked after the fact.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::Path;

use super::models::{CachedToken, TodoRecord};
use crate::error::{AppError, StoreError};

/// Database connection pool wrapper
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the SQLite database at `path`
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Store(StoreError::Unavailable(sqlx::Error::Io(e))))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string)
            .await
            .map_err(StoreError::Unavailable)?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Token cache
    // =========================================================================

    /// Look up a cached token resolution by its hash
    ///
    /// Absence is not an error.
    pub async fn lookup_token(&self, token_hash: &str) -> Result<Option<CachedToken>, StoreError> {
        let token = sqlx::query_as::<_, CachedToken>(
            "SELECT access_token_hash, user, created_date FROM tokens WHERE access_token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    /// Upsert a token resolution keyed by hash
    ///
    /// Last write wins on conflict; the value is idempotent per hash in
    /// practice, so concurrent inserts cannot corrupt the entry.
    pub async fn insert_token(
        &self,
        token_hash: &str,
        user: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (access_token_hash, user, created_date)
            VALUES (?, ?, ?)
            ON CONFLICT(access_token_hash) DO UPDATE SET
                user = excluded.user,
                created_date = excluded.created_date
            "#,
        )
        .bind(token_hash)
        .bind(user)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Todos
    // =========================================================================

    /// Insert a new todo owned by `user`
    pub async fn insert_todo(&self, todo: &TodoRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO todos (id, title, completed, user, created_date, updated_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&todo.id)
        .bind(&todo.title)
        .bind(todo.completed)
        .bind(&todo.user)
        .bind(todo.created_date)
        .bind(todo.updated_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a todo by id, scoped to `user`
    pub async fn get_todo(&self, user: &str, id: &str) -> Result<Option<TodoRecord>, StoreError> {
        let todo = sqlx::query_as::<_, TodoRecord>(
            "SELECT id, title, completed, user, created_date, updated_date
             FROM todos WHERE id = ? AND user = ?",
        )
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    /// List all todos owned by `user`, oldest first
    pub async fn list_todos(&self, user: &str) -> Result<Vec<TodoRecord>, StoreError> {
        let todos = sqlx::query_as::<_, TodoRecord>(
            "SELECT id, title, completed, user, created_date, updated_date
             FROM todos WHERE user = ? ORDER BY created_date ASC, id ASC",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Update a todo's fields, scoped to `user`
    ///
    /// Returns `false` when no row matched (unknown id or foreign owner —
    /// indistinguishable by design).
    pub async fn update_todo(
        &self,
        user: &str,
        id: &str,
        title: &str,
        completed: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE todos SET title = ?, completed = ?, updated_date = ?
             WHERE id = ? AND user = ?",
        )
        .bind(title)
        .bind(completed)
        .bind(updated_at)
        .bind(id)
        .bind(user)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a todo, scoped to `user`
    ///
    /// Returns `false` when no row matched.
    pub async fn delete_todo(&self, user: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user = ?")
            .bind(id)
            .bind(user)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
