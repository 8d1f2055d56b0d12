//! Task persistence. Every read and write is filtered by owner.

use sqlx::SqlitePool;
use tally_core::{AppError, AppResult, UserId, session::ensure_owner};

use crate::models::{Task, TaskFields, TaskId};

const TASK_COLUMNS: &str = "id, title, description, deadline, completed, user_id";

/// All tasks of `user_id`, in insertion order.
pub async fn list_tasks(pool: &SqlitePool, user_id: UserId) -> AppResult<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(tasks)
}

pub async fn get_task(pool: &SqlitePool, id: TaskId) -> AppResult<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

/// Fetch a task the session user owns.
///
/// [`AppError::NotFound`] if the id is unknown, [`AppError::Forbidden`] if
/// someone else owns it.
pub async fn owned_task(pool: &SqlitePool, id: TaskId, user_id: UserId) -> AppResult<Task> {
    let task = get_task(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("task {id}")))?;
    ensure_owner(task.user_id, user_id)?;
    Ok(task)
}

pub async fn create_task(pool: &SqlitePool, user_id: UserId, fields: &TaskFields) -> AppResult<TaskId> {
    let result = sqlx::query(
        "INSERT INTO tasks (title, description, deadline, completed, user_id) VALUES (?, ?, ?, 0, ?)",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.deadline)
    .bind(user_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(task_id = id, user_id, "created task");
    Ok(id)
}

/// Overwrite title, description and deadline.
pub async fn update_task(
    pool: &SqlitePool,
    id: TaskId,
    user_id: UserId,
    fields: &TaskFields,
) -> AppResult<()> {
    owned_task(pool, id, user_id).await?;

    sqlx::query("UPDATE tasks SET title = ?, description = ?, deadline = ? WHERE id = ? AND user_id = ?")
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.deadline)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!(task_id = id, user_id, "updated task");
    Ok(())
}

pub async fn delete_task(pool: &SqlitePool, id: TaskId, user_id: UserId) -> AppResult<()> {
    owned_task(pool, id, user_id).await?;

    sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!(task_id = id, user_id, "deleted task");
    Ok(())
}
