//! Transaction persistence, always scoped to one owner.

use sqlx::{Sqlite, SqlitePool};
use tally_core::{AppResult, UserId};

use crate::models::{NewTransaction, Transaction, TransactionId};

const TRANSACTION_COLUMNS: &str = "id, date, amount, category, type, description, user_id";

/// All transactions of `user_id`, in insertion order.
pub async fn list_transactions(pool: &SqlitePool, user_id: UserId) -> AppResult<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ? ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn add_transaction(
    pool: &SqlitePool,
    user_id: UserId,
    tx: &NewTransaction,
) -> AppResult<TransactionId> {
    let id = insert(pool, user_id, tx).await?;
    tracing::info!(transaction_id = id, user_id, kind = %tx.kind, "added transaction");
    Ok(id)
}

/// Insert every row inside one database transaction. Either all rows land or none do.
pub async fn insert_batch(pool: &SqlitePool, user_id: UserId, rows: &[NewTransaction]) -> AppResult<usize> {
    let mut db_tx = pool.begin().await?;
    for row in rows {
        insert(&mut *db_tx, user_id, row).await?;
    }
    db_tx.commit().await?;

    tracing::info!(user_id, count = rows.len(), "imported transactions");
    Ok(rows.len())
}

async fn insert<'e, E>(executor: E, user_id: UserId, tx: &NewTransaction) -> AppResult<TransactionId>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO transactions (date, amount, category, type, description, user_id) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(tx.date)
    .bind(tx.amount)
    .bind(&tx.category)
    .bind(tx.kind.as_str())
    .bind(&tx.description)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}
