//! Storage seam for the allocator: one-row reads, the per-field counter, and
//! the conditional code write. `PgCodeStore` is the production
//! implementation; tests use an in-memory store.

use crate::codegen::format::{parse_suffix, CodeField};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Current value of the code field for one row. `None` means the row does
    /// not exist; an empty string means no code has been assigned yet.
    async fn read_field(&self, field: CodeField, row_id: i64) -> Result<Option<String>, AppError>;

    /// Atomically increment and return the per-field counter. Values are
    /// strictly increasing and never handed out twice.
    async fn next_sequence_value(&self, field: CodeField) -> Result<i64, AppError>;

    /// Conditional write: set the field only if it is still empty for that
    /// row. Returns whether the write took effect.
    async fn set_if_empty(
        &self,
        field: CodeField,
        row_id: i64,
        code: &str,
    ) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgCodeStore {
    pool: PgPool,
}

impl PgCodeStore {
    pub fn new(pool: PgPool) -> Self {
        PgCodeStore { pool }
    }

    /// Seed base for a field's counter: the trailing digits of the newest
    /// (highest primary key) assigned code, or 0 when no code exists yet.
    /// Lets the counter continue a sequence started by pre-existing rows.
    async fn seed_base(&self, field: CodeField) -> Result<i64, AppError> {
        let last: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT {col} FROM {table} WHERE {col} <> '' ORDER BY id DESC LIMIT 1",
            col = field.column(),
            table = field.table(),
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(last
            .and_then(|(code,)| parse_suffix(&code))
            .unwrap_or(0))
    }
}

#[async_trait]
impl CodeStore for PgCodeStore {
    async fn read_field(&self, field: CodeField, row_id: i64) -> Result<Option<String>, AppError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(&format!(
            "SELECT {col} FROM {table} WHERE id = $1",
            col = field.column(),
            table = field.table(),
        ))
        .bind(row_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(code,)| code.unwrap_or_default()))
    }

    async fn next_sequence_value(&self, field: CodeField) -> Result<i64, AppError> {
        // Fast path: the counter row already exists.
        let bumped: Option<(i64,)> = sqlx::query_as(
            "UPDATE code_sequences SET next_value = next_value + 1 WHERE field = $1 RETURNING next_value",
        )
        .bind(field.column())
        .fetch_optional(&self.pool)
        .await?;
        if let Some((n,)) = bumped {
            return Ok(n);
        }

        // First allocation for this field: seed from existing data. The
        // ON CONFLICT arm keeps this correct if another allocator inserted
        // the counter row in between.
        let seed = self.seed_base(field).await?;
        let (n,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO code_sequences (field, next_value)
            VALUES ($1, $2 + 1)
            ON CONFLICT (field)
            DO UPDATE SET next_value = code_sequences.next_value + 1
            RETURNING next_value
            "#,
        )
        .bind(field.column())
        .bind(seed)
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }

    async fn set_if_empty(
        &self,
        field: CodeField,
        row_id: i64,
        code: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {table} SET {col} = $1, {touch} = NOW() WHERE id = $2 AND ({col} IS NULL OR {col} = '')",
            table = field.table(),
            col = field.column(),
            touch = field.touch_column(),
        ))
        .bind(code)
        .bind(row_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
