use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Capacity log model - SQL persistence layer
///
/// Rows are never mutated after insert.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct CapacityLog {
    pub id: i64,
    pub shelter_id: i64,
    pub beds_total: i32,
    pub beds_available: i32,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}

impl CapacityLog {
    /// Latest log rows for a shelter, newest first, capped at `limit`.
    pub async fn find_latest(shelter_id: i64, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM capacity_logs
             WHERE shelter_id = $1
             ORDER BY updated_at DESC, id DESC
             LIMIT $2",
        )
        .bind(shelter_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Append a new log row recording the acting user.
    pub async fn insert(
        shelter_id: i64,
        beds_total: i32,
        beds_available: i32,
        updated_by: i64,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO capacity_logs (shelter_id, beds_total, beds_available, updated_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(shelter_id)
        .bind(beds_total)
        .bind(beds_available)
        .bind(updated_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
