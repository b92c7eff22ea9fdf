use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::{ApiError, PageParams};
use crate::domains::auth::models::Role;
use crate::server::middleware::AuthUser;

/// Intake lifecycle status.
///
/// `pending -> fulfilled` and `pending -> cancelled`; the storage layer
/// enforces the three-literal allow-list via a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

#[derive(Debug, Error)]
#[error("Invalid status")]
pub struct ParseStatusError;

impl IntakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::Pending => "pending",
            IntakeStatus::Fulfilled => "fulfilled",
            IntakeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntakeStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IntakeStatus::Pending),
            "fulfilled" => Ok(IntakeStatus::Fulfilled),
            "cancelled" => Ok(IntakeStatus::Cancelled),
            _ => Err(ParseStatusError),
        }
    }
}

impl TryFrom<String> for IntakeStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Intake request model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct IntakeRequest {
    pub id: i64,
    pub shelter_id: i64,
    pub name: Option<String>,
    pub reason: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: IntakeStatus,
    pub created_at: DateTime<Utc>,
}

/// Raw filter values as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct IntakeListQuery {
    pub status: Option<String>,
    pub shelter_id: Option<i64>,
    pub from_dt: Option<String>,
    pub to_dt: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Validated, role-scoped filter shared by list, search, and CSV export.
///
/// Admin may target any shelter (or none); shelter-role callers are pinned
/// to their own shelter; public role is rejected outright.
#[derive(Debug, Clone)]
pub struct IntakeFilter {
    pub status: Option<IntakeStatus>,
    pub shelter_id: Option<i64>,
    pub from_dt: Option<DateTime<Utc>>,
    pub to_dt: Option<DateTime<Utc>>,
}

impl IntakeFilter {
    pub fn from_query(query: &IntakeListQuery, current_user: &AuthUser) -> Result<Self, ApiError> {
        let status = match &query.status {
            Some(raw) => Some(
                raw.trim()
                    .to_lowercase()
                    .parse::<IntakeStatus>()
                    .map_err(|_| ApiError::Validation("Invalid status".to_string()))?,
            ),
            None => None,
        };

        let from_dt = parse_datetime(query.from_dt.as_deref(), "from_dt")?;
        let to_dt = parse_datetime(query.to_dt.as_deref(), "to_dt")?;

        let shelter_id = match current_user.role {
            Role::Admin => query.shelter_id,
            Role::Shelter => Some(current_user.shelter_id.ok_or_else(|| {
                ApiError::Forbidden("Shelter role is not associated with a shelter".to_string())
            })?),
            Role::Public => return Err(ApiError::forbidden()),
        };

        Ok(Self {
            status,
            shelter_id,
            from_dt,
            to_dt,
        })
    }
}

fn parse_datetime(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse::<DateTime<Utc>>()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("{} must be an RFC 3339 datetime", field))),
    }
}

// Shared predicate for the filtered queries. Each `($n IS NULL OR ...)`
// clause collapses when the corresponding filter value is absent.
const FILTER_PREDICATE: &str = "($1::text IS NULL OR status = $1)
       AND ($2::bigint IS NULL OR shelter_id = $2)
       AND ($3::timestamptz IS NULL OR created_at >= $3)
       AND ($4::timestamptz IS NULL OR created_at <= $4)";

impl IntakeRequest {
    /// Find intake by id
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM intake_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new pending request
    pub async fn insert(
        shelter_id: i64,
        name: Option<&str>,
        reason: Option<&str>,
        eta: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO intake_requests (shelter_id, name, reason, eta, status)
             VALUES ($1, $2, $3, $4, 'pending')
             RETURNING *",
        )
        .bind(shelter_id)
        .bind(name)
        .bind(reason)
        .bind(eta)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Filtered rows, newest first. `page` of `None` returns the full
    /// result set (CSV export).
    pub async fn find_filtered(
        filter: &IntakeFilter,
        page: Option<&PageParams>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT * FROM intake_requests
             WHERE {}
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6",
            FILTER_PREDICATE
        );

        sqlx::query_as::<_, Self>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.shelter_id)
            .bind(filter.from_dt)
            .bind(filter.to_dt)
            // LIMIT NULL means no limit in Postgres
            .bind(page.map(PageParams::limit))
            .bind(page.map(PageParams::offset).unwrap_or(0))
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Count over the same predicate as `find_filtered`, before limit/offset.
    pub async fn count_filtered(filter: &IntakeFilter, pool: &PgPool) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM intake_requests WHERE {}",
            FILTER_PREDICATE
        );

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.shelter_id)
            .bind(filter.from_dt)
            .bind(filter.to_dt)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Raw list for one shelter, newest first.
    pub async fn find_by_shelter(shelter_id: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM intake_requests
             WHERE shelter_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(shelter_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Persist a status transition.
    pub async fn update_status(id: i64, status: IntakeStatus, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE intake_requests SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
