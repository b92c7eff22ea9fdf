use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Access role stored on each user.
///
/// admin: full access. shelter: scoped to one shelter. public: end-user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Shelter,
    Public,
}

#[derive(Debug, Error)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Shelter => "shelter",
            Role::Public => "public",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "shelter" => Ok(Role::Shelter),
            "public" => Ok(Role::Public),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub shelter_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Serialized user profile - never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub shelter_id: Option<i64>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            shelter_id: user.shelter_id,
        }
    }
}

impl User {
    /// Find user by id
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find user by email (unique)
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new user
    pub async fn insert(
        email: &str,
        hashed_password: &str,
        role: Role,
        shelter_id: Option<i64>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (email, hashed_password, role, shelter_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(email)
        .bind(hashed_password)
        .bind(role.as_str())
        .bind(shelter_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
