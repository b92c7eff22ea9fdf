//! Registration, login, and profile routes.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::common::ApiError;
use crate::domains::auth::models::{Role, User, UserOut};
use crate::domains::auth::password::{hash_password, verify_password};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub shelter_id: Option<i64>,
}

fn default_role() -> Role {
    Role::Public
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    if !payload.email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // enforce unique email
    if User::find_by_email(&payload.email, &state.db_pool)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let hashed = hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    let user = User::insert(
        &payload.email,
        &hashed,
        payload.role,
        payload.shelter_id,
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = User::find_by_email(&payload.email, &state.db_pool).await?;

    let valid = match &user {
        Some(user) => verify_password(&payload.password, &user.hashed_password).unwrap_or(false),
        None => false,
    };

    let user = match (user, valid) {
        (Some(user), true) => user,
        _ => return Err(ApiError::Unauthenticated),
    };

    let token = state
        .jwt_service
        .create_token(user.id, user.role)
        .map_err(ApiError::Internal)?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}

async fn me(current_user: AuthUser) -> Json<UserOut> {
    Json(UserOut {
        id: current_user.id,
        email: current_user.email,
        role: current_user.role,
        shelter_id: current_user.shelter_id,
    })
}
