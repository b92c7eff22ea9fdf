//! Capacity log routes.

use axum::extract::{Extension, Path};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::auth::models::Role;
use crate::domains::capacity::models::CapacityLog;
use crate::domains::shelters::models::Shelter;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// The raw-log read returns at most this many rows.
const CAPACITY_LOG_LIMIT: i64 = 20;

pub fn router() -> Router {
    Router::new().route(
        "/:shelter_id",
        get(list_capacity_logs).post(update_capacity),
    )
}

#[derive(Debug, Deserialize)]
pub struct CapacityUpdate {
    pub beds_total: i32,
    pub beds_available: i32,
}

/// Latest capacity logs for a shelter (public)
async fn list_capacity_logs(
    Extension(state): Extension<AppState>,
    Path(shelter_id): Path<i64>,
) -> Result<Json<Vec<CapacityLog>>, ApiError> {
    let logs = CapacityLog::find_latest(shelter_id, CAPACITY_LOG_LIMIT, &state.db_pool).await?;
    Ok(Json(logs))
}

/// Append a capacity snapshot (admin or shelter role)
async fn update_capacity(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Path(shelter_id): Path<i64>,
    Json(payload): Json<CapacityUpdate>,
) -> Result<Json<CapacityLog>, ApiError> {
    current_user.require_role(&[Role::Admin, Role::Shelter])?;

    if Shelter::find_by_id(shelter_id, &state.db_pool)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Shelter not found".to_string()));
    }

    // validation: available <= total (reject, never clamp)
    if payload.beds_available > payload.beds_total {
        return Err(ApiError::BadRequest(
            "beds_available cannot exceed beds_total".to_string(),
        ));
    }

    let log = CapacityLog::insert(
        shelter_id,
        payload.beds_total,
        payload.beds_available,
        current_user.id,
        &state.db_pool,
    )
    .await?;

    Ok(Json(log))
}
