//! Shelter CRUD routes.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::common::ApiError;
use crate::domains::auth::models::Role;
use crate::domains::shelters::models::{
    shelter::validate_coordinates, NewShelter, Shelter, ShelterPatch,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_shelters).post(create_shelter))
        .route(
            "/:shelter_id",
            get(get_shelter).patch(update_shelter).delete(delete_shelter),
        )
}

/// Create (admin or shelter role)
async fn create_shelter(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Json(payload): Json<NewShelter>,
) -> Result<(StatusCode, Json<Shelter>), ApiError> {
    current_user.require_role(&[Role::Admin, Role::Shelter])?;
    validate_coordinates(payload.geo_lat, payload.geo_lng)?;

    let shelter = Shelter::insert(&payload, &state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(shelter)))
}

/// List (public)
async fn list_shelters(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Shelter>>, ApiError> {
    let shelters = Shelter::find_all(&state.db_pool).await?;
    Ok(Json(shelters))
}

/// Get by id (public)
async fn get_shelter(
    Extension(state): Extension<AppState>,
    Path(shelter_id): Path<i64>,
) -> Result<Json<Shelter>, ApiError> {
    let shelter = Shelter::find_by_id(shelter_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shelter not found".to_string()))?;

    Ok(Json(shelter))
}

/// Sparse patch (admin or shelter role)
async fn update_shelter(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Path(shelter_id): Path<i64>,
    Json(payload): Json<ShelterPatch>,
) -> Result<Json<Shelter>, ApiError> {
    current_user.require_role(&[Role::Admin, Role::Shelter])?;

    let mut shelter = Shelter::find_by_id(shelter_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shelter not found".to_string()))?;

    shelter.apply_patch(payload);
    validate_coordinates(shelter.geo_lat, shelter.geo_lng)?;

    let shelter = shelter.update(&state.db_pool).await?;
    Ok(Json(shelter))
}

/// Delete (admin only); cascades to intake requests.
async fn delete_shelter(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Path(shelter_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    current_user.require_role(&[Role::Admin])?;

    let deleted = Shelter::delete(shelter_id, &state.db_pool).await?;
    if !deleted {
        return Err(ApiError::NotFound("Shelter not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
