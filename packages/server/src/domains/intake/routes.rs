//! Intake routes: public submission, role-scoped list/search/export, and
//! status transitions.

use axum::extract::{Extension, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{ApiError, Page, PageParams};
use crate::domains::auth::models::Role;
use crate::domains::intake::models::{IntakeFilter, IntakeRequest, IntakeStatus};
use crate::domains::intake::models::intake_request::IntakeListQuery;
use crate::domains::shelters::models::Shelter;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_intakes).post(create_intake))
        .route("/search", get(search_intakes))
        .route("/export.csv", get(export_intakes_csv))
        .route("/:shelter_id", get(list_intakes_for_shelter))
        .route("/:intake_id/status", patch(update_intake_status))
}

#[derive(Debug, Deserialize)]
pub struct IntakeCreate {
    pub shelter_id: i64,
    pub name: Option<String>,
    pub reason: Option<String>,
    pub eta: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct IntakeStatusUpdate {
    pub status: IntakeStatus,
}

/// Public: submit intake request
async fn create_intake(
    Extension(state): Extension<AppState>,
    Json(payload): Json<IntakeCreate>,
) -> Result<(StatusCode, Json<IntakeRequest>), ApiError> {
    let shelter = Shelter::find_by_id(payload.shelter_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shelter not found".to_string()))?;

    let intake = IntakeRequest::insert(
        payload.shelter_id,
        payload.name.as_deref(),
        payload.reason.as_deref(),
        payload.eta,
        &state.db_pool,
    )
    .await?;

    // Fire-and-forget: runs after the response is produced and cannot
    // affect the committed insert.
    let notifier = state.notifier.clone();
    let intake_for_notify = intake.clone();
    tokio::spawn(async move {
        notifier.notify_new_intake(&shelter, &intake_for_notify).await;
    });

    Ok((StatusCode::CREATED, Json(intake)))
}

/// Role-aware list with filters (bare array)
async fn list_intakes(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Query(query): Query<IntakeListQuery>,
) -> Result<Json<Vec<IntakeRequest>>, ApiError> {
    let filter = IntakeFilter::from_query(&query, &current_user)?;
    let params = PageParams::validate(query.page, query.page_size)?;

    let items = IntakeRequest::find_filtered(&filter, Some(&params), &state.db_pool).await?;
    Ok(Json(items))
}

/// Same filters as the list, paged envelope
async fn search_intakes(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Query(query): Query<IntakeListQuery>,
) -> Result<Json<Page<IntakeRequest>>, ApiError> {
    let filter = IntakeFilter::from_query(&query, &current_user)?;
    let params = PageParams::validate(query.page, query.page_size)?;

    let total = IntakeRequest::count_filtered(&filter, &state.db_pool).await?;
    let items = IntakeRequest::find_filtered(&filter, Some(&params), &state.db_pool).await?;

    Ok(Json(Page::new(items, total, &params)))
}

/// Same filters, full result set as a CSV attachment
async fn export_intakes_csv(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Query(query): Query<IntakeListQuery>,
) -> Result<Response, ApiError> {
    let filter = IntakeFilter::from_query(&query, &current_user)?;

    let rows = IntakeRequest::find_filtered(&filter, None, &state.db_pool).await?;
    let body = render_csv(&rows);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"intakes.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Admin/shelter: raw list for one shelter
async fn list_intakes_for_shelter(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Path(shelter_id): Path<i64>,
) -> Result<Json<Vec<IntakeRequest>>, ApiError> {
    current_user.require_role(&[Role::Admin, Role::Shelter])?;

    // Shelter role only sees its own shelter
    if current_user.role == Role::Shelter && current_user.shelter_id != Some(shelter_id) {
        return Err(ApiError::forbidden());
    }

    let items = IntakeRequest::find_by_shelter(shelter_id, &state.db_pool).await?;
    Ok(Json(items))
}

/// Status transition: admin may update any intake; shelter role only
/// intakes of its own shelter.
async fn update_intake_status(
    Extension(state): Extension<AppState>,
    current_user: AuthUser,
    Path(intake_id): Path<i64>,
    Json(payload): Json<IntakeStatusUpdate>,
) -> Result<Json<IntakeRequest>, ApiError> {
    let intake = IntakeRequest::find_by_id(intake_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Intake not found".to_string()))?;

    match current_user.role {
        Role::Admin => {}
        Role::Shelter => {
            if current_user.shelter_id != Some(intake.shelter_id) {
                return Err(ApiError::forbidden());
            }
        }
        Role::Public => return Err(ApiError::forbidden()),
    }

    // Only do work if the status actually changes
    if intake.status == payload.status {
        return Ok(Json(intake));
    }

    let intake = IntakeRequest::update_status(intake_id, payload.status, &state.db_pool).await?;

    if let Some(shelter) = Shelter::find_by_id(intake.shelter_id, &state.db_pool).await? {
        let notifier = state.notifier.clone();
        let intake_for_notify = intake.clone();
        tokio::spawn(async move {
            notifier
                .notify_status_change(&shelter, &intake_for_notify)
                .await;
        });
    }

    Ok(Json(intake))
}

/// Render rows in the fixed export column order. Empty strings, never
/// "None"/"null", for absent optional fields.
fn render_csv(rows: &[IntakeRequest]) -> String {
    let mut out = String::from("id,shelter_id,name,reason,eta,status,created_at\n");

    for row in rows {
        let fields = [
            row.id.to_string(),
            row.shelter_id.to_string(),
            row.name.clone().unwrap_or_default(),
            row.reason.clone().unwrap_or_default(),
            row.eta.map(|dt| dt.to_rfc3339()).unwrap_or_default(),
            row.status.to_string(),
            row.created_at.to_rfc3339(),
        ];

        let line: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a delimiter, quote, or line break;
/// inner quotes are doubled per RFC 4180.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
