use axum::routing::get;
use axum::{extract::Extension, http::StatusCode, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::PROJECT_NAME;
use crate::server::app::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/db-check", get(db_check_handler))
}

/// Liveness probe. Deliberately does not touch the database; use
/// /db-check for storage reachability.
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn version_handler() -> Json<Value> {
    Json(json!({
        "project": PROJECT_NAME,
        "api_version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Serialize)]
pub struct DbCheckResponse {
    status: String,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
}

/// Storage reachability probe
///
/// Returns 200 OK if the database answers a trivial query within 5s,
/// 503 Service Unavailable otherwise.
async fn db_check_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<DbCheckResponse>) {
    let db_health = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.db_pool),
    )
    .await
    {
        Ok(Ok(_)) => DatabaseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "error".to_string(),
            error: Some(format!("Query failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("Query timeout (>5s)".to_string()),
        },
    };

    let pool_health = ConnectionPoolHealth {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
    };

    let is_healthy = db_health.status == "ok";

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(DbCheckResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            database: db_health,
            connection_pool: pool_health,
        }),
    )
}
