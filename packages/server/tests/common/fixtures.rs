//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shelter_core::domains::auth::models::{Role, User};
use shelter_core::domains::auth::password::hash_password;
use shelter_core::domains::intake::models::IntakeRequest;
use shelter_core::domains::shelters::models::{NewShelter, Shelter};

/// Every fixture user logs in with this password.
pub const TEST_PASSWORD: &str = "sheltering-arms-1";

/// Create a test shelter with sensible defaults
pub async fn create_test_shelter(pool: &PgPool, name: &str) -> Result<Shelter> {
    Shelter::insert(
        &NewShelter {
            name: name.to_string(),
            address: "1010 Currie Ave, Minneapolis, MN".to_string(),
            geo_lat: 44.9778,
            geo_lng: -93.2650,
            phone: Some("612-555-0100".to_string()),
            policies: None,
            hours: Some("24/7".to_string()),
        },
        pool,
    )
    .await
}

/// Create a test user with the given role, hashed `TEST_PASSWORD`
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    role: Role,
    shelter_id: Option<i64>,
) -> Result<User> {
    let hashed = hash_password(TEST_PASSWORD).map_err(|e| anyhow::anyhow!("{}", e))?;
    User::insert(email, &hashed, role, shelter_id, pool).await
}

/// Create a pending intake request for a shelter
pub async fn create_test_intake(
    pool: &PgPool,
    shelter_id: i64,
    name: Option<&str>,
) -> Result<IntakeRequest> {
    create_test_intake_full(pool, shelter_id, name, Some("needs a bed tonight"), None).await
}

/// Create a pending intake request with full control over optional fields
pub async fn create_test_intake_full(
    pool: &PgPool,
    shelter_id: i64,
    name: Option<&str>,
    reason: Option<&str>,
    eta: Option<DateTime<Utc>>,
) -> Result<IntakeRequest> {
    IntakeRequest::insert(shelter_id, name, reason, eta, pool).await
}
