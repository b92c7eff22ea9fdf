use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;

use crate::common::ApiError;

/// Shelter model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub geo_lat: f64,
    pub geo_lng: f64,
    pub phone: Option<String>,
    pub policies: Option<String>,
    pub hours: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload.
#[derive(Debug, Deserialize)]
pub struct NewShelter {
    pub name: String,
    pub address: String,
    pub geo_lat: f64,
    pub geo_lng: f64,
    pub phone: Option<String>,
    pub policies: Option<String>,
    pub hours: Option<String>,
}

/// Sparse patch: only fields present in the request body are applied.
///
/// Nullable columns use a double `Option` so an explicit `"phone": null`
/// clears the value while an absent key leaves it untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ShelterPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub policies: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub hours: Option<Option<String>>,
}

/// Distinguishes a key set to null (`Some(None)`) from an absent key (`None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Reject coordinates outside valid latitude/longitude ranges.
pub fn validate_coordinates(geo_lat: f64, geo_lng: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&geo_lat) {
        return Err(ApiError::Validation(
            "geo_lat must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&geo_lng) {
        return Err(ApiError::Validation(
            "geo_lng must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

impl Shelter {
    /// Find shelter by id
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM shelters WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All shelters, newest id first. Unpaginated; a known scale limit.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM shelters ORDER BY id DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new shelter
    pub async fn insert(new: &NewShelter, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO shelters (name, address, geo_lat, geo_lng, phone, policies, hours)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.address)
        .bind(new.geo_lat)
        .bind(new.geo_lng)
        .bind(&new.phone)
        .bind(&new.policies)
        .bind(&new.hours)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Persist the full record after a patch has been applied in memory.
    pub async fn update(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE shelters
             SET name = $2, address = $3, geo_lat = $4, geo_lng = $5,
                 phone = $6, policies = $7, hours = $8, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.address)
        .bind(self.geo_lat)
        .bind(self.geo_lng)
        .bind(&self.phone)
        .bind(&self.policies)
        .bind(&self.hours)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete shelter; intake requests cascade via the foreign key.
    pub async fn delete(id: i64, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shelters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply a sparse patch in memory.
    pub fn apply_patch(&mut self, patch: ShelterPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(geo_lat) = patch.geo_lat {
            self.geo_lat = geo_lat;
        }
        if let Some(geo_lng) = patch.geo_lng {
            self.geo_lng = geo_lng;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(policies) = patch.policies {
            self.policies = policies;
        }
        if let Some(hours) = patch.hours {
            self.hours = hours;
        }
    }
}
