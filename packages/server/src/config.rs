use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const PROJECT_NAME: &str = "Shelter Capacity API";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
    pub email_enabled: bool,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub email_from: String,
    pub email_to_default: String,
    pub twilio_enabled: bool,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_from_number: Option<String>,
    pub test_sms_to: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "shelter-api".to_string()),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:5173,http://127.0.0.1:5173".to_string()
            })),
            email_enabled: parse_bool(env::var("EMAIL_ENABLED").ok()),
            mail_api_url: env::var("MAIL_API_URL").ok(),
            mail_api_key: env::var("MAIL_API_KEY").ok(),
            email_from: env::var("EMAIL_FROM").unwrap_or_default(),
            email_to_default: env::var("EMAIL_TO_DEFAULT").unwrap_or_default(),
            twilio_enabled: parse_bool(env::var("TWILIO_ENABLED").ok()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").ok(),
            twilio_from_number: env::var("TWILIO_FROM_NUMBER").ok(),
            test_sms_to: env::var("TEST_SMS_TO").ok(),
        })
    }
}

/// Parse a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("True") | Some("yes")
    )
}
