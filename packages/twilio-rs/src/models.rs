use serde::Deserialize;

/// Response from the Twilio Messages API after queueing an outbound SMS.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub from: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}
