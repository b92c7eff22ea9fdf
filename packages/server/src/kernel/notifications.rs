//! Best-effort notification dispatch.
//!
//! Both entry points swallow transport failures: by the time they run, the
//! HTTP response has already been committed, so a failed email or SMS must
//! never surface to the caller and is only logged.

use tracing::{info, warn};
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::intake::models::IntakeRequest;
use crate::domains::shelters::models::Shelter;
use crate::kernel::mail::MailClient;

/// Configured SMS channel: Twilio client plus the destination number.
struct SmsChannel {
    twilio: TwilioService,
    destination: String,
}

pub struct Notifier {
    mail: MailClient,
    sms: Option<SmsChannel>,
}

impl Notifier {
    pub fn from_config(config: &Config) -> Self {
        let mail = if config.email_enabled && config.mail_api_url.is_some() {
            MailClient::new(
                config.mail_api_url.clone(),
                config.mail_api_key.clone(),
                config.email_from.clone(),
                config.email_to_default.clone(),
            )
        } else {
            MailClient::disabled()
        };

        // SMS needs the opt-in flag, full credentials, and a destination
        let sms = if config.twilio_enabled {
            match (
                &config.twilio_account_sid,
                &config.twilio_auth_token,
                &config.twilio_from_number,
                &config.test_sms_to,
            ) {
                (Some(sid), Some(token), Some(from), Some(to)) => Some(SmsChannel {
                    twilio: TwilioService::new(TwilioOptions {
                        account_sid: sid.clone(),
                        auth_token: token.clone(),
                        from_number: from.clone(),
                    }),
                    destination: to.clone(),
                }),
                _ => {
                    warn!("TWILIO_ENABLED is set but Twilio is not fully configured; SMS disabled");
                    None
                }
            }
        } else {
            None
        };

        Self { mail, sms }
    }

    /// Notifier with no transports; sends become log lines. Used in tests.
    pub fn disabled() -> Self {
        Self {
            mail: MailClient::disabled(),
            sms: None,
        }
    }

    /// Announce a newly submitted intake request to the shelter.
    pub async fn notify_new_intake(&self, shelter: &Shelter, intake: &IntakeRequest) {
        let subject = format!("New intake request for {}", shelter.name);
        let body = format!(
            "Shelter '{}' received new intake request:\n - Name: {}\n - Reason: {}\n - ETA: {}",
            shelter.name,
            intake.name.as_deref().unwrap_or("N/A"),
            intake.reason.as_deref().unwrap_or("N/A"),
            intake
                .eta
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| "unspecified".to_string()),
        );

        if let Err(e) = self.mail.send(None, &subject, &body).await {
            warn!(error = %e, intake_id = intake.id, "Intake email notification failed");
        }

        let sms_body = format!(
            "New intake request for {}: {}",
            shelter.name,
            intake.name.as_deref().unwrap_or("anonymous"),
        );
        self.send_sms(&sms_body, intake.id).await;
    }

    /// Announce a status transition for an intake request.
    pub async fn notify_status_change(&self, shelter: &Shelter, intake: &IntakeRequest) {
        let sms_body = format!(
            "Intake request #{} at {} ({}) is now {}",
            intake.id, shelter.name, shelter.address, intake.status,
        );
        self.send_sms(&sms_body, intake.id).await;
    }

    async fn send_sms(&self, body: &str, intake_id: i64) {
        let channel = match &self.sms {
            Some(channel) => channel,
            None => {
                info!(intake_id = intake_id, "SMS not configured; skipping");
                return;
            }
        };

        match channel.twilio.send_message(&channel.destination, body).await {
            Ok(response) => {
                info!(
                    intake_id = intake_id,
                    sid = %response.sid,
                    "SMS notification queued"
                );
            }
            Err(e) => {
                warn!(intake_id = intake_id, error = e, "SMS notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::intake::models::IntakeStatus;
    use chrono::Utc;

    fn sample_shelter() -> Shelter {
        Shelter {
            id: 1,
            name: "Harbor Light".to_string(),
            address: "1010 Currie Ave".to_string(),
            geo_lat: 44.97,
            geo_lng: -93.28,
            phone: None,
            policies: None,
            hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_intake() -> IntakeRequest {
        IntakeRequest {
            id: 12,
            shelter_id: 1,
            name: None,
            reason: None,
            eta: None,
            status: IntakeStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_disabled_notifier_never_panics() {
        let notifier = Notifier::disabled();
        notifier
            .notify_new_intake(&sample_shelter(), &sample_intake())
            .await;
        notifier
            .notify_status_change(&sample_shelter(), &sample_intake())
            .await;
    }
}
