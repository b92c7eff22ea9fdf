use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

/// Transactional mail relay client.
///
/// Posts JSON to a configured relay endpoint. Disabled unless an endpoint
/// is configured; when disabled it logs the message instead of sending,
/// so development environments see exactly what would have gone out.
pub struct MailClient {
    client: Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    to_default: String,
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailClient {
    pub fn new(
        api_url: Option<String>,
        api_key: Option<String>,
        from: String,
        to_default: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
            to_default,
        }
    }

    /// Client with no transport; every send falls through to the log stub.
    pub fn disabled() -> Self {
        Self::new(None, None, String::new(), String::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some()
    }

    /// Send an email, falling back to `to_default` when no recipient is
    /// given. With no relay configured, logs the message and returns Ok.
    pub async fn send(&self, to: Option<&str>, subject: &str, text: &str) -> Result<()> {
        let to = to.unwrap_or(&self.to_default);

        let api_url = match &self.api_url {
            Some(url) => url,
            None => {
                info!(subject = subject, "[mail stub] {}", text);
                return Ok(());
            }
        };

        let message = MailMessage {
            from: &self.from,
            to,
            subject,
            text,
        };

        let mut request = self.client.post(api_url).json(&message);

        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        info!("Sending email to: {}", to);

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("Mail relay failed {}: {}", status, body);
            anyhow::bail!("Mail relay error {}: {}", status, body);
        }

        info!("Email sent successfully");
        Ok(())
    }
}
