//! SendGrid notification backend
//!
//! Delivers through the v3 mail/send HTTP API. The ureq client is blocking,
//! so calls run on the blocking thread pool.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::Notifier;
use crate::errors::{AgentHubError, Result};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridNotifier {
    api_key: String,
    from_email: String,
}

impl SendGridNotifier {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self { api_key, from_email }
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": body }],
        });

        let api_key = self.api_key.clone();
        let to_owned = to.to_string();

        let status = tokio::task::spawn_blocking(move || {
            ureq::post(SENDGRID_URL)
                .header("Authorization", &format!("Bearer {}", api_key))
                .send_json(&payload)
                .map(|response| response.status().as_u16())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| AgentHubError::notify(format!("Notify task panicked: {}", e)))?
        .map_err(AgentHubError::notify)?;

        if !(200..300).contains(&status) {
            return Err(AgentHubError::notify(format!(
                "SendGrid returned status {} for {}",
                status, to_owned
            )));
        }

        debug!("SendGrid delivery accepted for {}", to_owned);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
