//! Outbound notification backends
//!
//! Email delivery sits behind the `Notifier` trait so the OTP flow and the
//! admin workflow notifications do not care which transport is configured.
//! Delivery failures are logged by the callers and never fail the request
//! that triggered them.

mod log;
mod sendgrid;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::EmailConfig;
use crate::errors::Result;

pub use log::LogNotifier;
pub use sendgrid::SendGridNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;

    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Whether OTP codes may be echoed in API responses (development-only
    /// behavior of the log backend, mirroring the upstream product before
    /// real email delivery was wired up)
    fn echoes_otp(&self) -> bool {
        false
    }
}

/// Build the configured notifier backend
pub fn notifier_from_config(config: &EmailConfig) -> Arc<dyn Notifier> {
    match config.provider.as_str() {
        "sendgrid" if !config.sendgrid_api_key.is_empty() => Arc::new(SendGridNotifier::new(
            config.sendgrid_api_key.clone(),
            config.from_email.clone(),
        )),
        "sendgrid" => {
            warn!("sendgrid provider selected but no API key configured; falling back to log");
            Arc::new(LogNotifier)
        }
        "log" => Arc::new(LogNotifier),
        other => {
            warn!("Unknown email provider '{}'; falling back to log", other);
            Arc::new(LogNotifier)
        }
    }
}

/// Fire-and-forget delivery: spawn, log on failure, never propagate
pub fn send_detached(notifier: Arc<dyn Notifier>, to: String, subject: String, body: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&to, &subject, &body).await {
            warn!("Notification to {} failed: {}", to, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_from_config_log_default() {
        let config = EmailConfig::default();
        let notifier = notifier_from_config(&config);
        assert_eq!(notifier.name(), "log");
        assert!(notifier.echoes_otp());
    }

    #[test]
    fn test_notifier_from_config_sendgrid_without_key_falls_back() {
        let config = EmailConfig {
            provider: "sendgrid".to_string(),
            sendgrid_api_key: String::new(),
            from_email: "noreply@example.com".to_string(),
        };
        let notifier = notifier_from_config(&config);
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn test_notifier_from_config_sendgrid() {
        let config = EmailConfig {
            provider: "sendgrid".to_string(),
            sendgrid_api_key: "SG.test".to_string(),
            from_email: "noreply@example.com".to_string(),
        };
        let notifier = notifier_from_config(&config);
        assert_eq!(notifier.name(), "sendgrid");
        assert!(!notifier.echoes_otp());
    }
}
