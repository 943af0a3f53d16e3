//! Log-only notification backend (development default)

use async_trait::async_trait;
use tracing::info;

use super::Notifier;
use crate::errors::Result;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!("[notify] to={} subject={:?} body={:?}", to, subject, body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }

    fn echoes_otp(&self) -> bool {
        true
    }
}
