//! Delivery notifications.

use async_trait::async_trait;
use tracing::info;

/// Receives one `(sender, otp, subject)` triple per delivered message.
///
/// Fire-and-forget: the service logs a failing sink and moves on, so an
/// implementation can never stall or fail the store-write path.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, sender: &str, otp: Option<&str>, subject: &str) -> anyhow::Result<()>;
}

/// Default sink: a structured log line per delivery.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, sender: &str, otp: Option<&str>, subject: &str) -> anyhow::Result<()> {
        info!(sender, otp = otp.unwrap_or("-"), subject, "Message delivered");
        Ok(())
    }
}
