//! Slack alert service for login notifications
//!
//! Posts plain-text messages to a Slack incoming webhook.

use crate::utils::AppError;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Slack incoming webhook payload
#[derive(Debug, Serialize)]
pub struct SlackMessage<'a> {
    /// Message text, Slack emoji shortcodes are rendered
    pub text: &'a str,
}

/// Destination for rendered alert text
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    /// Deliver one message
    async fn send_text(&self, text: &str) -> Result<(), AppError>;
}

/// Slack webhook client
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    /// Webhook URL
    webhook_url: Url,
    /// HTTP client
    client: Client,
}

impl SlackWebhook {
    /// Create a new webhook client
    pub fn new(webhook_url: Url) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for SlackWebhook {
    #[instrument(skip(self, text), level = "debug")]
    async fn send_text(&self, text: &str) -> Result<(), AppError> {
        let payload = SlackMessage { text };

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send Slack webhook");
                AppError::delivery(format!("Failed to send Slack webhook: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Slack webhook returned error");
            return Err(AppError::delivery(format!(
                "Slack webhook error: {} - {}",
                status, body
            )));
        }

        debug!("Slack alert sent successfully");
        Ok(())
    }
}
