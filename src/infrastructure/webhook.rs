//! # Webhook Review Channel
//!
//! Delivers report summaries by POSTing JSON to an HTTP endpoint.
//! Any non-2xx answer counts as a failed delivery.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::traits::NotificationChannel;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

pub struct WebhookChannel {
    client: reqwest::Client,
    url: String,
}

impl WebhookChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn deliver(&self, summary: &str) -> Result<(), String> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text: summary })
            .send()
            .await
            .map_err(|e| format!("webhook request failed: {e}"))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("webhook answered {status}"))
        }
    }
}
