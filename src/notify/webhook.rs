use super::message::ChangeMessage;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

const EMBED_COLOR: u32 = 0x51D1EC;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook rejected message: {0}")]
    Rejected(reqwest::StatusCode),
}

/// Delivery boundary for rendered messages. One attempt per call; retrying
/// is the caller's policy, not the adapter's.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, message: &ChangeMessage) -> Result<(), NotifyError>;
}

/// Posts messages as Discord embeds to a webhook URL.
pub struct DiscordWebhook {
    url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn payload(message: &ChangeMessage) -> serde_json::Value {
        let mut embed = json!({
            "author": { "name": message.author_line },
            "color": EMBED_COLOR,
            "description": message.body,
        });

        if let Some(footer) = &message.footer {
            embed["footer"] = json!({ "text": footer });
            embed["timestamp"] = json!(chrono::Utc::now().to_rfc3339());
        }

        json!({ "embeds": [embed] })
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn deliver(&self, message: &ChangeMessage) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&Self::payload(message))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(resp.status()))
        }
    }
}
