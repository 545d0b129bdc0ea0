//! Discord webhook delivery.
//!
//! Posts each [`Message`] as a single embed. An operator mention rides in
//! the payload `content` field, outside the embed, so Discord actually
//! pings.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::channel::{Message, NotifyChannel, NotifyError};

/// Environment variable holding the webhook URL.
const ENV_WEBHOOK_URL: &str = "VIGIL_WEBHOOK_URL";
/// Environment variable holding the Discord user id to mention.
const ENV_OPERATOR_ID: &str = "VIGIL_OPERATOR_ID";

/// Discord webhook channel.
pub struct DiscordWebhook {
    url: String,
    /// User id pinged when a message requests a mention.
    operator_id: Option<String>,
    client: reqwest::Client,
}

// ── wire types ──

#[derive(Debug, Serialize)]
struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    color: u32,
    fields: Vec<EmbedField>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, operator_id: Option<String>) -> Self {
        Self {
            url: url.into(),
            operator_id,
            client: reqwest::Client::new(),
        }
    }

    /// Build from environment. Returns `None` when no webhook URL is set,
    /// so callers can degrade to log-only operation.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ENV_WEBHOOK_URL).ok()?;
        let operator_id = std::env::var(ENV_OPERATOR_ID).ok();
        if operator_id.is_none() {
            tracing::debug!("{ENV_OPERATOR_ID} not set, mentions disabled");
        }
        Some(Self::new(url, operator_id))
    }

    fn payload(&self, message: &Message) -> WebhookPayload {
        let content = match (&self.operator_id, message.mention_operator) {
            (Some(id), true) => Some(format!("<@{id}>")),
            _ => None,
        };
        let fields = message
            .fields
            .iter()
            .map(|(name, value)| EmbedField {
                name: name.clone(),
                value: value.clone(),
                inline: true,
            })
            .collect();
        WebhookPayload {
            content,
            embeds: vec![Embed {
                title: message.title.clone(),
                color: message.color,
                fields,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            }],
        }
    }
}

impl NotifyChannel for DiscordWebhook {
    fn name(&self) -> &str {
        "discord"
    }

    fn send(
        &self,
        message: Message,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), NotifyError>> + Send + '_>>
    {
        let payload = self.payload(&message);
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(NotifyError::Rejected(status.as_u16()));
            }
            Ok(())
        })
    }
}
