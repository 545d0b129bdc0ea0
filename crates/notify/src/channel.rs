use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// A formatted alert ready for delivery: a title, a 24-bit accent color,
/// and ordered label→value fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    /// 24-bit RGB accent color.
    pub color: u32,
    /// Label → display value pairs, rendered in order.
    pub fields: Vec<(String, String)>,
    /// Ping the configured operator in addition to posting the message.
    pub mention_operator: bool,
}

impl Message {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            fields: Vec::new(),
            mention_operator: false,
        }
    }

    /// Append one field.
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    /// Request an operator mention on delivery.
    pub fn mention(mut self) -> Self {
        self.mention_operator = true;
        self
    }
}

/// Error type for notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("channel not configured: {0}")]
    NotConfigured(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("service rejected payload: status {0}")]
    Rejected(u16),
}

/// Trait for outbound notification channels (Discord webhook, etc.).
///
/// `send` is best-effort: implementations report failure but must not
/// retry, and callers are free to ignore the result.
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &str;

    fn send(
        &self,
        message: Message,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>>;
}

/// Mock channel for testing. Records every message it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    sent: Arc<Mutex<Vec<Message>>>,
    /// When true, every send returns `RequestFailed`.
    pub fail: bool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    /// Messages recorded so far (failed sends included).
    pub fn messages(&self) -> Vec<Message> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl NotifyChannel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    fn send(
        &self,
        message: Message,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(NotifyError::RequestFailed("mock failure".into()))
            } else {
                Ok(())
            }
        })
    }
}
