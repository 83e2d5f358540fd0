//! Trade feed: fire-and-forget, topic-addressed notifications between views.
//!
//! Publishers do not wait for delivery. Each message is wrapped in an envelope
//! carrying the topic, the sending view and a UTC timestamp.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Topic on which account selection changes are announced.
pub const ACCOUNT_TOPIC: &str = "/account";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed closed: cannot publish on topic {topic}")]
    Closed { topic: String },

    #[error("cannot encode message for topic {topic}: {reason}")]
    Encode { topic: String, reason: String },
}

/// Envelope delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub topic: String,
    pub payload: serde_json::Value,
    #[serde(rename = "_from")]
    pub from: String,
    #[serde(rename = "_at")]
    pub at: DateTime<Utc>,
}

impl FeedMessage {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value, from: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload,
            from: from.into(),
            at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, FeedError> {
        serde_json::to_string(self).map_err(|e| FeedError::Encode {
            topic: self.topic.clone(),
            reason: e.to_string(),
        })
    }
}

/// Outbound notification channel.
pub trait TradeFeed: Send + Sync {
    /// Publish `payload` on `topic`. Returns once handed off; delivery is not awaited.
    fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), FeedError>;
}

/// Serialize `payload` and publish it.
pub fn publish_json<T: Serialize + ?Sized>(
    feed: &dyn TradeFeed,
    topic: &str,
    payload: &T,
) -> Result<(), FeedError> {
    let value = serde_json::to_value(payload).map_err(|e| FeedError::Encode {
        topic: topic.to_string(),
        reason: e.to_string(),
    })?;
    feed.publish(topic, value)
}

/// In-process topic bus. Subscribers get their own receiver per topic.
pub struct FeedBus {
    source: String,
    subscribers: Mutex<HashMap<String, Vec<Sender<FeedMessage>>>>,
}

impl FeedBus {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn subscribe(&self, topic: &str) -> Receiver<FeedMessage> {
        let (tx, rx) = mpsc::channel();
        self.lock().entry(topic.to_string()).or_default().push(tx);
        rx
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock().get(topic).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Sender<FeedMessage>>>> {
        // A poisoned map is still structurally valid; keep serving.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TradeFeed for FeedBus {
    fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), FeedError> {
        let message = FeedMessage::new(topic, payload, self.source.clone());
        log::debug!("PUBLISH -> {} {}", message.topic, message.payload);

        let mut subscribers = self.lock();
        if let Some(list) = subscribers.get_mut(topic) {
            list.retain(|tx| tx.send(message.clone()).is_ok());
        }
        Ok(())
    }
}
