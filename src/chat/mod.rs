mod history;
mod reply;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::{now_millis, AppState};

pub use reply::send_reply;

/// The scripted counterpart that answers every reply, one second later.
pub const COUNTERPART_SENDER: &str = "对方";
pub const COUNTERPART_TEXT: &str = "收到！英雄所见略同";
pub const COUNTERPART_DELAY: Duration = Duration::from_secs(1);

pub fn router() -> Router<AppState> {
    Router::new().route("/{bottle_id}", get(history::history).post(reply::reply))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(sender_name: &str, content: &str) -> Self {
        ChatMessage {
            id: Uuid::now_v7().to_string(),
            sender_name: sender_name.to_owned(),
            content: content.to_owned(),
            timestamp: now_millis(),
        }
    }
}

#[derive(Default)]
struct Thread {
    messages: Vec<ChatMessage>,
    pending_reply: Option<JoinHandle<()>>,
}

/// Per-bottle chat threads, in process memory only. Each thread holds at
/// most one pending counterpart timer; scheduling a new one aborts the old.
#[derive(Clone, Default)]
pub struct Chats {
    inner: Arc<Mutex<HashMap<String, Thread>>>,
}

impl Chats {
    /// Oldest first; an unknown bottle id just has an empty history.
    pub async fn history(&self, bottle_id: &str) -> Vec<ChatMessage> {
        self.inner
            .lock()
            .await
            .get(bottle_id)
            .map(|thread| thread.messages.clone())
            .unwrap_or_default()
    }

    async fn append(&self, bottle_id: &str, message: ChatMessage) {
        self.inner
            .lock()
            .await
            .entry(bottle_id.to_owned())
            .or_default()
            .messages
            .push(message);
    }

    async fn schedule_counterpart(&self, bottle_id: &str) {
        let chats = self.clone();
        let id = bottle_id.to_owned();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(COUNTERPART_DELAY).await;
            debug!(bottle_id = %id, "counterpart replies");
            chats
                .append(&id, ChatMessage::new(COUNTERPART_SENDER, COUNTERPART_TEXT))
                .await;
        });

        let mut threads = self.inner.lock().await;
        let thread = threads.entry(bottle_id.to_owned()).or_default();
        if let Some(previous) = thread.pending_reply.replace(timer) {
            previous.abort();
        }
    }
}
