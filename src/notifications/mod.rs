mod list;

use std::collections::VecDeque;
use std::sync::Arc;

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Like,
    Reply,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub content: String,
    pub related_bottle_id: Option<String>,
    pub kind: NotificationKind,
}

/// Process-wide event feed, strictly newest first. No dedup, no capacity
/// bound, no read/unread state, no persistence.
#[derive(Clone, Default)]
pub struct Feed {
    inner: Arc<Mutex<VecDeque<Notification>>>,
}

impl Feed {
    pub async fn emit(
        &self,
        kind: NotificationKind,
        title: &str,
        content: String,
        related_bottle_id: Option<&str>,
    ) {
        self.inner.lock().await.push_front(Notification {
            id: Uuid::now_v7().to_string(),
            title: title.to_owned(),
            content,
            related_bottle_id: related_bottle_id.map(str::to_owned),
            kind,
        });
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.inner.lock().await.iter().cloned().collect()
    }
}
