use axum::{debug_handler, extract::{Path, State}, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    excerpt,
    notifications::{Feed, NotificationKind},
    session::USER_NAME,
    AppResult, DriftError,
};

use super::{ChatMessage, Chats};

/// Appends the sender's message, emits a REPLY notification, and schedules
/// the counterpart's answer. Replying into the void is refused: the bottle
/// has to exist in the ledger.
pub async fn send_reply(
    db_pool: &SqlitePool,
    chats: &Chats,
    feed: &Feed,
    bottle_id: &str,
    content: &str,
    sender_name: &str,
) -> Result<(), DriftError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM bottles WHERE id=?")
        .bind(bottle_id)
        .fetch_optional(db_pool)
        .await
        .map_err(DriftError::RemoteRead)?;
    if exists.is_none() {
        return Err(DriftError::NotFound(bottle_id.to_owned()));
    }

    chats
        .append(bottle_id, ChatMessage::new(sender_name, content))
        .await;

    feed.emit(
        NotificationKind::Reply,
        "收到新回复💬",
        format!("有人回复了你：{}......", excerpt(content)),
        Some(bottle_id),
    )
    .await;

    chats.schedule_counterpart(bottle_id).await;

    Ok(())
}

#[derive(Deserialize)]
pub(crate) struct ReplyForm {
    content: String,
}

#[derive(Serialize)]
pub(crate) struct ReplyReply {
    ok: bool,
    message: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn reply(
    Path(bottle_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(chats): State<Chats>,
    State(feed): State<Feed>,
    session: Session,
    Json(ReplyForm { content }): Json<ReplyForm>,
) -> AppResult<Json<ReplyReply>> {
    let sender = session
        .get::<String>(USER_NAME)
        .await?
        .unwrap_or_else(|| "我".to_owned());

    match send_reply(&db_pool, &chats, &feed, &bottle_id, &content, &sender).await {
        Ok(()) => {
            info!(%bottle_id, "reply sent");
            Ok(Json(ReplyReply { ok: true, message: None }))
        }
        Err(DriftError::NotFound(_)) => {
            warn!(%bottle_id, "reply to a bottle that is not in the ocean");
            Ok(Json(ReplyReply {
                ok: false,
                message: Some("这个瓶子已经沉入海底了".to_owned()),
            }))
        }
        Err(e) => {
            warn!(%bottle_id, error = %e, "reply failed");
            Ok(Json(ReplyReply {
                ok: false,
                message: Some("海浪太大，发送失败".to_owned()),
            }))
        }
    }
}
