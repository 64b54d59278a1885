use axum::{debug_handler, extract::{Path, State}, Json};
use serde::Serialize;
use tower_sessions::Session;

use crate::{session::USER_NAME, AppResult};

use super::{ChatMessage, Chats};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatMessageView {
    #[serde(flatten)]
    message: ChatMessage,
    is_me: bool,
}

// isMe is a per-viewer fact, so it is computed at read time rather than
// stored on the message.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn history(
    Path(bottle_id): Path<String>,
    State(chats): State<Chats>,
    session: Session,
) -> AppResult<Json<Vec<ChatMessageView>>> {
    let me = session.get::<String>(USER_NAME).await?;

    let views = chats
        .history(&bottle_id)
        .await
        .into_iter()
        .map(|message| ChatMessageView {
            is_me: Some(&message.sender_name) == me.as_ref(),
            message,
        })
        .collect();

    Ok(Json(views))
}
