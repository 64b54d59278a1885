use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_sessions::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{now_millis, session::{STATUS_MESSAGE, USER_NAME}, AppResult, DriftError};

use super::{publish_tide, Bottle, StatusReply, ANONYMOUS, MOOD_GOLD};

#[derive(Deserialize)]
pub(crate) struct ThrowForm {
    content: String,
}

/// Appends a fresh bottle to the ledger. The 100-character content bound is
/// the producing UI's concern, not enforced here.
pub async fn throw_bottle(
    db_pool: &SqlitePool,
    content: &str,
    sender_name: &str,
) -> Result<Bottle, DriftError> {
    let bottle = Bottle {
        id: Uuid::now_v7().to_string(),
        content: content.to_owned(),
        sender_name: sender_name.to_owned(),
        mood_color: MOOD_GOLD,
        likes: 0,
        timestamp: now_millis(),
    };

    sqlx::query(
        "INSERT INTO bottles (id,content,sender_name,mood_color,likes,timestamp) VALUES (?,?,?,?,?,?)",
    )
    .bind(&bottle.id)
    .bind(&bottle.content)
    .bind(&bottle.sender_name)
    .bind(bottle.mood_color)
    .bind(bottle.likes)
    .bind(bottle.timestamp)
    .execute(db_pool)
    .await
    .map_err(DriftError::RemoteWrite)?;

    Ok(bottle)
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn throw(
    State(db_pool): State<SqlitePool>,
    State(tide): State<broadcast::Sender<String>>,
    session: Session,
    Json(ThrowForm { content }): Json<ThrowForm>,
) -> AppResult<Json<StatusReply>> {
    let sender = session
        .get::<String>(USER_NAME)
        .await?
        .unwrap_or_else(|| ANONYMOUS.to_owned());

    let message = match throw_bottle(&db_pool, &content, &sender).await {
        Ok(bottle) => {
            info!(id = %bottle.id, %sender, "bottle thrown");
            publish_tide(&db_pool, &tide).await?;
            "漂流瓶已发出......".to_owned()
        }
        Err(e) => {
            warn!(error = %e, "throw failed");
            "海浪太大，发送失败".to_owned()
        }
    };

    session.insert(STATUS_MESSAGE, &message).await?;
    Ok(Json(StatusReply { message: Some(message) }))
}
