use std::collections::HashSet;

use axum::{debug_handler, extract::{Path, State}, Json};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    excerpt,
    notifications::{Feed, NotificationKind},
    session::{LIKED_BOTTLES, STATUS_MESSAGE},
    AppResult, DriftError,
};

use super::{publish_tide, StatusReply};

/// Bumps the like counter and drops a LIKE notification onto the feed.
/// The ledger itself allows repeat likes; the idempotency guard lives in the
/// handler's session-held liked set.
pub async fn like_bottle(
    db_pool: &SqlitePool,
    feed: &Feed,
    bottle_id: &str,
) -> Result<(), DriftError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT content FROM bottles WHERE id=?")
        .bind(bottle_id)
        .fetch_optional(db_pool)
        .await
        .map_err(DriftError::RemoteRead)?;
    let Some((content,)) = row else {
        return Err(DriftError::NotFound(bottle_id.to_owned()));
    };

    sqlx::query("UPDATE bottles SET likes = likes + 1 WHERE id=?")
        .bind(bottle_id)
        .execute(db_pool)
        .await
        .map_err(DriftError::RemoteWrite)?;

    feed.emit(
        NotificationKind::Like,
        "收到新的喜欢❤️",
        format!("有人喜欢了你的漂流瓶：{}......", excerpt(&content)),
        Some(bottle_id),
    )
    .await;

    Ok(())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn like(
    Path(id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(tide): State<broadcast::Sender<String>>,
    State(feed): State<Feed>,
    session: Session,
) -> AppResult<Json<StatusReply>> {
    let mut liked: HashSet<String> = session.get(LIKED_BOTTLES).await?.unwrap_or_default();
    if liked.contains(&id) {
        // already liked from this session, quietly ignore
        return Ok(Json(StatusReply { message: None }));
    }

    let message = match like_bottle(&db_pool, &feed, &id).await {
        Ok(()) => {
            info!(%id, "bottle liked");
            liked.insert(id);
            session.insert(LIKED_BOTTLES, &liked).await?;
            publish_tide(&db_pool, &tide).await?;
            None
        }
        Err(DriftError::NotFound(_)) => {
            warn!(%id, "like on a bottle that is not in the ocean");
            Some("这个瓶子已经沉入海底了".to_owned())
        }
        Err(e) => {
            warn!(%id, error = %e, "like failed");
            Some("点赞失败，请检查网络".to_owned())
        }
    };

    if let Some(message) = &message {
        session.insert(STATUS_MESSAGE, message).await?;
    }
    Ok(Json(StatusReply { message }))
}
