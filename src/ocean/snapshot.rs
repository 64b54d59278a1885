use axum::{debug_handler, extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::warn;

use crate::{
    session::{PICK_QUOTA, STATUS_MESSAGE, USER_NAME},
    AppResult,
};

use super::{load_bottles, pick, Bottle, PickQuota, StatusReply};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OceanUiState {
    bottles: Vec<BottleView>,
    daily_picks_left: i64,
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BottleView {
    #[serde(flatten)]
    bottle: Bottle,
    is_mine: bool,
}

/// The full per-session ocean snapshot: the shared ledger view plus this
/// session's picks-left, liked guard and transient message.
#[debug_handler]
pub(crate) async fn ocean(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<OceanUiState>> {
    let me = session.get::<String>(USER_NAME).await?;
    let quota = session.get::<PickQuota>(PICK_QUOTA).await?;
    let message = session.get::<String>(STATUS_MESSAGE).await?;
    let daily_picks_left = pick::picks_left(quota, pick::today());

    let bottles = match load_bottles(&db_pool).await {
        Ok(bottles) => bottles,
        Err(e) => {
            warn!(error = %e, "ledger read failed");
            return Ok(Json(OceanUiState {
                bottles: Vec::new(),
                daily_picks_left,
                message: Some(format!("连接大海失败: {e}")),
            }));
        }
    };

    let bottles = bottles
        .into_iter()
        .map(|bottle| BottleView {
            is_mine: Some(&bottle.sender_name) == me.as_ref(),
            bottle,
        })
        .collect();

    Ok(Json(OceanUiState { bottles, daily_picks_left, message }))
}

/// Drops the transient status message once the GUI has shown it.
#[debug_handler]
pub(crate) async fn clear(session: Session) -> AppResult<Json<StatusReply>> {
    session.remove::<String>(STATUS_MESSAGE).await?;
    Ok(Json(StatusReply { message: None }))
}
