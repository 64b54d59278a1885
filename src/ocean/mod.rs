mod like;
mod pick;
mod snapshot;
mod throw;
mod ws;

use axum::{routing::{get, post}, Router};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::{now_millis, AppState, DriftError};

pub use like::like_bottle;
pub use pick::{picks_left, take_pick, today, PickQuota, DAILY_PICKS};
pub use throw::throw_bottle;

pub const ANONYMOUS: &str = "Anonymous";
pub const MOOD_GOLD: i64 = 0xFFFFD700;

/// What first-time visitors find floating around.
const SAMPLE_MESSAGES: [&str; 6] = [
    "概率论求过！😖",
    "今天食堂的红烧肉真好吃。",
    "有没有人一起去图书馆？",
    "想去操场看星星。✨",
    "围棋社招人中！",
    "听了一首老歌，突然很想家。",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(snapshot::ocean))
        .route("/ws", get(ws::ocean_ws))
        .route("/throw", post(throw::throw))
        .route("/pick/{id}", post(pick::pick))
        .route("/like/{id}", post(like::like))
        .route("/clear", post(snapshot::clear))
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bottle {
    pub id: String,
    pub content: String,
    pub sender_name: String,
    pub mood_color: i64,
    pub likes: i64,
    pub timestamp: i64,
}

#[derive(Serialize)]
pub(crate) struct StatusReply {
    pub(crate) message: Option<String>,
}

/// The shared ledger view: newest first, capped at 50. UUIDv7 ids break
/// same-millisecond timestamp ties in insertion order.
pub async fn load_bottles(db_pool: &SqlitePool) -> Result<Vec<Bottle>, DriftError> {
    sqlx::query_as(
        "SELECT id,content,sender_name,mood_color,likes,timestamp FROM bottles
         ORDER BY timestamp DESC, id DESC LIMIT 50",
    )
    .fetch_all(db_pool)
    .await
    .map_err(DriftError::RemoteRead)
}

/// Pushes the current ledger view to every `/ocean/ws` subscriber.
pub async fn publish_tide(
    db_pool: &SqlitePool,
    tide: &broadcast::Sender<String>,
) -> Result<(), DriftError> {
    let bottles = load_bottles(db_pool).await?;
    if let Ok(snapshot) = serde_json::to_string(&bottles) {
        let _ = tide.send(snapshot);
    }
    Ok(())
}

pub async fn seed_if_empty(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bottles")
        .fetch_one(db_pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    info!("empty ocean, dropping in sample bottles");
    for content in SAMPLE_MESSAGES {
        sqlx::query(
            "INSERT INTO bottles (id,content,sender_name,mood_color,likes,timestamp) VALUES (?,?,?,?,?,?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(content)
        .bind(ANONYMOUS)
        .bind(MOOD_GOLD)
        .bind(rand::rng().random_range(0..=5i64))
        .bind(now_millis())
        .execute(db_pool)
        .await?;
    }

    Ok(())
}
