pub mod auth;
pub mod chat;
pub mod db;
pub mod notifications;
pub mod ocean;
pub mod session;

use axum::{extract::FromRef, http::StatusCode, response::{IntoResponse, Response}};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use chat::Chats;
use notifications::Feed;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    /// Every change to the bottle ledger pushes a fresh serialized snapshot
    /// onto this channel; `/ocean/ws` subscribers receive it.
    pub tide: broadcast::Sender<String>,
    pub chats: Chats,
    pub feed: Feed,
}

impl AppState {
    pub fn new(db_pool: SqlitePool) -> Self {
        AppState {
            db_pool,
            tide: broadcast::channel(64).0,
            chats: Chats::default(),
            feed: Feed::default(),
        }
    }
}

/// Domain failures. Handlers recover every one of these into a user-facing
/// status message; none of them becomes an error response.
#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error("that name is already taken")]
    DuplicateIdentity,
    #[error("wrong name or password")]
    InvalidCredential,
    #[error("no picks left today")]
    QuotaExhausted,
    #[error("no bottle with id {0}")]
    NotFound(String),
    #[error("remote read failed: {0}")]
    RemoteRead(sqlx::Error),
    #[error("remote write failed: {0}")]
    RemoteWrite(sqlx::Error),
}

/// First 10 characters of a message, the way notifications quote it.
pub fn excerpt(content: &str) -> String {
    content.chars().take(10).collect()
}

pub fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

pub type AppResult<T> = Result<T, AppError>;
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}\n\n{}", self.0, self.0.backtrace()),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
