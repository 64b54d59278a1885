use axum::{debug_handler, extract::State, Json};

use crate::AppResult;

use super::{Feed, Notification};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list(State(feed): State<Feed>) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(feed.list().await))
}
