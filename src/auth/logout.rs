use axum::{debug_handler, Json};
use tower_sessions::Session;

use crate::AppResult;

use super::AuthReply;

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Json<AuthReply>> {
    session.clear().await;
    Ok(Json(AuthReply { ok: true, message: None }))
}
