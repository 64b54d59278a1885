use axum::{debug_handler, Json};
use serde::Serialize;
use tower_sessions::Session;

use crate::{session::USER_NAME, AppResult};

#[derive(Serialize)]
pub(crate) struct MeReply {
    name: Option<String>,
}

#[debug_handler]
pub(crate) async fn me(session: Session) -> AppResult<Json<MeReply>> {
    let name = session.get::<String>(USER_NAME).await?;
    Ok(Json(MeReply { name }))
}
