use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::{session::USER_NAME, AppResult, DriftError};

use super::{AuthReply, CredentialsForm};

/// Exact plaintext comparison against the stored password. An unknown name
/// and a wrong password are deliberately indistinguishable.
pub async fn check_login(
    db_pool: &SqlitePool,
    name: &str,
    password: &str,
) -> Result<(), DriftError> {
    let stored: Option<(String,)> = sqlx::query_as("SELECT password FROM users WHERE name=?")
        .bind(name)
        .fetch_optional(db_pool)
        .await
        .map_err(DriftError::RemoteRead)?;

    match stored {
        Some((stored,)) if stored == password => Ok(()),
        _ => Err(DriftError::InvalidCredential),
    }
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(CredentialsForm { name, password }): Json<CredentialsForm>,
) -> AppResult<Json<AuthReply>> {
    if name.trim().is_empty() || password.is_empty() {
        return Ok(Json(AuthReply {
            ok: false,
            message: Some("请输入用户名和密码".to_owned()),
        }));
    }

    match check_login(&db_pool, &name, &password).await {
        Ok(()) => {
            info!(%name, "logged in");
            session.insert(USER_NAME, &name).await?;
            Ok(Json(AuthReply { ok: true, message: None }))
        }
        Err(e) => {
            debug!(%name, error = %e, "login refused");
            Ok(Json(AuthReply {
                ok: false,
                message: Some("登陆失败：用户名或密码错误".to_owned()),
            }))
        }
    }
}
