use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{now_millis, session::USER_NAME, AppResult, DriftError};

use super::{AuthReply, CredentialsForm};

/// Inserts a new name/password row. Plaintext on purpose: this is a toy
/// identity store with no hashing and no expiry.
pub async fn register_user(
    db_pool: &SqlitePool,
    name: &str,
    password: &str,
) -> Result<(), DriftError> {
    let taken: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE name=?")
        .bind(name)
        .fetch_optional(db_pool)
        .await
        .map_err(DriftError::RemoteRead)?;
    if taken.is_some() {
        return Err(DriftError::DuplicateIdentity);
    }

    sqlx::query("INSERT INTO users (name,password,created_at) VALUES (?,?,?)")
        .bind(name)
        .bind(password)
        .bind(now_millis())
        .execute(db_pool)
        .await
        .map_err(DriftError::RemoteWrite)?;

    Ok(())
}

#[debug_handler]
pub(crate) async fn register(
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

    match register_user(&db_pool, &name, &password).await {
        Ok(()) => {
            info!(%name, "registered");
            // registering also signs you in
            session.insert(USER_NAME, &name).await?;
            Ok(Json(AuthReply {
                ok: true,
                message: Some("注册成功！".to_owned()),
            }))
        }
        Err(e @ DriftError::DuplicateIdentity) => {
            warn!(%name, error = %e, "registration refused");
            Ok(Json(AuthReply {
                ok: false,
                message: Some("注册失败😞：这个名字已经有人用了".to_owned()),
            }))
        }
        Err(e) => {
            warn!(%name, error = %e, "registration failed");
            Ok(Json(AuthReply {
                ok: false,
                message: Some("注册失败😞".to_owned()),
            }))
        }
    }
}
