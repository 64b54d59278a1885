use axum::{debug_handler, extract::Path, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::debug;

use crate::{session::{PICK_QUOTA, STATUS_MESSAGE}, AppResult, DriftError};

pub const DAILY_PICKS: i64 = 5;

/// Per-session pick allowance, tagged with the UTC day it was handed out.
/// A pick on a later day starts over from [`DAILY_PICKS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickQuota {
    pub day: i32,
    pub left: i64,
}

pub fn today() -> i32 {
    time::OffsetDateTime::now_utc().date().to_julian_day()
}

fn effective(quota: Option<PickQuota>, today: i32) -> PickQuota {
    match quota {
        Some(q) if q.day == today => q,
        _ => PickQuota { day: today, left: DAILY_PICKS },
    }
}

/// Spends one pick, or fails with [`DriftError::QuotaExhausted`] once
/// today's allowance is gone. The remaining count never goes below zero.
pub fn take_pick(quota: Option<PickQuota>, today: i32) -> Result<PickQuota, DriftError> {
    let q = effective(quota, today);
    if q.left == 0 {
        return Err(DriftError::QuotaExhausted);
    }
    Ok(PickQuota { day: today, left: q.left - 1 })
}

pub fn picks_left(quota: Option<PickQuota>, today: i32) -> i64 {
    effective(quota, today).left
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PickReply {
    allowed: bool,
    picks_left: i64,
    message: String,
}

// The bottle id is what the user tapped on; the quota does not care which
// bottle it was.
#[debug_handler]
pub(crate) async fn pick(
    Path(_id): Path<String>,
    session: Session,
) -> AppResult<Json<PickReply>> {
    let today = today();
    let quota = session.get::<PickQuota>(PICK_QUOTA).await?;

    let reply = match take_pick(quota, today) {
        Ok(next) => {
            session.insert(PICK_QUOTA, next).await?;
            PickReply {
                allowed: true,
                picks_left: next.left,
                message: format!("捡到了一个瓶子！🫙（今日剩余次数：{}）", next.left),
            }
        }
        Err(e) => {
            debug!(error = %e, "pick refused");
            PickReply {
                allowed: false,
                picks_left: 0,
                message: "不可贪心哦，明天再来吧！😊".to_owned(),
            }
        }
    };

    session.insert(STATUS_MESSAGE, &reply.message).await?;
    Ok(Json(reply))
}
