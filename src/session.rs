//! Keys for the per-session values: who is logged in, the pick quota,
//! which bottles this session already liked, and the transient status
//! message shown over the ocean.

pub const USER_NAME: &str = "user_name";
pub const PICK_QUOTA: &str = "pick_quota";
pub const LIKED_BOTTLES: &str = "liked_bottles";
pub const STATUS_MESSAGE: &str = "status_message";
