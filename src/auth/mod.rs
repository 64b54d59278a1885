mod login;
mod logout;
mod me;
mod register;

use axum::{routing::{get, post}, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub use login::check_login;
pub use register::register_user;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/me", get(me::me))
}

#[derive(Deserialize)]
pub(crate) struct CredentialsForm {
    pub(crate) name: String,
    pub(crate) password: String,
}

#[derive(Serialize)]
pub(crate) struct AuthReply {
    pub(crate) ok: bool,
    pub(crate) message: Option<String>,
}
