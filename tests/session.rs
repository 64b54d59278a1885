//! Handler-level tests for the per-session behavior: the liked-bottle
//! guard, the transient status message, and the auth replies. Requests go
//! through the real router with a session cookie carried between calls.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use glimmerdrift::notifications::NotificationKind;
use glimmerdrift::{auth, db, ocean, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

async fn app() -> (Router, AppState) {
    let pool = db::pool_options("sqlite::memory:")
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init(&pool).await.unwrap();
    let state = AppState::new(pool);

    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    let app = Router::new()
        .merge(auth::router())
        .nest("/ocean", ocean::router())
        .with_state(state.clone())
        .layer(session_layer);

    (app, state)
}

fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should carry a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

#[tokio::test]
async fn second_like_from_the_same_session_is_a_no_op() {
    let (app, state) = app().await;
    let bottle = ocean::throw_bottle(&state.db_pool, "guard me", "alice")
        .await
        .unwrap();

    let first = app
        .clone()
        .oneshot(post(&format!("/ocean/like/{}", bottle.id)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = session_cookie(&first);

    let bottles = ocean::load_bottles(&state.db_pool).await.unwrap();
    assert_eq!(bottles.iter().find(|b| b.id == bottle.id).unwrap().likes, 1);
    let notifications = state.feed.list().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Like);

    let second = app
        .clone()
        .oneshot(with_cookie(post(&format!("/ocean/like/{}", bottle.id)), &cookie))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_json(second).await["message"].is_null());

    // the guard held: no second increment, no second notification
    let bottles = ocean::load_bottles(&state.db_pool).await.unwrap();
    assert_eq!(bottles.iter().find(|b| b.id == bottle.id).unwrap().likes, 1);
    assert_eq!(state.feed.list().await.len(), 1);
}

#[tokio::test]
async fn clear_drops_the_transient_message() {
    let (app, _state) = app().await;

    let thrown = app
        .clone()
        .oneshot(post_json("/ocean/throw", &json!({ "content": "hello" })))
        .await
        .unwrap();
    assert_eq!(thrown.status(), StatusCode::OK);
    let cookie = session_cookie(&thrown);

    let snapshot = app
        .clone()
        .oneshot(with_cookie(
            Request::builder().uri("/ocean").body(Body::empty()).unwrap(),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(snapshot).await["message"], "漂流瓶已发出......");

    let cleared = app
        .clone()
        .oneshot(with_cookie(post("/ocean/clear"), &cookie))
        .await
        .unwrap();
    assert_eq!(cleared.status(), StatusCode::OK);

    let snapshot = app
        .clone()
        .oneshot(with_cookie(
            Request::builder().uri("/ocean").body(Body::empty()).unwrap(),
            &cookie,
        ))
        .await
        .unwrap();
    assert!(body_json(snapshot).await["message"].is_null());
}

#[tokio::test]
async fn duplicate_registration_says_the_name_is_taken() {
    let (app, _state) = app().await;
    let creds = json!({ "name": "bob", "password": "pw" });

    let first = app
        .clone()
        .oneshot(post_json("/register", &creds))
        .await
        .unwrap();
    let first = body_json(first).await;
    assert_eq!(first["ok"], true);

    let second = app
        .clone()
        .oneshot(post_json("/register", &creds))
        .await
        .unwrap();
    let second = body_json(second).await;
    assert_eq!(second["ok"], false);
    assert!(second["message"].as_str().unwrap().contains("名字"));
}
