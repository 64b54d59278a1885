use axum::{routing::get, Router};
use glimmerdrift::{auth, chat, db, notifications, ocean, AppState};
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glimmerdrift=info".into()),
        )
        .compact()
        .init();

    let database_url = dotenv::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_owned());
    let db_pool = db::pool_options(&database_url).connect(&database_url).await?;
    db::init(&db_pool).await?;

    let app_state = AppState::new(db_pool);

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(1)));

    let app = Router::new()
        .route("/", get(hello))

        .merge(auth::router())
        .nest("/ocean", ocean::router())
        .nest("/chat", chat::router())
        .nest("/notifications", notifications::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(CorsLayer::permissive());

    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "glimmerdrift is adrift");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn hello() -> &'static str {
    "glimmerdrift"
}
