use axum::{debug_handler, extract::{State, WebSocketUpgrade}, response::IntoResponse};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

/// Push-style ledger subscription: each publish on the tide channel is
/// forwarded verbatim. Frames from the client are ignored.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn ocean_ws(
    State(tide): State<broadcast::Sender<String>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(async move |stream| {
        let mut rx = tide.subscribe();
        let (mut sender, mut receiver) = stream.split();

        let forward_task = tokio::spawn(async move {
            while let Ok(snapshot) = rx.recv().await {
                if sender.send(snapshot.into()).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(_)) = receiver.next().await {}

        forward_task.abort();
    })
}
