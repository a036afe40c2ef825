use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::{debug, info};
use uuid::Uuid;

/// Real-time channel. Accepts connections and reports connect/disconnect;
/// nothing is published on it yet.
#[utoipa::path(
    get,
    path = "/ws",
    responses((status = 101, description = "Switching Protocols (WebSocket upgrade)")),
    tag = "Realtime"
)]
pub async fn socket_entry(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(mut socket: WebSocket) {
    let conn_id = Uuid::new_v4();
    info!(%conn_id, "client_connected");
    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%conn_id, error = ?e, "socket_receive_failed");
                break;
            }
        }
    }
    info!(%conn_id, "client_disconnected");
}

pub fn routes() -> Router {
    Router::new().route("/ws", get(socket_entry))
}
