//! WebSocket chat handler
//!
//! Clients connect to `/ws/chat/:gathering_id?token=<access token>`.
//! Entry is gated on a valid token and chat membership. Inbound frames
//! carry `{"message": "<text>"}`; the service persists them and fans
//! them out over Redis, so every subscribed socket (this one included)
//! receives `{"message": {...}}`.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use moim_cache::PubSubChannel;
use moim_core::Snowflake;
use moim_service::ChatService;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// Channel buffer size for outgoing frames
const FRAME_BUFFER_SIZE: usize = 100;

/// Query parameters for the WebSocket upgrade
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: String,
}

/// Inbound client frame
#[derive(Debug, Deserialize)]
struct ClientFrame {
    message: String,
}

/// WebSocket upgrade handler
///
/// GET /ws/chat/:gathering_id
pub async fn chat_handler(
    State(state): State<GatewayState>,
    Path(gathering_id): Path<String>,
    Query(auth): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let Ok(gathering_id) = gathering_id.parse::<Snowflake>() else {
        return (StatusCode::BAD_REQUEST, "Invalid gathering_id").into_response();
    };

    // Authenticate before the upgrade
    let claims = match state
        .service_context()
        .jwt_service()
        .validate_access_token(&auth.token)
    {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "WebSocket auth failed");
            return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
        }
    };
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return (StatusCode::UNAUTHORIZED, "Invalid token").into_response(),
    };

    // Only the leader and approved members may enter the room
    let chat = ChatService::new(state.service_context());
    if let Err(e) = chat.require_membership(gathering_id, user_id).await {
        debug!(gathering_id = %gathering_id, user_id = %user_id, error = %e, "Chat access denied");
        return (StatusCode::FORBIDDEN, "Not a member of this gathering").into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(state, socket, gathering_id, user_id))
}

/// Drive an upgraded chat socket until either side closes
async fn handle_socket(
    state: GatewayState,
    socket: WebSocket,
    gathering_id: Snowflake,
    user_id: Snowflake,
) {
    let channel = PubSubChannel::chat(gathering_id);

    if let Err(e) = state.subscriptions().join(&channel).await {
        warn!(channel = %channel, error = %e, "Failed to join channel");
        return;
    }

    info!(gathering_id = %gathering_id, user_id = %user_id, "Chat socket opened");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(FRAME_BUFFER_SIZE);

    // Drain outgoing frames into the sink
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sink.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    // Forward Redis fan-out for this room to the socket
    let mut broadcast_rx = state.subscriptions().subscriber().receiver();
    let channel_name = channel.name();
    let tx_forward = tx.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(received) => {
                    if received.channel != channel_name {
                        continue;
                    }
                    let Some(event) = received.event else { continue };
                    if event.event_type != "MESSAGE_CREATE" {
                        continue;
                    }
                    let frame = serde_json::json!({ "message": event.data }).to_string();
                    if tx_forward.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed = missed, "Chat socket lagged behind fan-out");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Inbound frames from the client
    let state_recv = state.clone();
    let tx_recv = tx.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(frame) = ws_stream.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    handle_client_frame(&state_recv, &tx_recv, gathering_id, user_id, &text).await;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Binary(_)) => {
                    send_error(&tx_recv, "Binary frames are not supported").await;
                }
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    debug!(user_id = %user_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = recv_task => {}
        _ = send_task => {}
        _ = forward_task => {}
    }

    if let Err(e) = state.subscriptions().leave(&channel).await {
        warn!(channel = %channel, error = %e, "Failed to leave channel");
    }

    info!(gathering_id = %gathering_id, user_id = %user_id, "Chat socket closed");
}

/// Parse and process one inbound frame
async fn handle_client_frame(
    state: &GatewayState,
    tx: &mpsc::Sender<String>,
    gathering_id: Snowflake,
    user_id: Snowflake,
    text: &str,
) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => {
            send_error(tx, "Invalid frame: expected {\"message\": \"...\"}").await;
            return;
        }
    };

    let chat = ChatService::new(state.service_context());
    // Delivery back to this socket happens through the Redis fan-out
    if let Err(e) = chat
        .send_message(gathering_id, user_id, frame.message)
        .await
    {
        debug!(user_id = %user_id, error = %e, "Message rejected");
        send_error(tx, &e.to_string()).await;
    }
}

async fn send_error(tx: &mpsc::Sender<String>, message: &str) {
    let frame = serde_json::json!({ "error": message }).to_string();
    let _ = tx.send(frame).await;
}
