use std::path::PathBuf;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::boards::{join_board, leave_board, normalize_board_id, DEFAULT_BOARD};
use crate::relay::{broadcast_except, frame_len};
use crate::state::AppState;

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn index_handler(axum::Extension(index_file): axum::Extension<PathBuf>) -> Response {
    serve_index(&index_file).await
}

pub async fn board_page_handler(
    Path(board_id): Path<String>,
    axum::Extension(index_file): axum::Extension<PathBuf>,
) -> Response {
    if normalize_board_id(&board_id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    serve_index(&index_file).await
}

async fn serve_index(index_file: &std::path::Path) -> Response {
    match tokio::fs::read_to_string(index_file).await {
        Ok(contents) => Html(contents).into_response(),
        Err(error) => {
            warn!("Failed to read {}: {error}", index_file.display());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn ws_default_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, DEFAULT_BOARD.to_string()))
}

pub async fn ws_handler(
    Path(board_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    let board_id = match normalize_board_id(&board_id) {
        Some(id) => id,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, board_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, board_id: String) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let connection_id = Uuid::new_v4();

    let (board, peers) = join_board(&state, &board_id, connection_id, tx).await;
    info!("WS connected board={board_id} conn={connection_id} peers={peers}");

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if socket_sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut close_frame = None;

    while let Some(Ok(message)) = socket_receiver.next().await {
        match message {
            Message::Text(_) | Message::Binary(_) => {
                let len = frame_len(&message);
                if len > state.max_frame_bytes {
                    warn!(
                        "WS frame dropped board={board_id} conn={connection_id} bytes={len} limit={}",
                        state.max_frame_bytes
                    );
                    continue;
                }
                let delivered = broadcast_except(&board, connection_id, message).await;
                debug!("WS relay board={board_id} conn={connection_id} bytes={len} delivered={delivered}");
            }
            Message::Close(frame) => {
                close_frame = frame;
                break;
            }
            _ => {}
        }
    }

    let remaining = leave_board(&state, &board_id, &board, connection_id).await;
    send_task.abort();
    info!("WS disconnected board={board_id} conn={connection_id} peers={remaining}");
    if let Some(frame) = &close_frame {
        debug!(
            "WS close frame board={board_id} conn={connection_id} code={:?} reason={:?}",
            frame.code, frame.reason
        );
    }
}
