use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::Board;

/// Payload size of a data frame. Control frames count as zero.
pub fn frame_len(message: &Message) -> usize {
    match message {
        Message::Text(text) => text.len(),
        Message::Binary(bytes) => bytes.len(),
        _ => 0,
    }
}

/// Forwards a frame untouched to every peer on the board except its sender.
/// Peers whose channel has closed are pruned.
pub async fn broadcast_except(board: &Arc<RwLock<Board>>, sender: Uuid, message: Message) -> usize {
    let mut stale = Vec::new();
    let mut delivered = 0;
    {
        let board = board.read().await;
        for (id, tx) in board.peers.iter() {
            if *id == sender {
                continue;
            }
            if tx.send(message.clone()).is_err() {
                stale.push(*id);
            } else {
                delivered += 1;
            }
        }
    }

    if !stale.is_empty() {
        let mut board = board.write().await;
        for id in stale {
            board.peers.remove(&id);
        }
    }
    delivered
}
