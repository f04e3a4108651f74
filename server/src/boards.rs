use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::{AppState, Board, PeerSender};

pub const DEFAULT_BOARD: &str = "default";

pub fn normalize_board_id(value: &str) -> Option<String> {
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

/// Registers a peer, creating the board on first join.
///
/// The registry lock is held across the insert so a concurrent `leave_board`
/// cannot drop the board between lookup and registration.
pub async fn join_board(
    state: &AppState,
    board_id: &str,
    connection_id: Uuid,
    tx: PeerSender,
) -> (Arc<RwLock<Board>>, usize) {
    let mut boards = state.boards.write().await;
    let board = boards
        .entry(board_id.to_string())
        .or_insert_with(|| Arc::new(RwLock::new(Board::default())))
        .clone();
    let peers = {
        let mut board = board.write().await;
        board.peers.insert(connection_id, tx);
        board.peers.len()
    };
    (board, peers)
}

/// Removes a peer and drops the board once nobody is left on it.
pub async fn leave_board(
    state: &AppState,
    board_id: &str,
    board: &Arc<RwLock<Board>>,
    connection_id: Uuid,
) -> usize {
    let mut boards = state.boards.write().await;
    let remaining = {
        let mut board = board.write().await;
        board.peers.remove(&connection_id);
        board.peers.len()
    };
    if remaining == 0 {
        if let Some(current) = boards.get(board_id) {
            if Arc::ptr_eq(current, board) {
                boards.remove(board_id);
            }
        }
    }
    remaining
}

pub async fn peer_count(state: &AppState, board_id: &str) -> usize {
    let board = state.boards.read().await.get(board_id).cloned();
    match board {
        Some(board) => board.read().await.peers.len(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn board_ids_are_normalized_uuids() {
        assert_eq!(
            normalize_board_id("67E55044-10B1-426F-9247-BB680E5FE0C8").as_deref(),
            Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert_eq!(normalize_board_id("lobby"), None);
        assert_eq!(normalize_board_id(""), None);
    }

    #[tokio::test]
    async fn board_lives_while_peers_are_connected() {
        let state = AppState::new(1024);
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let (board, peers) = join_board(&state, DEFAULT_BOARD, a, tx_a).await;
        assert_eq!(peers, 1);
        let (same_board, peers) = join_board(&state, DEFAULT_BOARD, b, tx_b).await;
        assert_eq!(peers, 2);
        assert!(Arc::ptr_eq(&board, &same_board));

        assert_eq!(leave_board(&state, DEFAULT_BOARD, &board, a).await, 1);
        assert!(state.boards.read().await.contains_key(DEFAULT_BOARD));
        assert_eq!(leave_board(&state, DEFAULT_BOARD, &board, b).await, 0);
        assert!(state.boards.read().await.is_empty());
        assert_eq!(peer_count(&state, DEFAULT_BOARD).await, 0);
    }

    #[tokio::test]
    async fn rejoining_after_empty_starts_a_fresh_board() {
        let state = AppState::new(1024);
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let (first, _) = join_board(&state, DEFAULT_BOARD, id, tx.clone()).await;
        leave_board(&state, DEFAULT_BOARD, &first, id).await;

        let (second, _) = join_board(&state, DEFAULT_BOARD, id, tx).await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(peer_count(&state, DEFAULT_BOARD).await, 1);
    }
}
