use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

pub type PeerSender = mpsc::UnboundedSender<Message>;

#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<RwLock<HashMap<String, Arc<RwLock<Board>>>>>,
    pub max_frame_bytes: usize,
}

impl AppState {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            boards: Arc::new(RwLock::new(HashMap::new())),
            max_frame_bytes,
        }
    }
}

/// Everyone currently connected to one canvas. Nothing drawn is kept here.
#[derive(Default)]
pub struct Board {
    pub peers: HashMap<Uuid, PeerSender>,
}
