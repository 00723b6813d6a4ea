//! Progress change notifications over WebSocket.
//!
//! Local mutations (through the shared [`ProgressStore`]) and external writes
//! to the progress directory are both forwarded to a broadcast channel that
//! every connected client subscribes to.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use mlv_progress::{
    PROGRESS_EVENT, ProgressError, ProgressEventReceiver, ProgressStore, WatchHandle,
};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 100;

/// Message sent to clients; it carries no delta.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ProgressNotice {
    #[serde(rename = "type")]
    event_type: &'static str,
}

impl ProgressNotice {
    fn new() -> Self {
        Self {
            event_type: PROGRESS_EVENT,
        }
    }
}

/// Owns the forwarding threads' channel and the optional directory watcher.
pub(crate) struct ProgressBroadcaster {
    sender: broadcast::Sender<ProgressNotice>,
    _watch: Option<WatchHandle>,
}

impl ProgressBroadcaster {
    /// Start forwarding events from `store`, and from `watch_dir` when given.
    pub(crate) fn start(
        store: &ProgressStore,
        watch_dir: Option<&Path>,
    ) -> Result<Self, ProgressError> {
        let (sender, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        forward(store.subscribe(), sender.clone());

        let watch = match watch_dir {
            Some(dir) => {
                let (events, handle) = mlv_progress::watch_dir(dir)?;
                forward(events, sender.clone());
                Some(handle)
            }
            None => None,
        };

        Ok(Self {
            sender,
            _watch: watch,
        })
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ProgressNotice> {
        self.sender.subscribe()
    }
}

fn forward(events: ProgressEventReceiver, sender: broadcast::Sender<ProgressNotice>) {
    std::thread::spawn(move || {
        for event in events.iter() {
            tracing::debug!(kind = ?event.kind, "Progress changed");
            // Err only means no client is connected.
            let _ = sender.send(ProgressNotice::new());
        }
    });
}

/// Handle GET /ws/progress.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut receiver = state.broadcaster.subscribe();

    loop {
        tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(notice) => {
                        let Ok(msg) = serde_json::to_string(&notice) else {
                            continue;
                        };
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                }
            }
            result = socket.recv() => {
                match result {
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
        }
    }
}
