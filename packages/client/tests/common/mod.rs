//! In-process chat room server for integration tests.
//!
//! Serves `/ws/chat/{room_id}` (broadcasting every text frame to all
//! connections, sender included) and `POST /api/distributor/spread`.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt};
use ppurigi_client::SessionEvent;
use serde::Deserialize;
use tokio::sync::{Mutex, broadcast, mpsc};

/// How the test server treats incoming connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Keep every connection open
    Normal,
    /// Close the first connection immediately, keep the rest
    DropFirst,
    /// Close every connection immediately
    DropAll,
}

/// One call to the spread endpoint as the server saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSpread {
    pub room_id: Option<String>,
    pub user_id: Option<String>,
    pub amount: i64,
    pub count: i64,
}

struct ServerState {
    mode: ConnectionMode,
    connections: AtomicUsize,
    room: broadcast::Sender<String>,
    spreads: Mutex<Vec<RecordedSpread>>,
    spread_status: StatusCode,
}

/// Helper struct to manage the test server lifecycle
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(mode: ConnectionMode) -> Self {
        Self::start_with_spread_status(mode, StatusCode::OK).await
    }

    pub async fn start_with_spread_status(mode: ConnectionMode, spread_status: StatusCode) -> Self {
        let (room, _) = broadcast::channel(64);
        let state = Arc::new(ServerState {
            mode,
            connections: AtomicUsize::new(0),
            room,
            spreads: Mutex::new(Vec::new()),
            spread_status,
        });

        let app = Router::new()
            .route("/ws/chat/{room_id}", get(websocket_handler))
            .route("/api/distributor/spread", post(create_spread))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state, task }
    }

    /// Origin to hand to the client
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of WebSocket connections accepted so far
    pub fn connection_count(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    pub async fn recorded_spreads(&self) -> Vec<RecordedSpread> {
        self.state.spreads.lock().await.clone()
    }

    /// Push a raw frame to every connected client
    pub fn broadcast_raw(&self, text: &str) {
        let _ = self.state.room.send(text.to_string());
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(_room_id): Path<String>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    let n = state.connections.fetch_add(1, Ordering::SeqCst) + 1;

    let drop_now = match state.mode {
        ConnectionMode::Normal => false,
        ConnectionMode::DropFirst => n == 1,
        ConnectionMode::DropAll => true,
    };
    if drop_now {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    let (mut sender, mut receiver) = socket.split();
    let mut room_rx = state.room.subscribe();

    let mut push_task = tokio::spawn(async move {
        while let Ok(text) = room_rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let room_tx = state.room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    let _ = room_tx.send(text.as_str().to_string());
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut push_task => recv_task.abort(),
        _ = &mut recv_task => push_task.abort(),
    }
}

#[derive(Debug, Deserialize)]
struct SpreadBody {
    amount: i64,
    count: i64,
}

async fn create_spread(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<SpreadBody>,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let mut spreads = state.spreads.lock().await;
    spreads.push(RecordedSpread {
        room_id: header("X-Room-ID"),
        user_id: header("X-User-ID"),
        amount: body.amount,
        count: body.count,
    });

    if !state.spread_status.is_success() {
        return (
            state.spread_status,
            Json(serde_json::json!({"detail": "spread rejected"})),
        );
    }

    let token = format!("t{}", spreads.len());
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "spread created",
            "data": {"token": token}
        })),
    )
}

/// Wait for the next event matching `predicate`, skipping others
pub async fn wait_for_event<F>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    timeout: Duration,
    mut predicate: F,
) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(event)) if predicate(&event) => return event,
            Ok(Some(_)) => continue,
            Ok(None) => panic!("Event channel closed"),
            Err(_) => panic!("Timeout waiting for event after {:?}", timeout),
        }
    }
}
