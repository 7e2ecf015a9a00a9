//! Chat session client with reconnection support.
//!
//! [`ChatSessionClient`] is the lifecycle object: `start` spawns the
//! connection loop, `stop` cancels it (including a pending reconnection
//! timer). Everything the loop observes is published as [`SessionEvent`]s.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::Instant,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ClientConfig,
    domain::{ChatMessage, ConnectionState, ReconnectPolicy, SessionIdentity},
    error::ClientError,
    session::{ChatSession, SendOutcome},
    spread_api::{HttpSpreadApi, SpreadApi},
};

/// How long a closing connection may take to flush its close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

type ChatStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Something the connection loop wants the view to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Transport is open
    Connected,
    /// Transport closed or failed to open; one retry is scheduled
    Disconnected { attempt: u32, retry_in: Duration },
    /// A message was appended to the log
    Message(ChatMessage),
    /// An inbound frame was dropped
    FrameDropped(String),
    /// The loop has exited after `stop`
    Stopped,
}

pub struct ChatSessionClient {
    config: ClientConfig,
    session: Arc<Mutex<ChatSession>>,
    spread_api: Arc<dyn SpreadApi>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ChatSessionClient {
    /// Create a client that creates spreads through the origin's REST endpoint.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let spread_api = HttpSpreadApi::new(config.spread_endpoint()?);
        Ok(Self::with_spread_api(config, Arc::new(spread_api)))
    }

    pub fn with_spread_api(config: ClientConfig, spread_api: Arc<dyn SpreadApi>) -> Self {
        let session = ChatSession::new(config.identity.clone());
        Self {
            config,
            session: Arc::new(Mutex::new(session)),
            spread_api,
            shutdown: CancellationToken::new(),
            task: None,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.config.identity
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start the connection loop and return the event stream.
    ///
    /// # Errors
    ///
    /// * [`ClientError::AlreadyStarted`] if the loop is running
    /// * [`ClientError::InvalidOrigin`] if no WebSocket URL can be derived
    pub fn start(&mut self) -> Result<mpsc::UnboundedReceiver<SessionEvent>, ClientError> {
        if self.is_running() {
            return Err(ClientError::AlreadyStarted);
        }

        let ws_url = self.config.chat_ws_url()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.shutdown = CancellationToken::new();

        let worker = ConnectionWorker {
            ws_url,
            session: self.session.clone(),
            policy: self.config.reconnect,
            events: events_tx,
            shutdown: self.shutdown.clone(),
        };
        self.task = Some(tokio::spawn(worker.run()));

        Ok(events_rx)
    }

    /// Stop the connection loop and wait for it to exit.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();

        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("Connection task ended abnormally: {}", e);
        }

        self.session.lock().await.detach();
    }

    pub async fn send_chat_message(&self, content: &str) -> Result<SendOutcome, ClientError> {
        self.session.lock().await.send_chat_message(content)
    }

    /// Create a spread over REST, then announce it to the room.
    ///
    /// Returns the redemption token. The session lock is not held while the
    /// REST call is in flight, so inbound frames keep being processed.
    pub async fn create_spread(&self, amount: i64, count: i64) -> Result<String, ClientError> {
        let request = {
            let mut session = self.session.lock().await;
            session.set_spread_draft(amount, count);
            session.begin_spread()?
        };

        let token = self
            .spread_api
            .create_spread(&self.config.identity, request)
            .await?;
        tracing::info!(
            "Spread created: amount={}, count={}, token={}",
            request.amount,
            request.count,
            token
        );

        self.session
            .lock()
            .await
            .complete_spread(request, token.clone())?;

        Ok(token)
    }

    /// Snapshot of the message log
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.lock().await.messages().to_vec()
    }

    pub async fn state(&self) -> ConnectionState {
        self.session.lock().await.state()
    }
}

impl Drop for ChatSessionClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct ConnectionWorker {
    ws_url: Url,
    session: Arc<Mutex<ChatSession>>,
    policy: ReconnectPolicy,
    events: mpsc::UnboundedSender<SessionEvent>,
    shutdown: CancellationToken,
}

impl ConnectionWorker {
    async fn run(self) {
        // Failed opens and dropped connections share one counter. It resets only
        // after a connection has stayed open for the initial delay, so a server
        // that accepts and drops at once still backs off.
        let mut attempt: u32 = 0;

        loop {
            self.session.lock().await.mark_connecting();
            tracing::info!("Connecting to {} (attempt {})", self.ws_url, attempt + 1);

            let connected = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = connect_async(self.ws_url.as_str()) => result,
            };

            match connected {
                Ok((stream, _response)) => {
                    tracing::info!("Connected to chat room at {}", self.ws_url);
                    let opened_at = Instant::now();
                    self.serve(stream).await;
                    if self.shutdown.is_cancelled() {
                        break;
                    }
                    if opened_at.elapsed() >= self.policy.initial() {
                        attempt = 0;
                    }
                    tracing::warn!("Connection to chat room lost");
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to {}: {}", self.ws_url, e);
                }
            }

            self.session.lock().await.detach();
            attempt = attempt.saturating_add(1);
            let retry_in = self.policy.delay_for(attempt);
            tracing::info!("Reconnecting in {:?} (attempt {})", retry_in, attempt);
            let _ = self
                .events
                .send(SessionEvent::Disconnected { attempt, retry_in });

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(retry_in) => {}
            }
        }

        self.session.lock().await.detach();
        tracing::info!("Chat session stopped");
        let _ = self.events.send(SessionEvent::Stopped);
    }

    /// Pump one open connection until it closes or shutdown is requested.
    async fn serve(&self, stream: ChatStream) {
        let (mut write, mut read) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        self.session.lock().await.attach(outbound_tx);
        let _ = self.events.send(SessionEvent::Connected);

        let mut writer = tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    tracing::warn!("Failed to send frame: {}", e);
                    return;
                }
            }
            // Channel closed: the session detached from this connection.
            let _ = write.close().await;
        });

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                next = read.next() => next,
            };

            match next {
                Some(Ok(Message::Text(text))) => self.dispatch(text.as_str()).await,
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                None => break,
            }
        }

        self.session.lock().await.detach();
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut writer).await.is_err() {
            writer.abort();
        }
    }

    async fn dispatch(&self, text: &str) {
        let outcome = self.session.lock().await.handle_frame(text).cloned();

        match outcome {
            Ok(message) => {
                tracing::debug!("Received {:?} message #{}", message.kind, message.id);
                let _ = self.events.send(SessionEvent::Message(message));
            }
            Err(e) => {
                tracing::warn!("Dropped inbound frame: {}", e);
                let _ = self.events.send(SessionEvent::FrameDropped(e.to_string()));
            }
        }
    }
}
