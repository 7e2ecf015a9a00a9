//! Chat session state.
//!
//! [`ChatSession`] owns everything the client mutates: the message log, the
//! connection state, the outbound channel of the live connection and the
//! spread draft. Inbound frames and user actions both go through its methods.

use std::sync::Arc;

use tokio::sync::mpsc;

use ppurigi_shared::time::{Clock, SystemClock, timestamp_to_kst_time};

use crate::{
    domain::{
        ChatMessage, ConnectionState, MessageKind, MessageLog, SessionIdentity, SpreadDraft,
        SpreadRequest, describe_spread, message::SYSTEM_USER_ID,
    },
    dto::websocket::{InboundFrame, OutboundFrame, parse_inbound},
    error::{ClientError, FrameError},
};

/// Sender half feeding the live connection's writer task
pub type OutboundChannel = mpsc::UnboundedSender<String>;

/// Result of a chat send that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Frame handed to the transport
    Sent,
    /// Content was blank; nothing sent
    Skipped,
}

pub struct ChatSession {
    identity: SessionIdentity,
    log: MessageLog,
    state: ConnectionState,
    outbound: Option<OutboundChannel>,
    spread_draft: SpreadDraft,
    clock: Arc<dyn Clock>,
}

impl ChatSession {
    pub fn new(identity: SessionIdentity) -> Self {
        Self::with_clock(identity, Arc::new(SystemClock))
    }

    pub fn with_clock(identity: SessionIdentity, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            log: MessageLog::new(),
            state: ConnectionState::Disconnected,
            outbound: None,
            spread_draft: SpreadDraft::default(),
            clock,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn spread_draft(&self) -> SpreadDraft {
        self.spread_draft
    }

    pub fn mark_connecting(&mut self) {
        self.outbound = None;
        self.state = ConnectionState::Connecting;
    }

    /// Bind the session to a freshly opened connection.
    pub fn attach(&mut self, outbound: OutboundChannel) {
        self.outbound = Some(outbound);
        self.state = ConnectionState::Open;
    }

    /// Forget the current connection. Dropping the channel stops its writer.
    pub fn detach(&mut self) {
        self.outbound = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Turn one inbound text frame into a message appended to the log.
    ///
    /// Dropped frames leave the log untouched.
    pub fn handle_frame(&mut self, text: &str) -> Result<&ChatMessage, FrameError> {
        let frame = parse_inbound(text)?;
        let timestamp = timestamp_to_kst_time(self.clock.now_millis());

        let message = match frame {
            InboundFrame::Chat { user_id, content } => {
                self.log
                    .append(user_id, content, MessageKind::Chat, None, timestamp)
            }
            InboundFrame::Spread {
                user_id,
                amount,
                count,
                token,
            } => self.log.append(
                user_id,
                describe_spread(amount, count),
                MessageKind::Spread,
                Some(token),
                timestamp,
            ),
            InboundFrame::System { content } => self.log.append(
                SYSTEM_USER_ID.to_string(),
                content,
                MessageKind::System,
                None,
                timestamp,
            ),
        };

        Ok(message)
    }

    /// Post a chat message to the room.
    ///
    /// Blank content is skipped. Nothing is queued while disconnected.
    pub fn send_chat_message(&mut self, content: &str) -> Result<SendOutcome, ClientError> {
        if content.trim().is_empty() {
            return Ok(SendOutcome::Skipped);
        }

        let frame = OutboundFrame::Chat {
            content: content.to_string(),
            user_id: self.identity.user_id().to_string(),
            room_id: self.identity.room_id().to_string(),
        };
        self.send_frame(&frame)?;
        Ok(SendOutcome::Sent)
    }

    pub fn set_spread_draft(&mut self, amount: i64, count: i64) {
        self.spread_draft = SpreadDraft::new(amount, count);
    }

    /// Validate the current draft before any network call.
    pub fn begin_spread(&self) -> Result<SpreadRequest, ClientError> {
        self.spread_draft.validate()
    }

    /// Announce a spread the server has created.
    ///
    /// The draft is cleared whether or not the announcement goes out, since
    /// the spread already exists on the server. A draft that was replaced
    /// while the request was in flight is left alone.
    pub fn complete_spread(
        &mut self,
        request: SpreadRequest,
        token: String,
    ) -> Result<(), ClientError> {
        if self.spread_draft == SpreadDraft::new(request.amount, request.count) {
            self.spread_draft.clear();
        }

        let frame = OutboundFrame::Spread {
            amount: request.amount,
            count: request.count,
            token: token.clone(),
            user_id: self.identity.user_id().to_string(),
            room_id: self.identity.room_id().to_string(),
        };
        match self.send_frame(&frame) {
            Err(ClientError::NotConnected) => Err(ClientError::NotBroadcast { token }),
            other => other,
        }
    }

    fn send_frame(&mut self, frame: &OutboundFrame) -> Result<(), ClientError> {
        let Some(outbound) = self.outbound.as_ref() else {
            tracing::warn!("Dropping outbound frame: not connected");
            return Err(ClientError::NotConnected);
        };

        let json = serde_json::to_string(frame)?;
        if outbound.send(json).is_err() {
            tracing::warn!("Dropping outbound frame: connection writer has stopped");
            self.detach();
            return Err(ClientError::NotConnected);
        }

        tracing::debug!("Queued outbound frame for room '{}'", self.identity.room_id());
        Ok(())
    }
}
