//! Display messages and the append-only message log.

/// `user_id` recorded for messages emitted by the room server itself
pub const SYSTEM_USER_ID: &str = "system";

/// What produced a displayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Chat,
    Spread,
    System,
}

/// A message as displayed to the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Assigned locally at receipt; strictly increasing
    pub id: u64,
    pub user_id: String,
    pub content: String,
    /// Receipt time, formatted for display
    pub timestamp: String,
    pub kind: MessageKind,
    /// Redemption token, only for [`MessageKind::Spread`]
    pub token: Option<String>,
}

/// Human-readable description of a spread announcement, in won.
pub fn describe_spread(amount: i64, count: i64) -> String {
    format!("{}원을 {}명에게 뿌렸습니다.", amount, count)
}

/// Messages in receipt order.
///
/// Entries are never removed or reordered.
#[derive(Debug)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a message, assigning the next id, and return it.
    pub fn append(
        &mut self,
        user_id: String,
        content: String,
        kind: MessageKind,
        token: Option<String>,
        timestamp: String,
    ) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            user_id,
            content,
            timestamp,
            kind,
            token,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
