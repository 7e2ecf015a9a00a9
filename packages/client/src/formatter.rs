//! Message formatting utilities for terminal display.

use std::time::Duration;

use crate::domain::{ChatMessage, MessageKind};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a message from the log.
    ///
    /// `current_user_id` marks the participant's own messages with "(me)".
    pub fn format_message(message: &ChatMessage, current_user_id: &str) -> String {
        let me_suffix = if message.user_id == current_user_id {
            " (me)"
        } else {
            ""
        };

        match message.kind {
            MessageKind::Chat => format!(
                "\n\n{RULE}\n@{}{}: {}\nreceived at {}\n{RULE}\n",
                message.user_id, me_suffix, message.content, message.timestamp
            ),
            MessageKind::Spread => format!(
                "\n\n{RULE}\n$ @{}{} {}\ntoken: {}\nreceived at {}\n{RULE}\n",
                message.user_id,
                me_suffix,
                message.content,
                message.token.as_deref().unwrap_or("-"),
                message.timestamp
            ),
            MessageKind::System => {
                format!("\n* {} ({})\n", message.content, message.timestamp)
            }
        }
    }

    /// Format the notice shown when the room connection opens
    pub fn format_connected(room_id: &str) -> String {
        format!("\n+ connected to room '{}'\n", room_id)
    }

    /// Format the notice shown when the room connection is lost
    pub fn format_disconnected(attempt: u32, retry_in: Duration) -> String {
        format!(
            "\n- disconnected, reconnecting in {:.1}s (attempt {})\n",
            retry_in.as_secs_f64(),
            attempt
        )
    }

    /// Format the confirmation after a spread was created and announced
    pub fn format_spread_created(token: &str) -> String {
        format!("spread created (token: {})\n", token)
    }

    /// Format a user-visible error
    pub fn format_error(error: &dyn std::error::Error) -> String {
        format!("\n! {}\n", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn create_message(kind: MessageKind, user_id: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: 1,
            user_id: user_id.to_string(),
            content: content.to_string(),
            timestamp: "09:30:00".to_string(),
            kind,
            token: (kind == MessageKind::Spread).then(|| "t1".to_string()),
        }
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが正しくフォーマットされる
        // given (前提条件):
        let message = create_message(MessageKind::Chat, "bob", "Hello, world!");

        // when (操作):
        let result = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert!(result.contains("@bob:"));
        assert!(result.contains("Hello, world!"));
        assert!(result.contains("received at 09:30:00"));
        assert!(!result.contains("(me)"));
    }

    #[test]
    fn test_format_own_chat_message() {
        // テスト項目: 自分のメッセージには (me) が付く
        // given (前提条件):
        let message = create_message(MessageKind::Chat, "alice", "hi");

        // when (操作):
        let result = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert!(result.contains("@alice (me):"));
    }

    #[test]
    fn test_format_spread_message() {
        // テスト項目: spread メッセージに説明文とトークンが表示される
        // given (前提条件):
        let message = create_message(MessageKind::Spread, "bob", "100원을 5명에게 뿌렸습니다.");

        // when (操作):
        let result = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert!(result.contains("$ @bob"));
        assert!(result.contains("100원을 5명에게 뿌렸습니다."));
        assert!(result.contains("token: t1"));
    }

    #[test]
    fn test_format_system_message() {
        // テスト項目: system メッセージが 1 行でフォーマットされる
        // given (前提条件):
        let message = create_message(MessageKind::System, "system", "A participant left.");

        // when (操作):
        let result = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert!(result.contains("* A participant left."));
        assert!(!result.contains(RULE));
    }

    #[test]
    fn test_format_disconnected() {
        // テスト項目: 切断通知に待機時間と試行回数が表示される
        // given (前提条件):
        let retry_in = Duration::from_millis(1500);

        // when (操作):
        let result = MessageFormatter::format_disconnected(2, retry_in);

        // then (期待する結果):
        assert!(result.contains("1.5s"));
        assert!(result.contains("attempt 2"));
    }

    #[test]
    fn test_format_error() {
        // テスト項目: エラーメッセージが表示される
        // given (前提条件):
        let error = ClientError::InvalidSpread {
            amount: 0,
            count: 5,
        };

        // when (操作):
        let result = MessageFormatter::format_error(&error);

        // then (期待する結果):
        assert!(result.contains("Amount and count must be positive"));
    }

    #[test]
    fn test_format_connected_and_spread_created() {
        // テスト項目: 接続通知と spread 作成通知がフォーマットされる
        // given (前提条件):

        // when (操作):
        let connected = MessageFormatter::format_connected("pt_1");
        let created = MessageFormatter::format_spread_created("t1");

        // then (期待する結果):
        assert!(connected.contains("pt_1"));
        assert!(created.contains("t1"));
    }
}
