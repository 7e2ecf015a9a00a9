//! Chat room frames exchanged over the WebSocket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FrameError;

/// Frame received from the room
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    Chat {
        user_id: String,
        content: String,
    },
    Spread {
        user_id: String,
        amount: i64,
        count: i64,
        token: String,
    },
    /// Server notice, e.g. a participant leaving
    System { content: String },
}

const KNOWN_TYPES: [&str; 3] = ["chat", "spread", "system"];

/// Parse one text frame.
///
/// The `type` field is checked first so that unknown types are reported
/// as [`FrameError::UnknownType`] rather than as a deserialization error.
pub fn parse_inbound(text: &str) -> Result<InboundFrame, FrameError> {
    let value: Value = serde_json::from_str(text)?;

    let frame_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(FrameError::MissingType)?;

    if !KNOWN_TYPES.contains(&frame_type) {
        return Err(FrameError::UnknownType(frame_type.to_string()));
    }

    Ok(serde_json::from_value(value)?)
}

/// Frame sent to the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    Chat {
        content: String,
        user_id: String,
        room_id: String,
    },
    Spread {
        amount: i64,
        count: i64,
        token: String,
        user_id: String,
        room_id: String,
    },
}
