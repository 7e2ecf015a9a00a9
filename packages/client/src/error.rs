//! Error types for the chat session client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Spread amount or count is not positive; nothing was sent
    #[error("Amount and count must be positive (amount: {amount}, count: {count})")]
    InvalidSpread { amount: i64, count: i64 },

    /// Spread endpoint answered with a non-success status
    #[error("Failed to create spread (HTTP {status}): {message}")]
    SpreadRejected { status: u16, message: String },

    /// Spread endpoint succeeded but its body carried no token
    #[error("Spread response did not contain a token")]
    MissingToken,

    /// Request to the spread endpoint could not be completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport is not open; the frame was not sent
    #[error("Not connected to the chat room")]
    NotConnected,

    /// Spread was created on the server but the room was not notified
    #[error("Spread '{token}' was created but could not be announced: not connected")]
    NotBroadcast { token: String },

    /// Origin cannot be turned into chat endpoints
    #[error("Invalid origin '{0}'")]
    InvalidOrigin(String),

    /// Outbound frame could not be serialized
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// `start` was called on a client that is already running
    #[error("Client is already started")]
    AlreadyStarted,
}

/// Reasons an inbound frame was dropped instead of appended
#[derive(Debug, Error)]
pub enum FrameError {
    /// Not JSON, or a known type with missing/invalid fields
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// JSON object without a string `type` field
    #[error("Frame has no type discriminator")]
    MissingType,

    /// `type` is not one this client understands
    #[error("Unknown frame type '{0}'")]
    UnknownType(String),
}
