//! Domain logic for the chat session.
//!
//! Pure types and functions without I/O, so they are easy to test.

pub mod identity;
pub mod message;
pub mod reconnect;

pub use identity::{SessionIdentity, SpreadDraft, SpreadRequest};
pub use message::{ChatMessage, MessageKind, MessageLog, describe_spread};
pub use reconnect::{ConnectionState, ReconnectPolicy};
