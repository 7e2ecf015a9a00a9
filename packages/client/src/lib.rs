//! Chat-room client for Ppurigi.
//!
//! Joins a room over WebSocket, posts chat messages and creates money
//! spreads that the room's participants can later redeem by token.

pub mod client;
pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod formatter;
pub mod session;
pub mod spread_api;
pub mod ui;

pub use client::{ChatSessionClient, SessionEvent};
pub use config::ClientConfig;
pub use error::{ClientError, FrameError};
pub use session::{ChatSession, SendOutcome};
