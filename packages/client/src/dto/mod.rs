//! Data Transfer Objects (DTOs) for the chat client.
//!
//! DTOs are organized by protocol:
//! - `websocket`: chat room frames
//! - `http`: spread endpoint request/response bodies

pub mod http;
pub mod websocket;
