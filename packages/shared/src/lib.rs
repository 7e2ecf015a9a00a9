//! Utilities shared between the Ppurigi library crates and binaries.

pub mod logger;
pub mod time;
