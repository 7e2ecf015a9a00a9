//! Time utilities with a clock abstraction for testability.
//!
//! Display times are rendered in KST (UTC+9), the zone the gym deployment runs in.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        current_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Current Unix timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn kst_datetime(timestamp_millis: i64) -> Option<DateTime<FixedOffset>> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS)?;
    kst.timestamp_millis_opt(timestamp_millis).single()
}

/// Convert a Unix timestamp (milliseconds) to a wall-clock time (`HH:MM:SS`) in KST.
///
/// Out-of-range timestamps fall back to the raw millisecond value.
pub fn timestamp_to_kst_time(timestamp_millis: i64) -> String {
    kst_datetime(timestamp_millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_millis.to_string())
}
