//! Session identity and spread requests.

use crate::error::ClientError;

/// Room and participant keys for one client.
///
/// Both values are opaque and fixed for the client's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    room_id: String,
    user_id: String,
}

impl SessionIdentity {
    pub fn new(room_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// A validated request to create a spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadRequest {
    pub amount: i64,
    pub count: i64,
}

impl SpreadRequest {
    /// Validate `amount` and `count`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidSpread`] unless both are positive.
    pub fn new(amount: i64, count: i64) -> Result<Self, ClientError> {
        if amount <= 0 || count <= 0 {
            return Err(ClientError::InvalidSpread { amount, count });
        }
        Ok(Self { amount, count })
    }
}

/// Pending spread form input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadDraft {
    pub amount: i64,
    pub count: i64,
}

impl SpreadDraft {
    pub fn new(amount: i64, count: i64) -> Self {
        Self { amount, count }
    }

    pub fn validate(&self) -> Result<SpreadRequest, ClientError> {
        SpreadRequest::new(self.amount, self.count)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
