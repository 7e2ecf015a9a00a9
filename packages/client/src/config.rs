//! Client configuration and endpoint derivation.

use reqwest::Url;

use crate::{
    domain::{ReconnectPolicy, SessionIdentity},
    error::ClientError,
};

/// Path of the spread creation endpoint, relative to the origin
pub const SPREAD_ENDPOINT_PATH: &str = "/api/distributor/spread";

/// Everything a [`ChatSessionClient`](crate::client::ChatSessionClient) needs to run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin the chat page is served from, e.g. `https://gym.example`
    pub origin: Url,
    pub identity: SessionIdentity,
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Build a config with the default reconnection policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidOrigin`] if `origin` is not a URL.
    pub fn new(
        origin: &str,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let origin =
            Url::parse(origin).map_err(|_| ClientError::InvalidOrigin(origin.to_string()))?;
        Ok(Self {
            origin,
            identity: SessionIdentity::new(room_id, user_id),
            reconnect: ReconnectPolicy::default(),
        })
    }

    pub fn with_reconnect_policy(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Room-scoped WebSocket endpoint: `{ws|wss}://<host>/ws/chat/{room_id}`.
    ///
    /// The scheme is secure iff the origin is.
    pub fn chat_ws_url(&self) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidOrigin(self.origin.to_string());

        let scheme = match self.origin.scheme() {
            "https" | "wss" => "wss",
            "http" | "ws" => "ws",
            _ => return Err(invalid()),
        };

        let mut url = self.origin.clone();
        url.set_scheme(scheme).map_err(|_| invalid())?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .clear()
            .extend(["ws", "chat", self.identity.room_id()]);
        Ok(url)
    }

    /// Spread creation endpoint on the origin.
    pub fn spread_endpoint(&self) -> Result<Url, ClientError> {
        let mut origin = self.origin.clone();
        match origin.scheme() {
            "http" | "https" => {}
            "ws" => origin
                .set_scheme("http")
                .map_err(|_| ClientError::InvalidOrigin(self.origin.to_string()))?,
            "wss" => origin
                .set_scheme("https")
                .map_err(|_| ClientError::InvalidOrigin(self.origin.to_string()))?,
            _ => return Err(ClientError::InvalidOrigin(self.origin.to_string())),
        }
        origin
            .join(SPREAD_ENDPOINT_PATH)
            .map_err(|_| ClientError::InvalidOrigin(self.origin.to_string()))
    }
}
