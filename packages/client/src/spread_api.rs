//! Spread creation over REST.
//!
//! [`SpreadApi`] is the seam between the session and the HTTP endpoint; the
//! client talks to the trait so tests can substitute a mock.

use async_trait::async_trait;
use reqwest::Url;

use crate::{
    domain::{SessionIdentity, SpreadRequest},
    dto::http::{CreateSpreadBody, CreateSpreadResponse},
    error::ClientError,
};

/// Header carrying the room key
pub const ROOM_ID_HEADER: &str = "X-Room-ID";
/// Header carrying the participant key
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Creates spreads on the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpreadApi: Send + Sync {
    /// Create a spread and return its redemption token.
    ///
    /// Called at most once per user action; implementations must not retry.
    async fn create_spread(
        &self,
        identity: &SessionIdentity,
        request: SpreadRequest,
    ) -> Result<String, ClientError>;
}

/// [`SpreadApi`] backed by `POST /api/distributor/spread`.
#[derive(Debug, Clone)]
pub struct HttpSpreadApi {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpSpreadApi {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SpreadApi for HttpSpreadApi {
    async fn create_spread(
        &self,
        identity: &SessionIdentity,
        request: SpreadRequest,
    ) -> Result<String, ClientError> {
        tracing::debug!(
            "Creating spread in room '{}': amount={}, count={}",
            identity.room_id(),
            request.amount,
            request.count
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ROOM_ID_HEADER, identity.room_id())
            .header(USER_ID_HEADER, identity.user_id())
            .json(&CreateSpreadBody {
                amount: request.amount,
                count: request.count,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::SpreadRejected {
                status: status.as_u16(),
                message: rejection_message(&body, status.canonical_reason()),
            });
        }

        let body: CreateSpreadResponse = response.json().await?;
        body.token()
            .map(str::to_string)
            .ok_or(ClientError::MissingToken)
    }
}

/// Pick a readable reason out of an error body.
///
/// Looks for `detail` (string form) or `message` in a JSON body, then falls
/// back to the raw body and finally to the status reason.
fn rejection_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    reason.unwrap_or("unknown error").to_string()
}
