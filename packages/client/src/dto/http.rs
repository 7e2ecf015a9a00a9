//! Spread endpoint bodies.

use serde::{Deserialize, Serialize};

/// `POST /api/distributor/spread` request body
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreateSpreadBody {
    pub amount: i64,
    pub count: i64,
}

/// Wrapped payload (`{success, message, data: {token}}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadData {
    #[serde(default)]
    pub token: Option<String>,
}

/// `POST /api/distributor/spread` response body.
///
/// Accepts both a bare `{token}` and the wrapped response model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSpreadResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<SpreadData>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateSpreadResponse {
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|data| data.token.as_deref()))
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_top_level() {
        // テスト項目: トップレベルの token が読み取られる
        // given (前提条件):
        let body = r#"{"token":"t1"}"#;

        // when (操作):
        let response: CreateSpreadResponse = serde_json::from_str(body).unwrap();

        // then (期待する結果):
        assert_eq!(response.token(), Some("t1"));
    }

    #[test]
    fn test_token_from_wrapped_response() {
        // テスト項目: data でラップされた token が読み取られる
        // given (前提条件):
        let body = r#"{"success":true,"message":"created","data":{"token":"abc"}}"#;

        // when (操作):
        let response: CreateSpreadResponse = serde_json::from_str(body).unwrap();

        // then (期待する結果):
        assert_eq!(response.token(), Some("abc"));
        assert_eq!(response.message.as_deref(), Some("created"));
    }

    #[test]
    fn test_token_missing() {
        // テスト項目: token がない場合は None
        // given (前提条件):
        let body = r#"{"success":true,"data":{}}"#;

        // when (操作):
        let response: CreateSpreadResponse = serde_json::from_str(body).unwrap();

        // then (期待する結果):
        assert_eq!(response.token(), None);
    }

    #[test]
    fn test_empty_token_is_treated_as_missing() {
        // テスト項目: 空文字の token は None として扱われる
        // given (前提条件):
        let body = r#"{"token":""}"#;

        // when (操作):
        let response: CreateSpreadResponse = serde_json::from_str(body).unwrap();

        // then (期待する結果):
        assert_eq!(response.token(), None);
    }
}
