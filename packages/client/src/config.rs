//! Endpoint configuration.
//!
//! The endpoint is supplied from outside the client, either on the command
//! line or as a JSON document of the form `{ "endpointUrl": "ws://..." }`.
//! It is validated when the configuration is built so that a bad URL stops
//! the client at start-up instead of on first use.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::http::Uri;

use crate::error::ClientError;

/// Endpoint used when neither `--url` nor a config file is given
pub const DEFAULT_ENDPOINT_URL: &str = "ws://localhost:8080";

/// A validated `ws://` or `wss://` endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Validate and wrap an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MalformedConfiguration` if the URL does not
    /// parse, its scheme is not `ws`/`wss`, or it has no host.
    pub fn new(value: String) -> Result<Self, ClientError> {
        let uri: Uri = value.parse().map_err(|e| {
            ClientError::MalformedConfiguration(format!("invalid endpoint URL '{}': {}", value, e))
        })?;

        match uri.scheme_str() {
            Some("ws") | Some("wss") => {}
            Some(other) => {
                return Err(ClientError::MalformedConfiguration(format!(
                    "endpoint URL '{}' has scheme '{}', expected 'ws' or 'wss'",
                    value, other
                )));
            }
            None => {
                return Err(ClientError::MalformedConfiguration(format!(
                    "endpoint URL '{}' has no scheme, expected 'ws://' or 'wss://'",
                    value
                )));
            }
        }

        if uri.host().is_none_or(str::is_empty) {
            return Err(ClientError::MalformedConfiguration(format!(
                "endpoint URL '{}' has no host",
                value
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EndpointUrl {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EndpointUrl> for String {
    fn from(url: EndpointUrl) -> Self {
        url.0
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub endpoint_url: EndpointUrl,
}

impl ClientConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint_url: EndpointUrl::new(endpoint_url.into())?,
        })
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| {
            ClientError::MalformedConfiguration(format!("invalid configuration: {}", e))
        })
    }

    /// Read a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClientError::MalformedConfiguration(format!(
                "cannot read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Resolve the configuration from command-line inputs.
    ///
    /// An explicit URL wins over the config file. With neither, the
    /// configuration points at [`DEFAULT_ENDPOINT_URL`].
    pub fn resolve(url: Option<String>, config_path: Option<&Path>) -> Result<Self, ClientError> {
        match (url, config_path) {
            (Some(url), _) => Self::new(url),
            (None, Some(path)) => Self::load(path),
            (None, None) => Self::new(DEFAULT_ENDPOINT_URL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_accepts_ws_and_wss() {
        // テスト項目: ws:// と wss:// の URL を受け付ける
        // given (前提条件):
        let plain = "ws://localhost:8080".to_string();
        let secure = "wss://chat.example.com/ws".to_string();

        // when (操作):
        let plain = EndpointUrl::new(plain);
        let secure = EndpointUrl::new(secure);

        // then (期待する結果):
        assert_eq!(plain.unwrap().as_str(), "ws://localhost:8080");
        assert_eq!(secure.unwrap().as_str(), "wss://chat.example.com/ws");
    }

    #[test]
    fn test_endpoint_url_rejects_http_scheme() {
        // テスト項目: ws/wss 以外のスキームは拒否される
        // given (前提条件):
        let url = "http://localhost:8080".to_string();

        // when (操作):
        let result = EndpointUrl::new(url);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ClientError::MalformedConfiguration(_))
        ));
    }

    #[test]
    fn test_endpoint_url_rejects_missing_scheme() {
        // テスト項目: スキームのない URL は拒否される
        // given (前提条件):
        let url = "localhost:8080".to_string();

        // when (操作):
        let result = EndpointUrl::new(url);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ClientError::MalformedConfiguration(_))
        ));
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        // テスト項目: URL として解釈できない文字列は拒否される
        // given (前提条件):
        let url = "ws://local host".to_string();

        // when (操作):
        let result = EndpointUrl::new(url);

        // then (期待する結果):
        assert!(result.is_err());
        assert!(result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_config_from_json() {
        // テスト項目: endpointUrl を持つ JSON から設定を読み込める
        // given (前提条件):
        let json = r#"{ "endpointUrl": "ws://127.0.0.1:5500" }"#;

        // when (操作):
        let config = ClientConfig::from_json_str(json);

        // then (期待する結果):
        assert_eq!(
            config.unwrap().endpoint_url.as_str(),
            "ws://127.0.0.1:5500"
        );
    }

    #[test]
    fn test_config_from_json_validates_url() {
        // テスト項目: JSON 内の不正な URL は読み込み時に拒否される
        // given (前提条件):
        let json = r#"{ "endpointUrl": "ftp://example.com" }"#;

        // when (操作):
        let result = ClientConfig::from_json_str(json);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ClientError::MalformedConfiguration(_))
        ));
    }

    #[test]
    fn test_config_from_json_requires_endpoint() {
        // テスト項目: endpointUrl のない JSON は拒否される
        // given (前提条件):
        let json = r#"{ "url": "ws://localhost:8080" }"#;

        // when (操作):
        let result = ClientConfig::from_json_str(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_camel_case() {
        // テスト項目: 設定が camelCase の JSON にシリアライズされる
        // given (前提条件):
        let config = ClientConfig::new("ws://localhost:8080").unwrap();

        // when (操作):
        let json = serde_json::to_string(&config).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"endpointUrl":"ws://localhost:8080"}"#);
    }

    #[test]
    fn test_resolve_prefers_url_over_file() {
        // テスト項目: --url が設定ファイルより優先される
        // given (前提条件):
        let missing_file = Path::new("/nonexistent/tayori.json");

        // when (操作):
        let config = ClientConfig::resolve(
            Some("ws://127.0.0.1:5500".to_string()),
            Some(missing_file),
        );

        // then (期待する結果):
        assert_eq!(
            config.unwrap().endpoint_url.as_str(),
            "ws://127.0.0.1:5500"
        );
    }

    #[test]
    fn test_resolve_defaults_to_localhost() {
        // テスト項目: 指定がない場合はデフォルトのエンドポイントを使う
        // given (前提条件):

        // when (操作):
        let config = ClientConfig::resolve(None, None);

        // then (期待する結果):
        assert_eq!(config.unwrap().endpoint_url.as_str(), DEFAULT_ENDPOINT_URL);
    }

    #[test]
    fn test_load_missing_file_is_malformed_configuration() {
        // テスト項目: 読み込めない設定ファイルは MalformedConfiguration になる
        // given (前提条件):
        let missing_file = Path::new("/nonexistent/tayori.json");

        // when (操作):
        let result = ClientConfig::resolve(None, Some(missing_file));

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ClientError::MalformedConfiguration(_))
        ));
    }
}
