//! HTTP translation provider speaking the LibreTranslate JSON API.
//!
//! Request: `POST {endpoint}` with `{"q", "source", "target", "format", "api_key"?}`.
//! Response: `{"translatedText": "..."}` on success, `{"error": "..."}` otherwise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::Translator;
use crate::error::{FaqError, Result};

/// HTTP provider for a LibreTranslate-compatible endpoint.
pub struct HttpTranslator {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for HttpTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslator")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpTranslator {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| FaqError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    /// Build the JSON request body for one translation.
    ///
    /// Answers may contain HTML, so the provider is always asked to preserve markup.
    pub fn build_request_body(&self, text: &str, source: &str, dest: &str) -> Value {
        let mut body = json!({
            "q": text,
            "source": source,
            "target": dest,
            "format": "html",
        });
        if let Some(ref key) = self.api_key {
            body["api_key"] = json!(key);
        }
        body
    }

    /// Extract the translated text from a provider response body.
    pub fn parse_response(body: &Value) -> Result<String> {
        if let Some(text) = body["translatedText"].as_str() {
            return Ok(text.to_string());
        }
        let message = body["error"]
            .as_str()
            .unwrap_or("response missing translatedText");
        Err(FaqError::Provider(message.to_string()))
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, text: &str, source: &str, dest: &str) -> Result<String> {
        let body = self.build_request_body(text, source, dest);
        debug!(endpoint = %self.endpoint, source, dest, chars = text.len(), "Translation request");

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        // Error pages from proxies are often not JSON.
        let raw = response.text().await?;
        let payload: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
        if !status.is_success() {
            let message = payload["error"].as_str().unwrap_or("request failed");
            return Err(FaqError::Provider(format!("HTTP {status}: {message}")));
        }
        Self::parse_response(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(key: Option<&str>) -> HttpTranslator {
        HttpTranslator::new(
            "http://localhost:5000/translate",
            key.map(String::from),
            10,
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = translator(None).build_request_body("<p>Hi</p>", "en", "hi");
        assert_eq!(body["q"], "<p>Hi</p>");
        assert_eq!(body["source"], "en");
        assert_eq!(body["target"], "hi");
        assert_eq!(body["format"], "html");
        assert!(body.get("api_key").is_none());
    }

    #[test]
    fn test_request_body_includes_api_key() {
        let body = translator(Some("secret")).build_request_body("x", "en", "bn");
        assert_eq!(body["api_key"], "secret");
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let body = translator(Some("")).build_request_body("x", "en", "bn");
        assert!(body.get("api_key").is_none());
    }

    #[test]
    fn test_parse_success() {
        let body = json!({"translatedText": "यह एक चीज़ है।"});
        assert_eq!(
            HttpTranslator::parse_response(&body).unwrap(),
            "यह एक चीज़ है।"
        );
    }

    #[test]
    fn test_parse_error_body() {
        let body = json!({"error": "quota exceeded"});
        let err = HttpTranslator::parse_response(&body).unwrap_err();
        assert!(matches!(err, FaqError::Provider(ref m) if m == "quota exceeded"));

        let err = HttpTranslator::parse_response(&json!({})).unwrap_err();
        assert!(matches!(err, FaqError::Provider(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let dbg = format!("{:?}", translator(Some("secret")));
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let t = HttpTranslator::new("http://127.0.0.1:1/translate", None, 1).unwrap();
        let err = t.translate("hello", "en", "hi").await.unwrap_err();
        assert!(matches!(err, FaqError::Provider(_)));
    }
}
