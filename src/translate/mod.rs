//! Translation providers.
//!
//! The [`Translator`] trait is the only contract the cache and resolver rely
//! on. One provider instance is created at startup and shared as
//! `Arc<dyn Translator>`.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TranslatorConfig;
use crate::error::{FaqError, Result};

pub use http::HttpTranslator;

/// An external translation capability.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `dest`. Codes are canonical registry codes.
    async fn translate(&self, text: &str, source: &str, dest: &str) -> Result<String>;
}

/// Provider used when none is configured. Every call fails, so reads
/// degrade to source-language content and nothing is cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn translate(&self, _text: &str, _source: &str, _dest: &str) -> Result<String> {
        Err(FaqError::Provider(
            "no translation provider configured".to_string(),
        ))
    }
}

/// Build the provider described by `config`.
pub fn from_config(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    match config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(endpoint) => Ok(Arc::new(HttpTranslator::new(
            endpoint,
            config.api_key.clone(),
            config.timeout_secs,
        )?)),
        None => Ok(Arc::new(DisabledTranslator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_translator_always_fails() {
        let t = DisabledTranslator;
        let err = t.translate("hello", "en", "hi").await.unwrap_err();
        assert!(matches!(err, FaqError::Provider(_)));
        assert_eq!(t.name(), "disabled");
    }

    #[test]
    fn test_from_config_without_endpoint_is_disabled() {
        let cfg = TranslatorConfig::default();
        let t = from_config(&cfg).unwrap();
        assert_eq!(t.name(), "disabled");

        let cfg = TranslatorConfig {
            endpoint: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(from_config(&cfg).unwrap().name(), "disabled");
    }

    #[test]
    fn test_from_config_with_endpoint_is_http() {
        let cfg = TranslatorConfig {
            endpoint: Some("http://localhost:5000/translate".into()),
            ..Default::default()
        };
        assert_eq!(from_config(&cfg).unwrap().name(), "http");
    }
}
