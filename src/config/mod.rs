//! Configuration for PolyFAQ.
//!
//! Loaded from `~/.polyfaq/config.json` (or an explicit path), then overlaid
//! with `POLYFAQ_*` environment variables. Every section is
//! `#[serde(default)]`, so a partial or empty file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FaqError, Result};
use crate::i18n::LanguageRegistry;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1).
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Translation cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a live translation, applied uniformly to every entry.
    pub ttl_secs: u64,
    /// Background sweep interval. `0` disables the sweeper (expiry stays lazy).
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            sweep_interval_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

/// Translation provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// LibreTranslate-compatible endpoint. `None` disables live translation.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout for the provider.
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// FAQ store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file backing the store. Defaults to `~/.polyfaq/faqs.json`.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| Config::dir().join("faqs.json"))
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language canonical content is authored in.
    pub source_lang: String,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub translator: TranslatorConfig,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_lang: "en".to_string(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            translator: TranslatorConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// `~/.polyfaq`
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".polyfaq")
    }

    /// `~/.polyfaq/config.json`
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path with environment overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_with_env(&Self::path())
    }

    /// Load from `path` (missing file means defaults), apply `.env` and
    /// `POLYFAQ_*` overrides, then validate.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Failed to read .env file: {}", e);
            }
        }
        let mut config = if path.exists() {
            Self::load_from_path(path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.normalize()?;
        Ok(config)
    }

    /// Parse a config file without environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            FaqError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data)
            .map_err(|e| FaqError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Overlay values from `lookup` (normally the process environment).
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("POLYFAQ_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = lookup("POLYFAQ_PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %v, "Ignoring invalid POLYFAQ_PORT"),
            }
        }
        if let Some(v) = lookup("POLYFAQ_CACHE_TTL_SECS") {
            match v.parse() {
                Ok(ttl) => self.cache.ttl_secs = ttl,
                Err(_) => warn!(value = %v, "Ignoring invalid POLYFAQ_CACHE_TTL_SECS"),
            }
        }
        if let Some(v) = lookup("POLYFAQ_SOURCE_LANG") {
            self.source_lang = v;
        }
        if let Some(v) = lookup("POLYFAQ_TRANSLATOR_ENDPOINT") {
            self.translator.endpoint = Some(v);
        }
        if let Some(v) = lookup("POLYFAQ_TRANSLATOR_API_KEY") {
            self.translator.api_key = Some(v);
        }
        if let Some(v) = lookup("POLYFAQ_STORE_PATH") {
            self.store.path = Some(PathBuf::from(v));
        }
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(FaqError::Config("cache.ttl_secs must be positive".into()));
        }
        Self::canonical_source_lang(&self.source_lang)?;
        Ok(())
    }

    /// Validate, then rewrite `source_lang` in its canonical form (`"HI"` → `"hi"`).
    pub fn normalize(&mut self) -> Result<()> {
        self.validate()?;
        self.source_lang = Self::canonical_source_lang(&self.source_lang)?.to_string();
        Ok(())
    }

    fn canonical_source_lang(code: &str) -> Result<&'static str> {
        LanguageRegistry::builtin()
            .require(code)
            .map_err(|e| FaqError::Config(format!("source_lang: {e}")))
    }
}
