//! `polyfaq serve` command: wire the store, cache, resolver and API together.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use polyfaq::api::{start_server, AppState};
use polyfaq::cache::TranslationCache;
use polyfaq::config::Config;
use polyfaq::faq::{FaqService, FaqStore};
use polyfaq::i18n::LanguageRegistry;
use polyfaq::invalidator::Invalidator;
use polyfaq::resolver::ContentResolver;
use polyfaq::translate;

pub(crate) async fn cmd_serve(
    mut config: Config,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let registry = LanguageRegistry::builtin().clone();
    let cache = Arc::new(TranslationCache::new(registry.codes()));
    let shutdown = CancellationToken::new();

    let sweeper = config
        .cache
        .sweep_interval()
        .map(|interval| cache.clone().spawn_sweeper(interval, shutdown.clone()));

    let translator = translate::from_config(&config.translator)
        .context("Failed to build translation provider")?;
    if config.translator.endpoint.is_none() {
        warn!("No translator endpoint configured; serving source-language content only");
    }

    let resolver = Arc::new(ContentResolver::new(
        translator.clone(),
        cache.clone(),
        registry,
        &config.source_lang,
        config.cache.ttl(),
    ));

    let store_path = config.store.resolved_path();
    let store = FaqStore::new(store_path.clone());
    let count = store
        .load()
        .await
        .with_context(|| format!("Failed to load FAQ store from {}", store_path.display()))?;

    let service = FaqService::new(
        Arc::new(store),
        translator.clone(),
        Invalidator::new(cache),
        resolver.source_lang(),
    );

    info!(
        faqs = count,
        store = %store_path.display(),
        provider = translator.name(),
        source_lang = resolver.source_lang(),
        ttl_secs = config.cache.ttl_secs,
        "Starting PolyFAQ"
    );

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                ctrl_c_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let state = AppState::new(service, resolver);
    let result = start_server(&config.server, state, shutdown.clone()).await;

    shutdown.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    result.map_err(|e| anyhow::anyhow!(e)).context("API server failed")
}
