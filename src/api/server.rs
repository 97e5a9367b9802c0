//! Axum API server for PolyFAQ.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::TranslationCache;
use crate::config::ServerConfig;
use crate::faq::FaqService;
use crate::resolver::ContentResolver;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// Write path: validation, persistence and cache invalidation.
    pub service: FaqService,
    /// Read path: language selection and cached translation.
    pub resolver: Arc<ContentResolver>,
}

impl AppState {
    pub fn new(service: FaqService, resolver: Arc<ContentResolver>) -> Self {
        Self { service, resolver }
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        self.resolver.cache()
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    // The API is read by public pages on other origins; writes carry JSON only.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Health
        .route("/api/health", get(super::routes::health::get_health))
        // Languages
        .route(
            "/api/languages",
            get(super::routes::languages::list_languages),
        )
        // Cache
        .route(
            "/api/cache/stats",
            get(super::routes::cache::get_cache_stats),
        )
        // FAQs
        .route(
            "/api/faqs",
            get(super::routes::faqs::list_faqs).post(super::routes::faqs::create_faq),
        )
        .route(
            "/api/faqs/{id}",
            get(super::routes::faqs::get_faq)
                .put(super::routes::faqs::replace_faq)
                .patch(super::routes::faqs::patch_faq)
                .delete(super::routes::faqs::delete_faq),
        )
        // Body size limit: 1 MiB.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the API server and run until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("PolyFAQ API server listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    tracing::info!("PolyFAQ API server stopped");
    Ok(())
}

#[cfg(test)]
impl AppState {
    /// In-memory state over `translator`, with English source content and a
    /// one-hour TTL.
    pub(crate) fn for_tests(translator: Arc<dyn crate::translate::Translator>) -> Self {
        use crate::faq::FaqStore;
        use crate::i18n::LanguageRegistry;
        use crate::invalidator::Invalidator;
        use std::time::Duration;

        let registry = LanguageRegistry::builtin().clone();
        let cache = Arc::new(TranslationCache::new(registry.codes()));
        let resolver = Arc::new(ContentResolver::new(
            translator.clone(),
            cache.clone(),
            registry,
            "en",
            Duration::from_secs(3600),
        ));
        let service = FaqService::new(
            Arc::new(FaqStore::new_in_memory()),
            translator,
            Invalidator::new(cache),
            "en",
        );
        Self::new(service, resolver)
    }
}
