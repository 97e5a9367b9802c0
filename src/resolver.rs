//! Content resolver: picks the text a reader sees for a requested language.
//!
//! Question text comes from the precomputed translation slot or falls back to
//! the source question; the provider is never called for questions. Answer
//! text comes from the translation cache, or from a live provider call on a
//! miss. Provider failures degrade to the source answer and are never cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::cache::{CacheKey, TranslationCache};
use crate::faq::Faq;
use crate::i18n::LanguageRegistry;
use crate::translate::Translator;

/// An entry as served to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFaq {
    pub id: u64,
    pub question: String,
    pub answer: String,
    /// Language the request was resolved for (after normalization).
    #[serde(skip)]
    pub lang: String,
}

/// Resolver counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub provider_calls: u64,
    pub fallbacks: u64,
}

/// One provider call for a `(id, lang)` key, shared by every concurrent
/// miss on the same source answer. The outcome is published whether the call
/// succeeded or fell back, so waiters never repeat a failed call.
struct Flight {
    source: String,
    outcome: OnceCell<String>,
}

impl Flight {
    fn new(source: &str) -> Arc<Self> {
        Arc::new(Self {
            source: source.to_string(),
            outcome: OnceCell::new(),
        })
    }
}

/// Removes the flight from the map once no request holds it, including when
/// the request future is dropped mid-wait.
struct FlightGuard<'a> {
    inflight: &'a DashMap<CacheKey, Arc<Flight>>,
    key: CacheKey,
    flight: Arc<Flight>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // The map and this guard are the only holders once every waiter has left.
        self.inflight.remove_if(&self.key, |_, flight| {
            Arc::ptr_eq(flight, &self.flight) && Arc::strong_count(flight) <= 2
        });
    }
}

pub struct ContentResolver {
    translator: Arc<dyn Translator>,
    cache: Arc<TranslationCache>,
    registry: LanguageRegistry,
    source_lang: String,
    ttl: Duration,
    /// Per-key flights so concurrent misses for one key share a provider call.
    inflight: DashMap<CacheKey, Arc<Flight>>,
    provider_calls: AtomicU64,
    fallbacks: AtomicU64,
}

impl ContentResolver {
    /// `source_lang` should be a code from `registry`; unknown codes are kept verbatim.
    pub fn new(
        translator: Arc<dyn Translator>,
        cache: Arc<TranslationCache>,
        registry: LanguageRegistry,
        source_lang: &str,
        ttl: Duration,
    ) -> Self {
        let source_lang = registry
            .canonical(source_lang)
            .unwrap_or(source_lang)
            .to_string();
        Self {
            translator,
            cache,
            registry,
            source_lang,
            ttl,
            inflight: DashMap::new(),
            provider_calls: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
        }
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    /// Map a requested code to the language actually served.
    ///
    /// Missing, unknown, and source-language codes all resolve to the source
    /// language, so unknown codes never reach the provider.
    pub fn normalize_lang(&self, requested: Option<&str>) -> String {
        match requested.and_then(|code| self.registry.canonical(code)) {
            Some(code) => code.to_string(),
            None => {
                if let Some(code) = requested.filter(|c| !c.trim().is_empty()) {
                    debug!(code, "Unrecognized language, serving source language");
                }
                self.source_lang.clone()
            }
        }
    }

    /// Invalidation epoch to capture before loading entries for
    /// [`resolve_at`](Self::resolve_at).
    pub fn snapshot(&self) -> u64 {
        self.cache.epoch()
    }

    /// Resolve one entry. Never fails; translation problems degrade to source text.
    ///
    /// Uses a snapshot taken now. When `faq` was loaded while writes may be
    /// in flight, take [`snapshot`](Self::snapshot) before loading it and use
    /// [`resolve_at`](Self::resolve_at).
    pub async fn resolve(&self, faq: &Faq, requested: Option<&str>) -> ResolvedFaq {
        self.resolve_at(faq, requested, self.snapshot()).await
    }

    /// Resolve one entry loaded after `snapshot` was taken.
    ///
    /// A translation is cached only if the entry has not been invalidated
    /// since `snapshot`, so a reader holding a pre-update copy never
    /// repopulates the cache with its translation.
    pub async fn resolve_at(
        &self,
        faq: &Faq,
        requested: Option<&str>,
        snapshot: u64,
    ) -> ResolvedFaq {
        let lang = self.normalize_lang(requested);
        if lang == self.source_lang {
            return ResolvedFaq {
                id: faq.id,
                question: faq.question.clone(),
                answer: faq.answer.clone(),
                lang,
            };
        }

        let question = faq
            .precomputed_question(&lang)
            .unwrap_or(faq.question.as_str())
            .to_string();
        let answer = self.resolve_answer(faq, &lang, snapshot).await;
        ResolvedFaq {
            id: faq.id,
            question,
            answer,
            lang,
        }
    }

    /// Resolve a list of entries concurrently, preserving order.
    pub async fn resolve_all(&self, faqs: &[Faq], requested: Option<&str>) -> Vec<ResolvedFaq> {
        self.resolve_all_at(faqs, requested, self.snapshot()).await
    }

    /// [`resolve_all`](Self::resolve_all) for entries loaded after `snapshot`.
    pub async fn resolve_all_at(
        &self,
        faqs: &[Faq],
        requested: Option<&str>,
        snapshot: u64,
    ) -> Vec<ResolvedFaq> {
        futures::future::join_all(
            faqs.iter()
                .map(|faq| self.resolve_at(faq, requested, snapshot)),
        )
        .await
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }

    async fn resolve_answer(&self, faq: &Faq, lang: &str, snapshot: u64) -> String {
        if let Some(text) = self.cache.get(faq.id, lang) {
            return text;
        }

        let key = CacheKey::new(faq.id, lang);
        let flight = {
            let mut slot = self
                .inflight
                .entry(key.clone())
                .or_insert_with(|| Flight::new(&faq.answer));
            // A flight for a replaced answer must not serve this reader.
            if slot.source != faq.answer {
                *slot = Flight::new(&faq.answer);
            }
            Arc::clone(slot.value())
        };
        let guard = FlightGuard {
            inflight: &self.inflight,
            key,
            flight,
        };

        let answer = guard
            .flight
            .outcome
            .get_or_init(|| async {
                // Another request may have filled the entry before this flight started.
                let text = match self.cache.get(faq.id, lang) {
                    Some(text) => text,
                    None => self.translate_and_store(faq, lang, snapshot).await,
                };
                // Later requests retry or hit the cache instead of joining a
                // finished flight.
                self.inflight
                    .remove_if(&guard.key, |_, f| Arc::ptr_eq(f, &guard.flight));
                text
            })
            .await
            .clone();
        answer
    }

    async fn translate_and_store(&self, faq: &Faq, lang: &str, snapshot: u64) -> String {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        match self
            .translator
            .translate(&faq.answer, &self.source_lang, lang)
            .await
        {
            Ok(text) => {
                debug!(id = faq.id, lang, provider = self.translator.name(), "Translated answer");
                self.cache
                    .put_if_current(faq.id, lang, text.clone(), self.ttl, snapshot);
                text
            }
            Err(e) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                warn!(
                    id = faq.id,
                    lang,
                    provider = self.translator.name(),
                    error = %e,
                    "Translation failed, serving source answer"
                );
                faq.answer.clone()
            }
        }
    }
}
