//! FAQ write path.
//!
//! Every successful update or delete calls the [`Invalidator`] before
//! returning, so the caller's acknowledgement happens after the purge.
//! Precomputed question translations are filled best-effort at write time:
//! only empty slots are generated, and a provider failure leaves the slot
//! empty without failing the write.
//!
//! Updates are optimistic: translations are filled from a read of the entry,
//! and the store write is conditional on that read still being current. A
//! lost race re-reads and tries again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::model::{Faq, FaqPatch, NewFaq, QuestionTranslations};
use super::store::FaqRepository;
use crate::error::{FaqError, Result};
use crate::invalidator::Invalidator;
use crate::translate::Translator;

/// Conditional write attempts before an update gives up with a conflict.
const MAX_UPDATE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct FaqService {
    store: Arc<dyn FaqRepository>,
    translator: Arc<dyn Translator>,
    invalidator: Invalidator,
    source_lang: String,
}

impl FaqService {
    pub fn new(
        store: Arc<dyn FaqRepository>,
        translator: Arc<dyn Translator>,
        invalidator: Invalidator,
        source_lang: &str,
    ) -> Self {
        Self {
            store,
            translator,
            invalidator,
            source_lang: source_lang.to_string(),
        }
    }

    pub async fn list(&self) -> Vec<Faq> {
        self.store.list().await
    }

    pub async fn get(&self, id: u64) -> Result<Faq> {
        self.store.get(id).await.ok_or(FaqError::NotFound(id))
    }

    pub async fn create(&self, mut new: NewFaq) -> Result<Faq> {
        new.validate()?;
        self.fill_translations(&new.question, &mut new.translations)
            .await;
        let faq = self.store.create(new).await?;
        info!(id = faq.id, "Created FAQ");
        Ok(faq)
    }

    /// Merge update: only supplied fields change.
    ///
    /// An empty patch returns the current entry without writing.
    pub async fn update_partial(&self, id: u64, patch: FaqPatch) -> Result<Faq> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get(id).await;
        }

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let current = self.get(id).await?;

            let mut preview = current.clone();
            patch.clone().apply(&mut preview);
            let mut translations = preview.translations;
            self.fill_translations(&preview.question, &mut translations)
                .await;
            let attempt_patch = FaqPatch {
                translations: Some(translations),
                ..patch.clone()
            };

            match self.store.update(id, attempt_patch, Some(&current)).await {
                Ok(faq) => {
                    self.invalidator.on_entity_updated(id);
                    info!(id, "Updated FAQ");
                    return Ok(faq);
                }
                Err(FaqError::Conflict(_)) => {
                    debug!(id, attempt, "Entry changed during update, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        warn!(id, attempts = MAX_UPDATE_ATTEMPTS, "Giving up on contended update");
        Err(FaqError::Conflict(id))
    }

    /// Full update: every source field is required.
    pub async fn update_full(&self, id: u64, new: NewFaq) -> Result<Faq> {
        new.validate()?;
        self.update_partial(id, FaqPatch::from(new)).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.store.delete(id).await?;
        self.invalidator.on_entity_deleted(id);
        info!(id, "Deleted FAQ");
        Ok(())
    }

    /// Fill empty precomputed slots by translating `question`.
    async fn fill_translations(&self, question: &str, translations: &mut QuestionTranslations) {
        for lang in translations.missing() {
            if lang.code() == self.source_lang {
                continue;
            }
            match self
                .translator
                .translate(question, &self.source_lang, lang.code())
                .await
            {
                Ok(text) => translations.set(lang, Some(text)),
                Err(e) => warn!(
                    lang = lang.code(),
                    error = %e,
                    "Precomputed question translation failed, leaving empty"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TranslationCache;
    use crate::faq::model::PrecomputedLang;
    use crate::faq::store::FaqStore;
    use crate::translate::DisabledTranslator;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct PrefixTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for PrefixTranslator {
        fn name(&self) -> &str {
            "prefix"
        }

        async fn translate(&self, text: &str, _source: &str, dest: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{dest}] {text}"))
        }
    }

    /// Prefix translator that parks on one `(text, dest)` pair until released.
    struct GatedTranslator {
        gate: (&'static str, &'static str),
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Translator for GatedTranslator {
        fn name(&self) -> &str {
            "gated"
        }

        async fn translate(&self, text: &str, _source: &str, dest: &str) -> Result<String> {
            if (text, dest) == self.gate {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(format!("[{dest}] {text}"))
        }
    }

    /// Repository whose conditional writes always lose.
    struct ContendedStore(FaqStore);

    #[async_trait]
    impl FaqRepository for ContendedStore {
        async fn list(&self) -> Vec<Faq> {
            self.0.list().await
        }

        async fn get(&self, id: u64) -> Option<Faq> {
            self.0.get(id).await
        }

        async fn create(&self, new: NewFaq) -> Result<Faq> {
            self.0.create(new).await
        }

        async fn update(&self, id: u64, patch: FaqPatch, expected: Option<&Faq>) -> Result<Faq> {
            match expected {
                Some(_) => Err(FaqError::Conflict(id)),
                None => self.0.update(id, patch, None).await,
            }
        }

        async fn delete(&self, id: u64) -> Result<()> {
            self.0.delete(id).await
        }
    }

    struct Fixture {
        service: FaqService,
        cache: Arc<TranslationCache>,
        translator: Arc<PrefixTranslator>,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(TranslationCache::new(["en", "hi", "bn", "fr"]));
        let translator = Arc::new(PrefixTranslator {
            calls: AtomicUsize::new(0),
        });
        let service = FaqService::new(
            Arc::new(FaqStore::new_in_memory()),
            translator.clone(),
            Invalidator::new(cache.clone()),
            "en",
        );
        Fixture {
            service,
            cache,
            translator,
        }
    }

    #[tokio::test]
    async fn test_create_fills_precomputed_questions() {
        let f = fixture();
        let faq = f
            .service
            .create(NewFaq::new("What is Python?", "A language."))
            .await
            .unwrap();
        assert_eq!(
            faq.translations.get(PrecomputedLang::Hi),
            Some("[hi] What is Python?")
        );
        assert_eq!(
            faq.translations.get(PrecomputedLang::Bn),
            Some("[bn] What is Python?")
        );
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_translations() {
        let f = fixture();
        let mut new = NewFaq::new("Q", "A");
        new.translations.set(PrecomputedLang::Hi, Some("manual".into()));
        let faq = f.service.create(new).await.unwrap();
        assert_eq!(faq.translations.get(PrecomputedLang::Hi), Some("manual"));
        assert_eq!(f.translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_does_not_fail_write() {
        let cache = Arc::new(TranslationCache::new(["en", "hi"]));
        let service = FaqService::new(
            Arc::new(FaqStore::new_in_memory()),
            Arc::new(DisabledTranslator),
            Invalidator::new(cache),
            "en",
        );
        let faq = service.create(NewFaq::new("Q", "A")).await.unwrap();
        assert_eq!(faq.translations, QuestionTranslations::default());
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let f = fixture();
        let err = f.service.create(NewFaq::new(" ", "A")).await.unwrap_err();
        assert!(matches!(err, FaqError::Validation(_)));
        assert_eq!(f.translator.calls.load(Ordering::SeqCst), 0);
        assert!(f.service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Q", "A")).await.unwrap();
        f.cache
            .put(faq.id, "fr", "[fr] A".into(), Duration::from_secs(60));

        f.service
            .update_partial(
                faq.id,
                FaqPatch {
                    answer: Some("A2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(f.cache.get(faq.id, "fr"), None);
    }

    #[tokio::test]
    async fn test_answer_only_update_keeps_precomputed_questions() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Q", "A")).await.unwrap();
        let calls = f.translator.calls.load(Ordering::SeqCst);
        let updated = f
            .service
            .update_partial(
                faq.id,
                FaqPatch {
                    answer: Some("A2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.translations, faq.translations);
        assert_eq!(f.translator.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_question_update_regenerates_precomputed_questions() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Old?", "A")).await.unwrap();
        let updated = f
            .service
            .update_partial(
                faq.id,
                FaqPatch {
                    question: Some("New?".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.translations.get(PrecomputedLang::Hi),
            Some("[hi] New?")
        );
    }

    #[tokio::test]
    async fn test_interleaved_updates_keep_translations_of_new_question() {
        let store = Arc::new(FaqStore::new_in_memory());
        let mut new = NewFaq::new("Old?", "A");
        new.translations
            .set(PrecomputedLang::Hi, Some("[hi] Old?".into()));
        let id = store.create(new).await.unwrap().id;

        let translator = Arc::new(GatedTranslator {
            gate: ("Old?", "bn"),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let cache = Arc::new(TranslationCache::new(["en", "hi", "bn"]));
        let service = FaqService::new(
            store.clone(),
            translator.clone(),
            Invalidator::new(cache),
            "en",
        );

        // A reads "Old?" and parks while filling the Bengali slot.
        let answer_update = tokio::spawn({
            let service = service.clone();
            async move {
                service
                    .update_partial(
                        id,
                        FaqPatch {
                            answer: Some("A2".into()),
                            ..Default::default()
                        },
                    )
                    .await
            }
        });
        translator.entered.notified().await;

        // B changes the question and commits first.
        service
            .update_partial(
                id,
                FaqPatch {
                    question: Some("New?".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        translator.release.notify_one();
        let faq = answer_update.await.unwrap().unwrap();

        assert_eq!(faq.question, "New?");
        assert_eq!(faq.answer, "A2");
        assert_eq!(faq.translations.get(PrecomputedLang::Hi), Some("[hi] New?"));
        assert_eq!(faq.translations.get(PrecomputedLang::Bn), Some("[bn] New?"));
        assert_eq!(store.get(id).await.unwrap(), faq);
    }

    #[tokio::test]
    async fn test_persistent_contention_is_conflict() {
        let inner = FaqStore::new_in_memory();
        let id = inner.create(NewFaq::new("Q", "A")).await.unwrap().id;
        let cache = Arc::new(TranslationCache::new(["en", "hi"]));
        cache.put(id, "hi", "x".into(), Duration::from_secs(60));
        let service = FaqService::new(
            Arc::new(ContendedStore(inner)),
            Arc::new(DisabledTranslator),
            Invalidator::new(cache.clone()),
            "en",
        );

        let err = service
            .update_partial(
                id,
                FaqPatch {
                    answer: Some("A2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::Conflict(c) if c == id));
        assert_eq!(service.get(id).await.unwrap().answer, "A");
        assert_eq!(cache.get(id, "hi").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_no_op() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Q", "A")).await.unwrap();
        f.cache
            .put(faq.id, "fr", "[fr] A".into(), Duration::from_secs(60));
        let calls = f.translator.calls.load(Ordering::SeqCst);

        let same = f
            .service
            .update_partial(faq.id, FaqPatch::default())
            .await
            .unwrap();
        assert_eq!(same, faq);
        assert_eq!(f.cache.get(faq.id, "fr").as_deref(), Some("[fr] A"));
        assert_eq!(f.translator.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_full_update_requires_all_fields() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Q", "A")).await.unwrap();
        let err = f
            .service
            .update_full(faq.id, NewFaq::new("Q2", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::Validation(_)));
        assert_eq!(f.service.get(faq.id).await.unwrap().question, "Q");

        let updated = f
            .service
            .update_full(faq.id, NewFaq::new("Q2", "A2"))
            .await
            .unwrap();
        assert_eq!(updated.question, "Q2");
        assert_eq!(updated.answer, "A2");
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_partial(77, FaqPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::NotFound(77)));
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_removes() {
        let f = fixture();
        let faq = f.service.create(NewFaq::new("Q", "A")).await.unwrap();
        f.cache
            .put(faq.id, "hi", "x".into(), Duration::from_secs(60));
        f.service.delete(faq.id).await.unwrap();
        assert!(f.cache.is_empty());
        assert!(matches!(
            f.service.get(faq.id).await,
            Err(FaqError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete(faq.id).await,
            Err(FaqError::NotFound(_))
        ));
    }
}
