//! Write-path cache invalidation.
//!
//! Called synchronously after a persisted write and before the write is
//! acknowledged, so no later read can see a translation of the old answer.

use std::sync::Arc;

use tracing::debug;

use crate::cache::TranslationCache;

#[derive(Clone)]
pub struct Invalidator {
    cache: Arc<TranslationCache>,
}

impl Invalidator {
    pub fn new(cache: Arc<TranslationCache>) -> Self {
        Self { cache }
    }

    /// Purge every cached translation of `id`, whether or not it was ever requested.
    ///
    /// Idempotent. Touches only the cache.
    pub fn on_entity_updated(&self, id: u64) {
        let removed = self.cache.invalidate(id);
        debug!(id, removed, "Invalidated translations after update");
    }

    /// Deletion purges exactly like an update with no replacement content.
    /// Ids are never reused, so the entity's generation record is dropped too.
    pub fn on_entity_deleted(&self, id: u64) {
        let removed = self.cache.forget(id);
        debug!(id, removed, "Invalidated translations after delete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn setup() -> (Invalidator, Arc<TranslationCache>) {
        let cache = Arc::new(TranslationCache::new(["en", "hi", "bn", "de"]));
        (Invalidator::new(cache.clone()), cache)
    }

    #[test]
    fn test_update_purges_all_languages() {
        let (inv, cache) = setup();
        let ttl = Duration::from_secs(60);
        cache.put(5, "hi", "a".into(), ttl);
        cache.put(5, "de", "b".into(), ttl);
        cache.put(6, "hi", "c".into(), ttl);

        inv.on_entity_updated(5);
        assert_eq!(cache.get(5, "hi"), None);
        assert_eq!(cache.get(5, "de"), None);
        assert_eq!(cache.get(6, "hi").as_deref(), Some("c"));
    }

    #[test]
    fn test_idempotent_on_empty_cache() {
        let (inv, cache) = setup();
        inv.on_entity_updated(1);
        inv.on_entity_updated(1);
        inv.on_entity_deleted(1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_purges() {
        let (inv, cache) = setup();
        cache.put(3, "bn", "x".into(), Duration::from_secs(60));
        inv.on_entity_deleted(3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_releases_generation_but_update_keeps_it() {
        let (inv, cache) = setup();
        inv.on_entity_updated(3);
        inv.on_entity_updated(4);
        assert_eq!(cache.tracked_generations(), 2);

        inv.on_entity_deleted(3);
        assert_eq!(cache.tracked_generations(), 1);
        assert_eq!(cache.generation(3), 0);
        assert!(cache.generation(4) > 0);
    }
}
