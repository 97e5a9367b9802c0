//! Translation caching with TTL expiry and per-entry invalidation.

pub mod translation_cache;

pub use translation_cache::{CacheKey, CacheStats, TranslationCache};
