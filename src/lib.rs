//! PolyFAQ: a multilingual FAQ service with cached live translation.
//!
//! Canonical entries are authored in one source language. Readers ask for a
//! language code and receive the question from a precomputed translation slot
//! and the answer from the [`TranslationCache`], filled on demand by a
//! [`Translator`]. Every write invalidates the entry's cached translations
//! before it is acknowledged.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod faq;
pub mod i18n;
pub mod invalidator;
pub mod resolver;
pub mod translate;

pub use cache::{CacheKey, CacheStats, TranslationCache};
pub use config::Config;
pub use error::{FaqError, Result};
pub use faq::{Faq, FaqPatch, FaqService, FaqStore, NewFaq};
pub use i18n::LanguageRegistry;
pub use invalidator::Invalidator;
pub use resolver::{ContentResolver, ResolvedFaq};
pub use translate::Translator;
