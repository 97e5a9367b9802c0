//! Canonical FAQ entries: model, storage and the write path.

pub mod model;
pub mod service;
pub mod store;

pub use model::{Faq, FaqPatch, NewFaq, PrecomputedLang, QuestionTranslations};
pub use service::FaqService;
pub use store::{FaqRepository, FaqStore};
