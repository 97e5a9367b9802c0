//! FAQ entity store and JSON persistence.
//!
//! Provides the [`FaqRepository`] seam and [`FaqStore`], an async,
//! `Arc`-cloneable implementation backed by an in-memory map and an optional
//! JSON file. All mutating operations persist atomically (write full file
//! after every change).
//!
//! # Example
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use polyfaq::faq::{FaqRepository, FaqStore, NewFaq};
//!
//! let store = FaqStore::new_in_memory();
//! let faq = store.create(NewFaq::new("What is X?", "X is a thing.")).await.unwrap();
//! let all = store.list().await;
//! assert_eq!(all.len(), 1);
//! assert_eq!(all[0].id, faq.id);
//! # });
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{Faq, FaqPatch, NewFaq};
use crate::error::{FaqError, Result};

/// Storage for canonical FAQ entries.
#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// All entries, ordered by id.
    async fn list(&self) -> Vec<Faq>;

    async fn get(&self, id: u64) -> Option<Faq>;

    /// Validate and insert a new entry, assigning its id.
    async fn create(&self, new: NewFaq) -> Result<Faq>;

    /// Merge `patch` into an existing entry.
    ///
    /// With `expected`, the write only happens if the stored question and
    /// precomputed translations still equal those of `expected`; otherwise
    /// it fails with [`FaqError::Conflict`] and nothing changes.
    async fn update(&self, id: u64, patch: FaqPatch, expected: Option<&Faq>) -> Result<Faq>;

    async fn delete(&self, id: u64) -> Result<()>;
}

#[derive(Default)]
struct StoreState {
    faqs: BTreeMap<u64, Faq>,
    next_id: u64,
}

/// FAQ store backed by an in-memory map and optional JSON file.
///
/// Clone is cheap — all clones share the same `Arc<RwLock<_>>`.
#[derive(Clone)]
pub struct FaqStore {
    state: Arc<RwLock<StoreState>>,
    path: Option<PathBuf>,
}

impl FaqStore {
    /// Create a store backed by a JSON file at `path`.
    ///
    /// Call [`load`](Self::load) after construction to restore previously
    /// persisted entries.
    pub fn new(path: PathBuf) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            path: Some(path),
        }
    }

    /// Create an in-memory-only store (useful for tests).
    pub fn new_in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            path: None,
        }
    }

    /// Load entries from the backing JSON file.
    ///
    /// No-op if the file does not exist or this is an in-memory store.
    pub async fn load(&self) -> Result<usize> {
        let Some(ref path) = self.path else {
            return Ok(0);
        };
        if !path.exists() {
            return Ok(0);
        }
        let data = tokio::fs::read_to_string(path).await?;
        let faqs: Vec<Faq> = serde_json::from_str(&data)?;
        let mut state = self.state.write().await;
        for faq in faqs {
            state.next_id = state.next_id.max(faq.id);
            state.faqs.insert(faq.id, faq);
        }
        debug!(path = %path.display(), count = state.faqs.len(), "Loaded FAQ store");
        Ok(state.faqs.len())
    }

    /// Persist the given state to disk. No-op for in-memory stores.
    async fn save(&self, state: &StoreState) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let faqs: Vec<&Faq> = state.faqs.values().collect();
        let data = serde_json::to_string_pretty(&faqs)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[async_trait]
impl FaqRepository for FaqStore {
    async fn list(&self) -> Vec<Faq> {
        self.state.read().await.faqs.values().cloned().collect()
    }

    async fn get(&self, id: u64) -> Option<Faq> {
        self.state.read().await.faqs.get(&id).cloned()
    }

    async fn create(&self, new: NewFaq) -> Result<Faq> {
        new.validate()?;
        // The write guard is held through save() so the file never lags a
        // concurrent writer's view of the map.
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = Self::now();
        let faq = Faq {
            id: state.next_id,
            question: new.question,
            answer: new.answer,
            translations: new.translations,
            created_at: now.clone(),
            updated_at: now,
        };
        state.faqs.insert(faq.id, faq.clone());
        if let Err(e) = self.save(&state).await {
            state.faqs.remove(&faq.id);
            return Err(e);
        }
        Ok(faq)
    }

    async fn update(&self, id: u64, patch: FaqPatch, expected: Option<&Faq>) -> Result<Faq> {
        patch.validate()?;
        let mut state = self.state.write().await;
        let previous = state.faqs.get(&id).cloned().ok_or(FaqError::NotFound(id))?;
        if let Some(expected) = expected {
            if previous.question != expected.question
                || previous.translations != expected.translations
            {
                debug!(id, "Conditional update lost to a concurrent write");
                return Err(FaqError::Conflict(id));
            }
        }
        let mut faq = previous.clone();
        patch.apply(&mut faq);
        faq.updated_at = Self::now();
        state.faqs.insert(id, faq.clone());
        if let Err(e) = self.save(&state).await {
            state.faqs.insert(id, previous);
            return Err(e);
        }
        Ok(faq)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut state = self.state.write().await;
        let removed = state.faqs.remove(&id).ok_or(FaqError::NotFound(id))?;
        if let Err(e) = self.save(&state).await {
            state.faqs.insert(id, removed);
            return Err(e);
        }
        Ok(())
    }
}
