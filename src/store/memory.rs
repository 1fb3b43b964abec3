use super::{ItemProgress, ReviewKey, ReviewStore};
use crate::error::{Result, TutorError};
use crate::placement::CefrLevel;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local store; the mutex makes each `put` an atomic compare-and-swap.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    items: Mutex<BTreeMap<ReviewKey, ItemProgress>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, e.g. from an import. Existing keys are overwritten.
    pub fn from_progress(progress: impl IntoIterator<Item = ItemProgress>) -> Self {
        let items = progress.into_iter().map(|p| (p.key.clone(), p)).collect();
        Self {
            items: Mutex::new(items),
        }
    }

    /// Copy of every stored record, ordered by key.
    pub fn snapshot(&self) -> Result<Vec<ItemProgress>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ReviewKey, ItemProgress>>> {
        self.items
            .lock()
            .map_err(|e| TutorError::LockPoisoned(e.to_string()))
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn get(&self, key: &ReviewKey) -> Result<Option<ItemProgress>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, mut progress: ItemProgress, expected_version: Option<u64>) -> Result<u64> {
        let mut items = self.lock()?;
        let found = items.get(&progress.key).map(|p| p.version);
        if found != expected_version {
            return Err(TutorError::Conflict {
                key: progress.key.to_string(),
                expected: expected_version,
                found,
            });
        }
        let version = found.unwrap_or(0) + 1;
        progress.version = version;
        items.insert(progress.key.clone(), progress);
        Ok(version)
    }

    fn list_for_user(&self, user_id: &str, level: Option<CefrLevel>) -> Result<Vec<ItemProgress>> {
        Ok(self
            .lock()?
            .values()
            .filter(|p| p.key.user_id == user_id)
            .filter(|p| level.is_none() || p.level == level)
            .cloned()
            .collect())
    }
}
