//! Review progress storage boundary.
//!
//! The scheduler is pure; this module owns the read-compute-write cycle around it.
//! Stores keep one versioned `ItemProgress` per (user, item) and reject writes whose
//! expected version no longer matches, so two racing reviews cannot silently drop one.

mod memory;

pub use memory::InMemoryReviewStore;

use crate::error::{Result, TutorError};
use crate::models::{ReviewState, sm2};
use crate::placement::CefrLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewKey {
    pub user_id: String,
    pub item_id: String,
}

impl ReviewKey {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.item_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemProgress {
    #[serde(flatten)]
    pub key: ReviewKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CefrLevel>,
    #[serde(flatten)]
    pub state: ReviewState,
    /// Bumped on every successful write.
    #[serde(default)]
    pub version: u64,
}

pub trait ReviewStore {
    fn get(&self, key: &ReviewKey) -> Result<Option<ItemProgress>>;

    /// Writes `progress` if the stored version equals `expected_version`
    /// (`None` meaning the key must not exist yet). Returns the new version.
    fn put(&self, progress: ItemProgress, expected_version: Option<u64>) -> Result<u64>;

    /// All progress of a user, optionally restricted to one level, ordered by item id.
    fn list_for_user(&self, user_id: &str, level: Option<CefrLevel>) -> Result<Vec<ItemProgress>>;
}

/// Applies one review to the stored state of `key` and writes it back.
///
/// A missing record is a new item. A concurrent write in between surfaces as
/// `TutorError::Conflict`; nothing is retried here.
pub fn record_review<S: ReviewStore + ?Sized>(
    store: &S,
    key: &ReviewKey,
    level: Option<CefrLevel>,
    quality: i64,
    now: DateTime<Utc>,
) -> Result<ItemProgress> {
    let existing = store.get(key)?;
    let expected_version = existing.as_ref().map(|p| p.version);
    let prior_state = existing.as_ref().map(|p| &p.state);

    let state = sm2::apply_review(prior_state, quality, now)?;

    let mut progress = ItemProgress {
        key: key.clone(),
        level: level.or_else(|| existing.as_ref().and_then(|p| p.level)),
        state,
        version: expected_version.unwrap_or(0),
    };

    match store.put(progress.clone(), expected_version) {
        Ok(version) => {
            progress.version = version;
            debug!(%key, quality, interval = progress.state.interval, version, "review recorded");
            Ok(progress)
        }
        Err(err @ TutorError::Conflict { .. }) => {
            warn!(%key, "review lost a concurrent write");
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Progress of a user that is due at `now`, earliest due first.
pub fn due_items<S: ReviewStore + ?Sized>(
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ItemProgress>> {
    let mut due: Vec<ItemProgress> = store
        .list_for_user(user_id, None)?
        .into_iter()
        .filter(|p| p.state.is_due(now))
        .collect();
    due.sort_by(|a, b| {
        a.state
            .due_at
            .cmp(&b.state.due_at)
            .then_with(|| a.key.cmp(&b.key))
    });
    Ok(due)
}

/// Review totals over a user's items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub items: usize,
    pub due: usize,
    pub total_reviews: u64,
    pub correct_reviews: u64,
    pub lapses: u64,
    pub best_streak: u32,
}

impl ReviewStats {
    pub fn collect<S: ReviewStore + ?Sized>(
        store: &S,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let mut stats = ReviewStats::default();
        for progress in store.list_for_user(user_id, None)? {
            let state = &progress.state;
            stats.items += 1;
            if state.is_due(now) {
                stats.due += 1;
            }
            stats.total_reviews += state.total_reviews as u64;
            stats.correct_reviews += state.correct_reviews as u64;
            stats.lapses += state.lapses as u64;
            stats.best_streak = stats.best_streak.max(state.streak);
        }
        Ok(stats)
    }

    /// Whole-number accuracy percentage, `None` before any review.
    pub fn accuracy_percentage(&self) -> Option<u8> {
        if self.total_reviews == 0 {
            None
        } else {
            Some((self.correct_reviews as f64 * 100.0 / self.total_reviews as f64).round() as u8)
        }
    }
}
