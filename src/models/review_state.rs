//! Scheduling record kept per learner and vocabulary item.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ease assigned to an item that has never been reviewed (2.50).
pub const DEFAULT_EASE: u32 = 250;
/// Ease never drops below 1.30.
pub const MIN_EASE: u32 = 130;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Days until the next review; 0 means unscheduled or just failed.
    pub interval: u32,
    /// Ease factor in hundredths.
    pub ease: u32,
    pub due_at: DateTime<Utc>,
    pub last_review_at: DateTime<Utc>,
    pub streak: u32,
    pub lapses: u32,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub correct_reviews: u32,
}

impl ReviewState {
    /// Fresh state for an item that has never been reviewed, due immediately.
    pub fn new_item(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            ease: DEFAULT_EASE,
            due_at: now,
            last_review_at: now,
            streak: 0,
            lapses: 0,
            total_reviews: 0,
            correct_reviews: 0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at
    }

    /// Share of successful reviews, `None` before the first one.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_reviews == 0 {
            None
        } else {
            Some(self.correct_reviews as f64 / self.total_reviews as f64)
        }
    }

    /// Checks the invariants every stored state must satisfy.
    pub fn is_consistent(&self) -> bool {
        self.last_review_at <= self.due_at
            && self.ease >= MIN_EASE
            && self.correct_reviews <= self.total_reviews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_item_defaults() {
        let state = ReviewState::new_item(at(1));
        assert_eq!(state.interval, 0);
        assert_eq!(state.ease, 250);
        assert_eq!(state.accuracy(), None);
        assert!(state.is_due(at(1)));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_is_due_boundary() {
        let mut state = ReviewState::new_item(at(1));
        state.due_at = at(1) + Duration::days(6);
        assert!(!state.is_due(at(6)));
        assert!(state.is_due(at(7)));
    }

    #[test]
    fn test_inconsistent_when_review_after_due() {
        let mut state = ReviewState::new_item(at(5));
        state.due_at = at(4);
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_serializes_timestamps_as_iso_strings() {
        let state = ReviewState::new_item(at(1));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["due_at"], "2025-03-01T09:00:00Z");
        assert_eq!(json["ease"], 250);
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let json = r#"{
            "interval": 6,
            "ease": 250,
            "due_at": "2025-03-07T09:00:00Z",
            "last_review_at": "2025-03-01T09:00:00Z",
            "streak": 2,
            "lapses": 0
        }"#;
        let state: ReviewState = serde_json::from_str(json).unwrap();
        assert_eq!(state.total_reviews, 0);
        assert_eq!(state.accuracy(), None);
    }
}
