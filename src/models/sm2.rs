//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! The scheduler maps a prior review state and a recall grade to the next state:
//! - Ease is kept in hundredths and adjusted after every review, never below 1.30
//! - Grades 0-2: interval resets to 0 and the streak is broken (a lapse)
//! - Grades 3-5: interval grows 0 → 1 day → 6 days → interval × ease, capped at
//!   [`MAX_INTERVAL_DAYS`]
//! - Counters for streak, lapses and accuracy are updated on every review

use super::review_state::{DEFAULT_EASE, MIN_EASE};
use super::{Quality, ReviewState};
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Longest interval the scheduler hands out: 100 years.
///
/// A perfect streak multiplies the interval by up to 4x per review, so without a cap
/// `due_at` leaves chrono's representable range after a couple dozen reviews.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Ease change for a grade, in hundredths.
///
/// Integer form of `round(100 * (0.1 - d * (0.08 + d * 0.02)))` with `d = 5 - quality`.
pub fn ease_delta(quality: Quality) -> i64 {
    let d = (Quality::MAX - quality.value()) as i64;
    10 - d * (8 + 2 * d)
}

/// Applies a review to the prior state (or a new item when `prior` is `None`).
///
/// `quality` must be an integer in 0..=5; anything else is rejected.
pub fn apply_review(
    prior: Option<&ReviewState>,
    quality: i64,
    now: DateTime<Utc>,
) -> Result<ReviewState> {
    let quality = Quality::new(quality)?;
    Ok(schedule(prior, quality, now))
}

/// Infallible scheduling step for an already validated grade.
pub fn schedule(prior: Option<&ReviewState>, quality: Quality, now: DateTime<Utc>) -> ReviewState {
    let (interval, ease, streak, lapses, total, correct) = match prior {
        Some(s) => (
            s.interval,
            s.ease,
            s.streak,
            s.lapses,
            s.total_reviews,
            s.correct_reviews,
        ),
        None => (0, DEFAULT_EASE, 0, 0, 0, 0),
    };

    let new_ease =
        (ease as i64 + ease_delta(quality)).clamp(MIN_EASE as i64, u32::MAX as i64) as u32;

    let passed = quality.is_pass();
    let new_interval = if !passed {
        0
    } else {
        match interval {
            0 => 1,
            1 => 6,
            // round half up, same as multiplying by ease / 100 and rounding
            _ => ((interval as u64 * new_ease as u64 + 50) / 100)
                .min(MAX_INTERVAL_DAYS as u64) as u32,
        }
    };

    debug!(
        quality = quality.value(),
        interval,
        new_interval,
        ease,
        new_ease,
        "applied review"
    );

    ReviewState {
        interval: new_interval,
        ease: new_ease,
        due_at: now
            .checked_add_signed(Duration::days(new_interval as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        last_review_at: now,
        streak: if passed { streak.saturating_add(1) } else { 0 },
        lapses: if passed { lapses } else { lapses.saturating_add(1) },
        total_reviews: total.saturating_add(1),
        correct_reviews: if passed { correct.saturating_add(1) } else { correct },
    }
}
