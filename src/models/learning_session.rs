//! Review session over a learner's due cards.
//! Handles multi-round practice; every grade goes through the SM-2 scheduler and the store.

use super::Flashcard;
use crate::error::{Result, TutorError};
use crate::store::{ItemProgress, ReviewKey, ReviewStore};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Cards that aren't recalled (grade < 3) are repeated in subsequent rounds.
pub struct ReviewSession<'a, S: ReviewStore + ?Sized> {
    pub user_id: String,
    pub all_cards: Vec<Flashcard>,
    /// Recalled in the latest grading, parallel to `all_cards`.
    learned: Vec<bool>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub round_number: usize,
    store: &'a S,
}

impl<'a, S: ReviewStore + ?Sized> ReviewSession<'a, S> {
    /// Fails with every card's problems when any card does not pass [`Flashcard::validate`].
    pub fn new(user_id: impl Into<String>, cards: Vec<Flashcard>, store: &'a S) -> Result<Self> {
        let problems: Vec<String> = cards
            .iter()
            .filter_map(|card| match card.validate() {
                Err(TutorError::InvalidRecord(reason)) => Some(reason),
                Err(other) => Some(other.to_string()),
                Ok(()) => None,
            })
            .collect();
        if !problems.is_empty() {
            return Err(TutorError::InvalidRecord(problems.join(" | ")));
        }

        let indices: Vec<usize> = (0..cards.len()).collect();
        Ok(Self {
            user_id: user_id.into(),
            learned: vec![false; cards.len()],
            all_cards: cards,
            current_round_cards: indices,
            current_index: 0,
            round_number: 1,
            store,
        })
    }

    /// Session over the cards of `deck` that are due at `now` or were never reviewed.
    pub fn new_from_due_cards(
        user_id: impl Into<String>,
        deck: &[Flashcard],
        store: &'a S,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let user_id = user_id.into();
        let reviewed: Vec<ItemProgress> = store.list_for_user(&user_id, None)?;
        let not_due: HashSet<&str> = reviewed
            .iter()
            .filter(|p| !p.state.is_due(now))
            .map(|p| p.key.item_id.as_str())
            .collect();

        let cards: Vec<Flashcard> = deck
            .iter()
            .filter(|card| !not_due.contains(card.word_id.as_str()))
            .cloned()
            .collect();

        debug!(user_id = %user_id, due = cards.len(), deck = deck.len(), "review session built");
        Self::new(user_id, cards, store)
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.all_cards.get(idx))
    }

    fn is_learned(&self, idx: usize) -> bool {
        self.learned.get(idx).copied().unwrap_or(false)
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards that were not recalled.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed_indices: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| idx < self.all_cards.len() && !self.is_learned(idx))
            .collect();

        if !failed_indices.is_empty() {
            self.current_round_cards = failed_indices;
            self.current_index = 0;
            self.round_number += 1;
        }
    }

    /// Grades the current card, stores the rescheduled state and returns it.
    /// Returns `Ok(None)` when there is no current card.
    pub fn grade_current_card(
        &mut self,
        quality: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ItemProgress>> {
        let Some(&idx) = self.current_round_cards.get(self.current_index) else {
            return Ok(None);
        };
        let Some(card) = self.all_cards.get(idx) else {
            return Ok(None);
        };

        let key = ReviewKey::new(self.user_id.clone(), card.word_id.clone());
        let progress = crate::store::record_review(self.store, &key, card.level, quality, now)?;

        if let Some(flag) = self.learned.get_mut(idx) {
            *flag = progress.state.streak > 0;
        }
        Ok(Some(progress))
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.is_learned(idx))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// Complete when the round is empty or every card in it was recalled.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}
