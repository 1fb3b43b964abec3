//! Placement interview state and its transitions.
//!
//! A session walks the fixed eight-stage script. Each scored turn replaces the estimate with
//! that turn's level; there is no averaging across turns. `per_turn_levels` keeps the history
//! so callers can audit how the final level was reached.

use super::estimator::evaluate_turn;
use super::stage::{Stage, TOTAL_TURNS};
use super::{CefrLevel, DimensionScores};
use crate::error::{Result, TutorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementSession {
    pub session_id: Uuid,
    /// 1-based position in the script.
    pub turn: u8,
    pub estimate: CefrLevel,
    #[serde(default)]
    pub used_topics: Vec<String>,
    #[serde(default)]
    pub per_turn_scores: Vec<DimensionScores>,
    #[serde(default)]
    pub per_turn_levels: Vec<CefrLevel>,
}

/// Outcome of a finished interview.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completed {
    pub session_id: Uuid,
    pub final_level: CefrLevel,
    pub per_turn_scores: Vec<DimensionScores>,
    pub per_turn_levels: Vec<CefrLevel>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Next(PlacementSession),
    Completed(Completed),
}

/// Stored profile entry for a finished placement test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub session_id: Uuid,
    pub level: CefrLevel,
    /// Confidence as a 0..=100 percentage.
    pub placement_score: u8,
    pub placement_mode: String,
    pub placement_source: String,
    pub taken_at: DateTime<Utc>,
}

impl PlacementSession {
    /// New session at WARMUP with the B1 prior.
    pub fn start() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(session_id: Uuid) -> Self {
        debug!(%session_id, "placement session started");
        Self {
            session_id,
            turn: 1,
            estimate: CefrLevel::PRIOR,
            used_topics: Vec::new(),
            per_turn_scores: Vec::new(),
            per_turn_levels: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        Stage::for_turn(self.turn)
    }

    /// True once every question turn has been scored.
    pub fn is_scored_out(&self) -> bool {
        self.per_turn_scores.len() >= TOTAL_TURNS as usize
    }

    /// Moves to the next stage, or completes after WRAPUP.
    ///
    /// Calling this on the last turn always yields `Completed`, however often it is repeated.
    pub fn advance(self) -> Advance {
        let next = self.stage().next();
        if next.is_terminal() {
            return Advance::Completed(self.into_completed());
        }
        debug!(session_id = %self.session_id, from = %self.stage(), to = %next, "placement advanced");
        Advance::Next(Self {
            turn: self.turn + 1,
            ..self
        })
    }

    /// Records the current turn's scores, updates the estimate and advances.
    ///
    /// A session whose turns are all scored is returned as `Completed` without scoring again.
    pub fn submit_turn(mut self, scores: DimensionScores) -> Advance {
        if self.is_scored_out() {
            return Advance::Completed(self.into_completed());
        }

        let (weighted, level) = evaluate_turn(&scores);
        debug!(
            session_id = %self.session_id,
            turn = self.turn,
            stage = %self.stage(),
            weighted,
            level = %level,
            "placement turn scored"
        );
        self.per_turn_scores.push(scores);
        self.per_turn_levels.push(level);
        self.estimate = level;
        self.advance()
    }

    /// Remembers a topic so follow-up questions avoid it.
    pub fn record_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if !self.used_topics.contains(&topic) {
            self.used_topics.push(topic);
        }
    }

    /// Checks invariants of a session read back from storage.
    pub fn validate(&self) -> Result<()> {
        if !(1..=TOTAL_TURNS).contains(&self.turn) {
            return Err(TutorError::InvalidRecord(format!(
                "session {} has turn {} outside 1..={}",
                self.session_id, self.turn, TOTAL_TURNS
            )));
        }
        if self.per_turn_scores.len() != self.per_turn_levels.len()
            || self.per_turn_scores.len() > self.turn as usize
        {
            return Err(TutorError::InvalidRecord(format!(
                "session {} has {} scored turns at turn {}",
                self.session_id,
                self.per_turn_scores.len(),
                self.turn
            )));
        }
        for (i, scores) in self.per_turn_scores.iter().enumerate() {
            let reasons = scores.range_errors();
            if !reasons.is_empty() {
                return Err(TutorError::InvalidRecord(format!(
                    "session {} turn {} scores out of range: {}",
                    self.session_id,
                    i + 1,
                    reasons.join("; ")
                )));
            }
        }
        Ok(())
    }

    fn into_completed(self) -> Completed {
        info!(
            session_id = %self.session_id,
            level = %self.estimate,
            turns = self.per_turn_scores.len(),
            "placement completed"
        );
        Completed {
            session_id: self.session_id,
            final_level: self.estimate,
            per_turn_scores: self.per_turn_scores,
            per_turn_levels: self.per_turn_levels,
        }
    }
}

impl Advance {
    /// Advancing a completed interview returns it unchanged.
    pub fn advance(self) -> Advance {
        match self {
            Advance::Next(session) => session.advance(),
            done @ Advance::Completed(_) => done,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Advance::Completed(_))
    }

    pub fn session(&self) -> Option<&PlacementSession> {
        match self {
            Advance::Next(session) => Some(session),
            Advance::Completed(_) => None,
        }
    }

    pub fn completed(&self) -> Option<&Completed> {
        match self {
            Advance::Next(_) => None,
            Advance::Completed(done) => Some(done),
        }
    }
}

impl Completed {
    /// Builds the profile entry; `confidence` must lie in 0.0..=1.0.
    pub fn finalize(&self, confidence: f64, now: DateTime<Utc>) -> Result<PlacementResult> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(TutorError::InvalidConfidence(confidence));
        }
        Ok(PlacementResult {
            session_id: self.session_id,
            level: self.final_level,
            placement_score: (confidence * 100.0).round() as u8,
            placement_mode: "adaptive".to_string(),
            placement_source: "ai".to_string(),
            taken_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scores(c: u8, t: u8, g: u8, l: u8, f: u8) -> DimensionScores {
        DimensionScores::new(c, t, g, l, f).unwrap()
    }

    fn run_turns(turns: &[DimensionScores]) -> Advance {
        let mut step = Advance::Next(PlacementSession::start());
        for s in turns {
            step = match step {
                Advance::Next(session) => session.submit_turn(*s),
                done => done,
            };
        }
        step
    }

    #[test]
    fn test_start_defaults() {
        let session = PlacementSession::start();
        assert_eq!(session.turn, 1);
        assert_eq!(session.stage(), Stage::Warmup);
        assert_eq!(session.estimate, CefrLevel::B1);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        let mut session = PlacementSession::start();
        session.turn = 2;
        session.per_turn_scores.push(DimensionScores {
            comprehension: 3,
            task_response: 3,
            grammar_accuracy: 9,
            lexical_range: 3,
            fluency_coherence: 3,
        });
        session.per_turn_levels.push(CefrLevel::B1);
        assert!(matches!(
            session.validate(),
            Err(TutorError::InvalidRecord(msg)) if msg.contains("grammar_accuracy")
        ));
    }

    #[test]
    fn test_advance_steps_one_turn_at_a_time() {
        let mut session = PlacementSession::start();
        for expected in 2..=8u8 {
            session = match session.advance() {
                Advance::Next(next) => next,
                Advance::Completed(_) => panic!("completed early at turn {}", expected),
            };
            assert_eq!(session.turn, expected);
        }
        assert_eq!(session.stage(), Stage::Wrapup);
        assert!(session.advance().is_completed());
    }

    #[test]
    fn test_completed_advance_is_idempotent() {
        let mut session = PlacementSession::start();
        session.turn = 8;
        session.estimate = CefrLevel::B2;

        let first = session.clone().advance();
        let second = session.advance();
        assert_eq!(first, second);

        let again = first.clone().advance();
        assert_eq!(again, first);
        assert_eq!(again.completed().unwrap().final_level, CefrLevel::B2);
    }

    #[test]
    fn test_eight_turns_at_25_stay_b2() {
        // 5 + 4 + 2*4 + 2*4 + 0 = 25
        let turn = scores(5, 4, 4, 4, 0);
        let mut step = Advance::Next(PlacementSession::start());
        let mut levels = Vec::new();
        while let Advance::Next(session) = step {
            step = session.submit_turn(turn);
            let level = match &step {
                Advance::Next(s) => s.estimate,
                Advance::Completed(done) => done.final_level,
            };
            levels.push(level);
        }
        assert_eq!(levels, vec![CefrLevel::B2; 8]);
        let done = step.completed().unwrap();
        assert_eq!(done.per_turn_scores.len(), 8);
        assert_eq!(done.per_turn_levels, vec![CefrLevel::B2; 8]);
    }

    #[test]
    fn test_estimate_follows_latest_turn_only() {
        let strong = scores(5, 5, 5, 5, 5);
        let weak = scores(1, 1, 1, 1, 1);
        let step = run_turns(&[strong, strong, strong, weak]);
        let session = step.session().unwrap();
        assert_eq!(session.turn, 5);
        assert_eq!(session.estimate, CefrLevel::A1);
        assert_eq!(
            session.per_turn_levels,
            vec![CefrLevel::C2, CefrLevel::C2, CefrLevel::C2, CefrLevel::A1]
        );
    }

    #[test]
    fn test_submit_after_completion_does_not_rescore() {
        let turn = scores(4, 4, 4, 4, 4);
        let done = match run_turns(&[turn; 8]) {
            Advance::Completed(done) => done,
            Advance::Next(_) => panic!("expected completion"),
        };

        let stored = PlacementSession {
            session_id: done.session_id,
            turn: 8,
            estimate: done.final_level,
            used_topics: Vec::new(),
            per_turn_scores: done.per_turn_scores.clone(),
            per_turn_levels: done.per_turn_levels.clone(),
        };
        let retried = stored.submit_turn(scores(0, 0, 0, 0, 0));
        assert_eq!(retried, Advance::Completed(done));
    }

    #[test]
    fn test_record_topic_deduplicates() {
        let mut session = PlacementSession::start();
        session.record_topic("travel");
        session.record_topic("food");
        session.record_topic("travel");
        assert_eq!(session.used_topics, vec!["travel", "food"]);
    }

    #[test]
    fn test_validate_rejects_bad_turn() {
        let mut session = PlacementSession::start();
        session.turn = 9;
        assert!(session.validate().is_err());
        session.turn = 0;
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_finalize() {
        let done = run_turns(&[scores(5, 5, 5, 5, 5); 8]);
        let done = done.completed().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        let result = done.finalize(0.8, now).unwrap();
        assert_eq!(result.level, CefrLevel::C2);
        assert_eq!(result.placement_score, 80);
        assert_eq!(result.placement_mode, "adaptive");
        assert_eq!(result.taken_at, now);

        assert!(matches!(
            done.finalize(1.5, now),
            Err(TutorError::InvalidConfidence(_))
        ));
        assert!(done.finalize(f64::NAN, now).is_err());
    }

    #[test]
    fn test_session_round_trips_persisted_shape() {
        let mut session = PlacementSession::start();
        session.record_topic("work");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["turn"], 1);
        assert_eq!(json["estimate"], 3);
        assert_eq!(json["used_topics"], serde_json::json!(["work"]));
        let back: PlacementSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
