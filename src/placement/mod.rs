//! Adaptive CEFR placement interview.
//!
//! Eight scripted question turns. Every answer is scored on five dimensions by an external
//! evaluator; this module validates those scores, weights them, maps the total to a level
//! and moves the interview through its fixed stages.

pub mod cefr;
pub mod estimator;
pub mod scores;
pub mod session;
pub mod stage;
pub mod topics;

pub use cefr::CefrLevel;
pub use estimator::{estimate_level, evaluate_turn, score_turn};
pub use scores::{DimensionScores, ScoreValidation, TurnEvaluation};
pub use session::{Advance, Completed, PlacementResult, PlacementSession};
pub use stage::{Stage, TOTAL_TURNS};
pub use topics::{DEFAULT_TOPICS, TopicChoice, next_topic};
