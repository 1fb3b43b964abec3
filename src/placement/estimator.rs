//! Weighted scoring and CEFR level thresholds for a single interview turn.

use super::{CefrLevel, DimensionScores};

/// Highest possible weighted score: 5*1 + 5*1 + 5*2 + 5*2 + 5*1.
pub const MAX_WEIGHTED_SCORE: u8 = 35;

/// Below this, grammar or lexical range costs one level regardless of the total.
pub const GATING_SCORE: u8 = 3;

/// Inclusive lower bounds of the weighted score, highest level first.
const THRESHOLDS: [(u8, CefrLevel); 5] = [
    (29, CefrLevel::C2),
    (26, CefrLevel::C1),
    (22, CefrLevel::B2),
    (18, CefrLevel::B1),
    (12, CefrLevel::A2),
];

/// Grammar and lexical range count double. Saturates instead of wrapping on scores that
/// skipped validation.
pub fn score_turn(scores: &DimensionScores) -> u8 {
    scores
        .comprehension
        .saturating_add(scores.task_response)
        .saturating_add(scores.grammar_accuracy.saturating_mul(2))
        .saturating_add(scores.lexical_range.saturating_mul(2))
        .saturating_add(scores.fluency_coherence)
}

/// Level for one turn. Uses only this turn's scores; earlier turns are not averaged in.
pub fn estimate_level(weighted_score: u8, grammar: u8, lexical: u8) -> CefrLevel {
    let level = THRESHOLDS
        .iter()
        .find(|(min, _)| weighted_score >= *min)
        .map(|(_, level)| *level)
        .unwrap_or(CefrLevel::A1);

    if grammar < GATING_SCORE || lexical < GATING_SCORE {
        level.lower()
    } else {
        level
    }
}

/// Weighted score and level of a turn in one step.
pub fn evaluate_turn(scores: &DimensionScores) -> (u8, CefrLevel) {
    let weighted = score_turn(scores);
    (
        weighted,
        estimate_level(weighted, scores.grammar_accuracy, scores.lexical_range),
    )
}
