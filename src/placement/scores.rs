//! Per-turn dimension scores and validation of raw evaluation payloads.
//!
//! Scores come from an external evaluator as loosely-typed JSON. They are checked here,
//! once, against the fixed five-dimension shape; the estimator assumes valid input.

use super::CefrLevel;
use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const MAX_DIMENSION_SCORE: u8 = 5;

/// Dimension names as they appear in evaluation payloads.
pub const DIMENSIONS: [&str; 5] = [
    "comprehension",
    "task_response",
    "grammar_accuracy",
    "lexical_range",
    "fluency_coherence",
];

/// Five dimension scores, each 0..=5. Deserialization goes through [`DimensionScores::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScores")]
pub struct DimensionScores {
    pub comprehension: u8,
    pub task_response: u8,
    pub grammar_accuracy: u8,
    pub lexical_range: u8,
    pub fluency_coherence: u8,
}

/// Wire shape before the range check.
#[derive(Deserialize)]
struct RawScores {
    comprehension: u8,
    task_response: u8,
    grammar_accuracy: u8,
    lexical_range: u8,
    fluency_coherence: u8,
}

impl TryFrom<RawScores> for DimensionScores {
    type Error = TutorError;

    fn try_from(raw: RawScores) -> Result<Self> {
        DimensionScores::new(
            raw.comprehension,
            raw.task_response,
            raw.grammar_accuracy,
            raw.lexical_range,
            raw.fluency_coherence,
        )
    }
}

/// A validated evaluation of one answer.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnEvaluation {
    pub scores: DimensionScores,
    pub cefr_guess: Option<CefrLevel>,
    pub feedback: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScoreValidation {
    Valid(TurnEvaluation),
    Rejected { reasons: Vec<String>, payload: Value },
}

impl ScoreValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, ScoreValidation::Valid(_))
    }

    pub fn into_result(self) -> Result<TurnEvaluation> {
        match self {
            ScoreValidation::Valid(evaluation) => Ok(evaluation),
            ScoreValidation::Rejected { reasons, .. } => Err(TutorError::InvalidScores(reasons)),
        }
    }
}

impl DimensionScores {
    /// Builds scores from plain values, rejecting any above 5.
    pub fn new(
        comprehension: u8,
        task_response: u8,
        grammar_accuracy: u8,
        lexical_range: u8,
        fluency_coherence: u8,
    ) -> Result<Self> {
        let scores = Self {
            comprehension,
            task_response,
            grammar_accuracy,
            lexical_range,
            fluency_coherence,
        };
        let reasons = scores.range_errors();
        if reasons.is_empty() {
            Ok(scores)
        } else {
            Err(TutorError::InvalidScores(reasons))
        }
    }

    /// Reasons why any value is out of range, empty when all are in 0..=5.
    pub fn range_errors(&self) -> Vec<String> {
        DIMENSIONS
            .iter()
            .zip(self.values())
            .filter(|(_, v)| *v > MAX_DIMENSION_SCORE)
            .map(|(name, v)| format!("{} must be in 0..=5, got {}", name, v))
            .collect()
    }

    /// Values in `DIMENSIONS` order.
    pub fn values(&self) -> [u8; 5] {
        [
            self.comprehension,
            self.task_response,
            self.grammar_accuracy,
            self.lexical_range,
            self.fluency_coherence,
        ]
    }

    /// Checks a raw evaluator payload. Numbers are never coerced: floats, strings,
    /// negatives and values above 5 all reject the whole payload.
    pub fn validate(payload: &Value) -> ScoreValidation {
        let Some(obj) = payload.as_object() else {
            return reject(vec!["payload must be a JSON object".to_string()], payload);
        };

        let mut reasons = Vec::new();
        let mut values = [0u8; 5];
        for (slot, name) in values.iter_mut().zip(DIMENSIONS) {
            match obj.get(name) {
                None | Some(Value::Null) => reasons.push(format!("{} is missing", name)),
                Some(v) => match v.as_u64() {
                    Some(n) if n <= MAX_DIMENSION_SCORE as u64 => *slot = n as u8,
                    _ => reasons.push(format!("{} must be an integer in 0..=5, got {}", name, v)),
                },
            }
        }

        let cefr_guess = match obj.get("cefr_guess") {
            None | Some(Value::Null) => None,
            Some(Value::String(label)) => match label.parse::<CefrLevel>() {
                Ok(level) => Some(level),
                Err(_) => {
                    reasons.push(format!("cefr_guess '{}' is not a CEFR level", label));
                    None
                }
            },
            Some(other) => {
                reasons.push(format!("cefr_guess must be a string, got {}", other));
                None
            }
        };

        let feedback = match obj.get("feedback") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                reasons.push(format!("feedback must be a string, got {}", other));
                None
            }
        };

        if !reasons.is_empty() {
            return reject(reasons, payload);
        }

        let [comprehension, task_response, grammar_accuracy, lexical_range, fluency_coherence] =
            values;
        ScoreValidation::Valid(TurnEvaluation {
            scores: DimensionScores {
                comprehension,
                task_response,
                grammar_accuracy,
                lexical_range,
                fluency_coherence,
            },
            cefr_guess,
            feedback,
        })
    }
}

fn reject(reasons: Vec<String>, payload: &Value) -> ScoreValidation {
    warn!(reasons = ?reasons, "rejected evaluation payload");
    ScoreValidation::Rejected {
        reasons,
        payload: payload.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let payload = json!({
            "comprehension": 4,
            "task_response": 3,
            "grammar_accuracy": 5,
            "lexical_range": 2,
            "fluency_coherence": 0,
            "cefr_guess": "B1",
            "feedback": "Good answer"
        });
        let evaluation = DimensionScores::validate(&payload).into_result().unwrap();
        assert_eq!(evaluation.scores.values(), [4, 3, 5, 2, 0]);
        assert_eq!(evaluation.cefr_guess, Some(CefrLevel::B1));
        assert_eq!(evaluation.feedback.as_deref(), Some("Good answer"));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let payload = json!({
            "comprehension": 1,
            "task_response": 1,
            "grammar_accuracy": 1,
            "lexical_range": 1,
            "fluency_coherence": 1
        });
        let evaluation = DimensionScores::validate(&payload).into_result().unwrap();
        assert_eq!(evaluation.cefr_guess, None);
        assert_eq!(evaluation.feedback, None);
    }

    #[test]
    fn test_rejects_without_coercion() {
        let payload = json!({
            "comprehension": 3.5,
            "task_response": "4",
            "grammar_accuracy": -1,
            "lexical_range": 6
        });
        match DimensionScores::validate(&payload) {
            ScoreValidation::Rejected { reasons, payload: kept } => {
                assert_eq!(reasons.len(), 5);
                assert_eq!(kept, payload);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_object() {
        let validation = DimensionScores::validate(&json!([1, 2, 3]));
        assert!(!validation.is_valid());
        assert!(matches!(
            validation.into_result(),
            Err(TutorError::InvalidScores(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_cefr_guess() {
        let payload = json!({
            "comprehension": 1,
            "task_response": 1,
            "grammar_accuracy": 1,
            "lexical_range": 1,
            "fluency_coherence": 1,
            "cefr_guess": "Z9"
        });
        assert!(!DimensionScores::validate(&payload).is_valid());
    }

    #[test]
    fn test_new_rejects_above_five() {
        assert!(DimensionScores::new(5, 5, 5, 5, 5).is_ok());
        assert!(matches!(
            DimensionScores::new(5, 5, 6, 5, 5),
            Err(TutorError::InvalidScores(reasons)) if reasons.len() == 1
        ));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: DimensionScores = serde_json::from_value(json!({
            "comprehension": 5,
            "task_response": 4,
            "grammar_accuracy": 3,
            "lexical_range": 2,
            "fluency_coherence": 1
        }))
        .unwrap();
        assert_eq!(ok.values(), [5, 4, 3, 2, 1]);

        let err = serde_json::from_value::<DimensionScores>(json!({
            "comprehension": 200,
            "task_response": 4,
            "grammar_accuracy": 3,
            "lexical_range": 2,
            "fluency_coherence": 1
        }))
        .unwrap_err();
        assert!(err.to_string().contains("comprehension must be in 0..=5"));
    }

    #[test]
    fn test_range_errors_on_hand_built_scores() {
        let scores = DimensionScores {
            comprehension: 9,
            task_response: 1,
            grammar_accuracy: 1,
            lexical_range: 6,
            fluency_coherence: 1,
        };
        assert_eq!(scores.range_errors().len(), 2);
    }
}
