//! Vocabulary item shown on a card: a term, its translation and an optional level.
use crate::error::{Result, TutorError};
use crate::placement::CefrLevel;
use serde::{Deserialize, Serialize};

/// Longest term accepted for an A1 card, in characters.
pub const MAX_A1_TERM_CHARS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub word_id: String,
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CefrLevel>,
}

impl Flashcard {
    pub fn new(
        word_id: impl Into<String>,
        term: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            word_id: word_id.into(),
            term: term.into(),
            translation: translation.into(),
            level: None,
        }
    }

    pub fn with_level(mut self, level: CefrLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Content checks for a card before it is drilled:
    /// term and translation must differ (ignoring case and surrounding whitespace),
    /// neither may contain `<` or `>`, and an A1 term may be at most 20 characters.
    pub fn validate(&self) -> Result<()> {
        let term = self.term.trim();
        let translation = self.translation.trim();
        let mut reasons = Vec::new();

        if term.to_lowercase() == translation.to_lowercase() {
            reasons.push("term and translation must differ".to_string());
        }
        if [term, translation].iter().any(|s| s.contains(['<', '>'])) {
            reasons.push("contains forbidden characters (< or >)".to_string());
        }
        if self.level == Some(CefrLevel::A1) && term.chars().count() > MAX_A1_TERM_CHARS {
            reasons.push(format!(
                "A1 term is longer than {} characters",
                MAX_A1_TERM_CHARS
            ));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(TutorError::InvalidRecord(format!(
                "card {}: {}",
                self.word_id,
                reasons.join("; ")
            )))
        }
    }
}
