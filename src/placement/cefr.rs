//! CEFR proficiency levels, integer-coded 1 (A1) to 6 (C2).
use crate::error::TutorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CefrLevel {
    A1 = 1,
    A2 = 2,
    B1 = 3,
    B2 = 4,
    C1 = 5,
    C2 = 6,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Prior estimate before the first placement turn.
    pub const PRIOR: CefrLevel = CefrLevel::B1;

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=6 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    /// Nearest level to a continuous estimate, clamped into A1..=C2.
    pub fn from_estimate(estimate: f64) -> Self {
        let rounded = if estimate.is_nan() {
            Self::PRIOR.code() as f64
        } else {
            estimate.round().clamp(1.0, 6.0)
        };
        Self::ALL[rounded as usize - 1]
    }

    /// One level down, stopping at A1.
    pub fn lower(self) -> Self {
        Self::from_code(self.code().saturating_sub(1)).unwrap_or(CefrLevel::A1)
    }

    pub fn label(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CefrLevel::A1 => "You understand basic phrases and can introduce yourself.",
            CefrLevel::A2 => "You can communicate in simple tasks and describe your background.",
            CefrLevel::B1 => {
                "You can express opinions on familiar topics and handle most situations."
            }
            CefrLevel::B2 => "You can express yourself clearly and handle abstract discussions.",
            CefrLevel::C1 => {
                "You can use language flexibly for social, academic, and professional purposes."
            }
            CefrLevel::C2 => {
                "You can express yourself spontaneously and precisely in complex situations."
            }
        }
    }

    /// Study advice shown alongside a placement result.
    pub fn next_step(self) -> &'static str {
        match self {
            CefrLevel::A1 | CefrLevel::A2 | CefrLevel::B1 => {
                "Next step: practice grammar and expand your vocabulary."
            }
            CefrLevel::B2 => "Next step: practice complex grammar and idioms to reach C1.",
            CefrLevel::C1 | CefrLevel::C2 => {
                "Continue practicing to maintain and enhance your fluency."
            }
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CefrLevel {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TutorError::InvalidRecord(format!("unknown CEFR level '{}'", s)))
    }
}

impl TryFrom<u8> for CefrLevel {
    type Error = TutorError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
            .ok_or_else(|| TutorError::InvalidRecord(format!("CEFR code {} outside 1..=6", code)))
    }
}

impl From<CefrLevel> for u8 {
    fn from(level: CefrLevel) -> u8 {
        level.code()
    }
}
