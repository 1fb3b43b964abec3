//! Fixed interview script. Transitions never depend on scores.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of question turns before the interview is done.
pub const TOTAL_TURNS: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Warmup,
    Describe,
    Opinion,
    ProblemSolution,
    Rephrase,
    Abstract,
    Challenge,
    Wrapup,
    Done,
}

impl Stage {
    /// Question stages in interview order.
    pub const SCRIPT: [Stage; TOTAL_TURNS as usize] = [
        Stage::Warmup,
        Stage::Describe,
        Stage::Opinion,
        Stage::ProblemSolution,
        Stage::Rephrase,
        Stage::Abstract,
        Stage::Challenge,
        Stage::Wrapup,
    ];

    pub fn next(self) -> Stage {
        match self {
            Stage::Warmup => Stage::Describe,
            Stage::Describe => Stage::Opinion,
            Stage::Opinion => Stage::ProblemSolution,
            Stage::ProblemSolution => Stage::Rephrase,
            Stage::Rephrase => Stage::Abstract,
            Stage::Abstract => Stage::Challenge,
            Stage::Challenge => Stage::Wrapup,
            Stage::Wrapup | Stage::Done => Stage::Done,
        }
    }

    /// Stage asked at a 1-based turn; anything past the last turn is `Done`.
    pub fn for_turn(turn: u8) -> Stage {
        match turn {
            1..=TOTAL_TURNS => Self::SCRIPT[turn as usize - 1],
            _ => Stage::Done,
        }
    }

    /// 1-based turn of a question stage, `None` for `Done`.
    pub fn turn(self) -> Option<u8> {
        Self::SCRIPT
            .iter()
            .position(|s| *s == self)
            .map(|idx| idx as u8 + 1)
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Warmup => "WARMUP",
            Stage::Describe => "DESCRIBE",
            Stage::Opinion => "OPINION",
            Stage::ProblemSolution => "PROBLEM_SOLUTION",
            Stage::Rephrase => "REPHRASE",
            Stage::Abstract => "ABSTRACT",
            Stage::Challenge => "CHALLENGE",
            Stage::Wrapup => "WRAPUP",
            Stage::Done => "DONE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
