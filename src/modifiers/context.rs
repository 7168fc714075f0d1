//! Inputs handed to every modifier invocation

use serde::{Deserialize, Serialize};

use crate::core::types::{RoundNumber, ThrowNumber};

/// When a modifier runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timing {
    /// Once per scoring die, as it settles
    PerDie,
    /// Once per throw, on the summed score after every die settled
    AfterThrow,
}

/// Throw-wide facts that don't change between modifier calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowInfo {
    pub throw_number: ThrowNumber,
    pub round_number: RoundNumber,
    /// Dice launched in this throw, money sides included
    pub total_dice: usize,
}

/// Per-invocation view of the score being transformed
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    /// Output of the previous modifier in this pass
    pub current_score: u32,
    /// Value before any modifier in this pass ran
    pub original_value: u32,
    /// Position of the die in the throw; `None` during the after-throw pass
    pub die_index: Option<usize>,
    /// Scoring values known at evaluation time
    pub values: &'a [u32],
    pub info: ThrowInfo,
}

/// Facts read by round-end hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: RoundNumber,
    pub score: u32,
    pub goal: u32,
    pub won: bool,
}

impl RoundSummary {
    /// Score beyond the goal, zero if the goal was missed
    pub fn surplus(&self) -> u32 {
        self.score.saturating_sub(self.goal)
    }
}
