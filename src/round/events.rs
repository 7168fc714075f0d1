//! Typed round-lifecycle messages
//!
//! Operations push events into an `EventLog` the caller owns. Hosts drain
//! it to drive presentation; nothing in the engine reads it back.

use serde::Serialize;

use crate::core::types::{DieId, RoundNumber, ThrowNumber};

/// Scoring-phase decision after a throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    GoalReached,
    OutOfThrows,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoundEvent {
    RoundStarted {
        round_number: RoundNumber,
        goal: u32,
        max_throws: u32,
    },
    HandDrawn {
        count: usize,
    },
    DiceDiscarded {
        count: usize,
        discards_remaining: u32,
    },
    ThrowStarted {
        throw_number: ThrowNumber,
        dice: usize,
    },
    DieScored {
        die: DieId,
        die_index: usize,
        raw_value: u32,
        score: u32,
    },
    CurrencyEarned {
        die: DieId,
        amount: u32,
    },
    ThrowFinalized {
        throw_number: ThrowNumber,
        raw_total: u32,
        score: u32,
    },
    ScoringVerdict {
        throw_number: ThrowNumber,
        round_score: u32,
        goal: u32,
        verdict: Verdict,
    },
    RoundEnded {
        round_number: RoundNumber,
        won: bool,
        score: u32,
        throws_remaining: u32,
    },
    CurrencyAwarded {
        source: String,
        amount: u32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RoundEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of events matching a predicate
    pub fn count(&self, pred: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
