//! Round phase state machine
//!
//! ```text
//! HandSetup --confirm_throw--> Throwing --last die settles--> Scoring
//!     ^                                                          |
//!     +------------------- acknowledge (Continue) ---------------+
//!                          acknowledge (GoalReached) -> Ended(Won)
//!                          acknowledge (OutOfThrows) -> Ended(Lost)
//! ```
//!
//! Each transition is a method call; the machine suspends between calls
//! waiting on the host (confirm, settle signals, acknowledge).

use rand::Rng;
use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{DieId, RoundNumber};
use crate::dice::pool::DicePool;
use crate::modifiers::engine::ModifierEngine;
use crate::physics::{DieSettled, PhysicsSubstrate};
use crate::round::aggregator::{DiceResolutionAggregator, ThrowResult};
use crate::round::events::{EventLog, RoundEvent, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundOutcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    HandSetup,
    Throwing,
    Scoring(Verdict),
    Ended(RoundOutcome),
}

impl RoundPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HandSetup => "HandSetup",
            Self::Throwing => "Throwing",
            Self::Scoring(_) => "Scoring",
            Self::Ended(_) => "Ended",
        }
    }
}

/// Limits that shape a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRules {
    pub max_throws: u32,
    pub discards_per_round: u32,
    pub max_discard_count: usize,
}

impl From<&GameConfig> for RoundRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            max_throws: config.max_throws,
            discards_per_round: config.discards_per_round,
            max_discard_count: config.max_discard_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundState {
    pub round_number: RoundNumber,
    pub phase: RoundPhase,
    /// Throws taken so far
    pub throw_index: u32,
    pub discards_remaining: u32,
    pub score: u32,
    pub goal: u32,
}

/// Result of a discard request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardResult {
    Discarded { count: usize, redrawn: usize },
    /// Discard budget already spent; nothing happened
    Unavailable,
}

/// What acknowledging a scoring result led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    NextThrow,
    Ended(RoundReport),
}

/// Reported to the progression layer when a round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub round_number: RoundNumber,
    pub won: bool,
    pub score: u32,
    pub goal: u32,
    pub throws_remaining: u32,
}

#[derive(Debug)]
pub struct RoundStateMachine {
    rules: RoundRules,
    state: RoundState,
    aggregator: DiceResolutionAggregator,
    last_throw: Option<ThrowResult>,
}

impl RoundStateMachine {
    /// Begin a round: fill the hand and wait in HandSetup
    pub fn start(
        round_number: RoundNumber,
        goal: u32,
        rules: RoundRules,
        pool: &mut DicePool,
        rng: &mut impl Rng,
        events: &mut EventLog,
    ) -> Self {
        events.push(RoundEvent::RoundStarted {
            round_number,
            goal,
            max_throws: rules.max_throws,
        });
        let count = pool.draw_to_full(rng);
        events.push(RoundEvent::HandDrawn { count });
        tracing::info!("Round {} started, goal {}", round_number, goal);

        Self {
            rules,
            state: RoundState {
                round_number,
                phase: RoundPhase::HandSetup,
                throw_index: 0,
                discards_remaining: rules.discards_per_round,
                score: 0,
                goal,
            },
            aggregator: DiceResolutionAggregator::new(),
            last_throw: None,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    pub fn last_throw(&self) -> Option<&ThrowResult> {
        self.last_throw.as_ref()
    }

    pub fn throws_remaining(&self) -> u32 {
        self.rules.max_throws.saturating_sub(self.state.throw_index)
    }

    /// Dice the current throw is still waiting on
    pub fn dice_in_flight(&self) -> usize {
        self.aggregator.remaining()
    }

    pub fn can_discard(&self) -> bool {
        self.state.phase == RoundPhase::HandSetup && self.state.discards_remaining > 0
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state.phase, RoundPhase::Ended(_))
    }

    fn expect_phase(&self, expected: &'static str) -> Result<()> {
        if self.state.phase.name() != expected {
            return Err(GameError::WrongPhase {
                expected,
                actual: self.state.phase.name(),
            });
        }
        Ok(())
    }

    /// Set hand dice aside for the rest of the round and refill
    pub fn discard(
        &mut self,
        indices: &[usize],
        pool: &mut DicePool,
        rng: &mut impl Rng,
        events: &mut EventLog,
    ) -> Result<DiscardResult> {
        self.expect_phase("HandSetup")?;
        if self.state.discards_remaining == 0 {
            return Ok(DiscardResult::Unavailable);
        }
        if indices.is_empty() || indices.len() > self.rules.max_discard_count {
            return Err(GameError::InvalidSelection(format!(
                "discard takes 1-{} dice, {} selected",
                self.rules.max_discard_count,
                indices.len()
            )));
        }

        let inventory_before = pool.inventory().len();
        let count = pool.discard_for_round(indices, rng)?;
        let redrawn = inventory_before - pool.inventory().len();
        self.state.discards_remaining -= 1;

        events.push(RoundEvent::DiceDiscarded {
            count,
            discards_remaining: self.state.discards_remaining,
        });
        tracing::debug!(
            "Discarded {} dice, redrew {}, {} discards left",
            count,
            redrawn,
            self.state.discards_remaining
        );
        Ok(DiscardResult::Discarded { count, redrawn })
    }

    /// Throw the selected hand dice
    ///
    /// An empty selection is only accepted when the hand itself is empty,
    /// which produces a zero-score throw. Returns the throw result if it
    /// finalized immediately.
    pub fn confirm_throw(
        &mut self,
        indices: &[usize],
        pool: &mut DicePool,
        table: &mut dyn PhysicsSubstrate,
        events: &mut EventLog,
    ) -> Result<Option<ThrowResult>> {
        self.expect_phase("HandSetup")?;
        if indices.is_empty() && !pool.hand().is_empty() {
            return Err(GameError::InvalidSelection(
                "select at least one die to throw".into(),
            ));
        }

        let thrown = pool.extract(indices)?;
        let ids: Vec<DieId> = thrown.iter().map(|d| d.id).collect();

        self.state.throw_index += 1;
        self.state.phase = RoundPhase::Throwing;
        events.push(RoundEvent::ThrowStarted {
            throw_number: self.state.throw_index,
            dice: ids.len(),
        });

        let immediate = self.aggregator.begin_throw(
            self.state.throw_index,
            self.state.round_number,
            &ids,
            events,
        );
        if let Some(result) = immediate {
            self.complete_throw(result.clone(), events);
            return Ok(Some(result));
        }

        table.launch(&thrown);
        Ok(None)
    }

    /// Feed one settle signal from the physics layer
    pub fn on_die_settled(
        &mut self,
        signal: DieSettled,
        modifiers: &ModifierEngine,
        events: &mut EventLog,
    ) -> Result<Option<ThrowResult>> {
        self.expect_phase("Throwing")?;
        let finalized = self.aggregator.on_die_settled(signal, modifiers, events)?;
        if let Some(result) = &finalized {
            self.complete_throw(result.clone(), events);
        }
        Ok(finalized)
    }

    /// Stop waiting for a die lost mid-roll
    pub fn unregister_die(
        &mut self,
        die: DieId,
        modifiers: &ModifierEngine,
        events: &mut EventLog,
    ) -> Result<Option<ThrowResult>> {
        self.expect_phase("Throwing")?;
        let finalized = self.aggregator.unregister_die(die, modifiers, events)?;
        if let Some(result) = &finalized {
            self.complete_throw(result.clone(), events);
        }
        Ok(finalized)
    }

    fn complete_throw(&mut self, result: ThrowResult, events: &mut EventLog) {
        self.state.score = self.state.score.saturating_add(result.score);
        let verdict = self.evaluate();
        self.state.phase = RoundPhase::Scoring(verdict);

        events.push(RoundEvent::ScoringVerdict {
            throw_number: result.throw_number,
            round_score: self.state.score,
            goal: self.state.goal,
            verdict,
        });
        tracing::info!(
            "Throw {} scored {} (round {}/{}): {:?}",
            result.throw_number,
            result.score,
            self.state.score,
            self.state.goal,
            verdict
        );
        self.last_throw = Some(result);
    }

    /// Goal first, then throw budget
    fn evaluate(&self) -> Verdict {
        if self.state.score >= self.state.goal {
            Verdict::GoalReached
        } else if self.state.throw_index >= self.rules.max_throws {
            Verdict::OutOfThrows
        } else {
            Verdict::Continue
        }
    }

    /// Host has shown the scoring result; move on
    pub fn acknowledge(
        &mut self,
        pool: &mut DicePool,
        rng: &mut impl Rng,
        events: &mut EventLog,
    ) -> Result<RoundStep> {
        let RoundPhase::Scoring(verdict) = self.state.phase else {
            return Err(GameError::WrongPhase {
                expected: "Scoring",
                actual: self.state.phase.name(),
            });
        };

        match verdict {
            Verdict::Continue => {
                self.state.phase = RoundPhase::HandSetup;
                let count = pool.draw_to_full(rng);
                events.push(RoundEvent::HandDrawn { count });
                Ok(RoundStep::NextThrow)
            }
            Verdict::GoalReached => Ok(RoundStep::Ended(self.end(RoundOutcome::Won, pool, events))),
            Verdict::OutOfThrows => Ok(RoundStep::Ended(self.end(RoundOutcome::Lost, pool, events))),
        }
    }

    fn end(&mut self, outcome: RoundOutcome, pool: &mut DicePool, events: &mut EventLog) -> RoundReport {
        let returned = pool.return_all_to_inventory();
        self.state.phase = RoundPhase::Ended(outcome);

        let report = RoundReport {
            round_number: self.state.round_number,
            won: outcome == RoundOutcome::Won,
            score: self.state.score,
            goal: self.state.goal,
            throws_remaining: self.throws_remaining(),
        };
        events.push(RoundEvent::RoundEnded {
            round_number: report.round_number,
            won: report.won,
            score: report.score,
            throws_remaining: report.throws_remaining,
        });
        tracing::info!(
            "Round {} {:?} with {}/{} ({} dice returned)",
            report.round_number,
            outcome,
            report.score,
            report.goal,
            returned
        );
        report
    }
}
